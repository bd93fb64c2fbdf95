//! Polyline representation for route geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences. Decoding from the provider's GeoJSON arrays
//! happens at the boundary; internally a polyline is always a list of
//! [`Coordinate`]s.

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, LatLngBounds};

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    /// Bounding box of the line, or `None` when it has no points.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_coordinates(&self.points)
    }

    /// Joins segments end to end. Adjacent segments usually share an
    /// endpoint; the duplicate is dropped when a segment starts exactly
    /// where the previous one ended.
    pub fn concat<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a Polyline>,
    {
        let mut points: Vec<Coordinate> = Vec::new();
        for segment in segments {
            let mut rest = segment.points.as_slice();
            if let (Some(last), Some(first)) = (points.last(), rest.first()) {
                if last == first {
                    rest = &rest[1..];
                }
            }
            points.extend_from_slice(rest);
        }
        Self { points }
    }
}
