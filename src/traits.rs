//! Core traits at the planner's seams.
//!
//! These are intentionally minimal and backend-agnostic. Concrete apps
//! implement [`MapSurface`] for their rendering layer; the provider
//! traits are implemented by the HTTP clients in this crate and by
//! test doubles.

use std::future::Future;
use std::hash::Hash;

use crate::directions::DirectionsError;
use crate::geo::{Coordinate, LatLngBounds};
use crate::geocoding::{GeocodingError, Place};
use crate::planner::RouteQuery;
use crate::polyline::Polyline;
use crate::route::Route;

/// Unique identifier for surface entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// Computes routes for a waypoint query.
pub trait DirectionsProvider {
    /// Fetches the main route and any alternatives for `query`.
    ///
    /// A successful result is never empty: the main route comes first,
    /// alternatives after it. Providers that can return zero routes
    /// must map that case to [`DirectionsError::NoRoute`].
    fn fetch_route(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Vec<Route>, DirectionsError>> + Send;
}

/// Resolves free-text queries to named places.
pub trait GeocodingProvider {
    fn search(&self, query: &str)
    -> impl Future<Output = Result<Vec<Place>, GeocodingError>> + Send;
}

/// The rendering layer the planner draws on.
///
/// Handles identify surface objects so they can be removed later; the
/// planner never inspects them beyond that.
pub trait MapSurface {
    type Handle: Id;

    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind, label: Option<&str>)
    -> Self::Handle;

    fn remove_marker(&mut self, handle: Self::Handle);

    fn add_polyline(&mut self, line: &Polyline, style: PolylineStyle) -> Self::Handle;

    fn remove_polyline(&mut self, handle: Self::Handle);

    fn set_view(&mut self, center: Coordinate, zoom: f64);

    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Releases backend resources. Called exactly once, on disposal.
    fn release(&mut self);
}

/// Role of a marker on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
    Via,
    /// Highlights the active turn step.
    Step,
}

impl MarkerKind {
    /// Display color, hex RGB.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Start => "#22c55e",
            Self::End => "#ef4444",
            Self::Via => "#3b82f6",
            Self::Step => "#f97316",
        }
    }
}

/// Stroke style for a drawn route line.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

impl PolylineStyle {
    /// Dominant style for the selected route.
    pub fn selected() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            weight: 5.0,
            opacity: 0.8,
        }
    }

    /// Muted style for unselected alternatives.
    pub fn alternative() -> Self {
        Self {
            color: "#64748b".to_string(),
            weight: 4.0,
            opacity: 0.4,
        }
    }
}
