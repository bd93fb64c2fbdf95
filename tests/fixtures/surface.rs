//! Recording map surface.
//!
//! Captures every drawing call so tests can assert on the overlay
//! state the planner produced.

use route_planner::geo::{Coordinate, LatLngBounds};
use route_planner::polyline::Polyline;
use route_planner::traits::{MapSurface, MarkerKind, PolylineStyle};

#[derive(Debug, Clone)]
pub struct MarkerRecord {
    pub handle: u64,
    pub at: Coordinate,
    pub kind: MarkerKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PolylineRecord {
    pub handle: u64,
    pub point_count: usize,
    pub style: PolylineStyle,
}

/// Map surface that records calls instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: u64,
    /// Markers currently on the surface, in add order.
    pub markers: Vec<MarkerRecord>,
    /// Polylines currently on the surface, in add order.
    pub polylines: Vec<PolylineRecord>,
    /// Most recent set_view call.
    pub view: Option<(Coordinate, f64)>,
    pub fit_calls: Vec<LatLngBounds>,
    pub removed_markers: u64,
    pub removed_polylines: u64,
    pub release_calls: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_kinds(&self) -> Vec<MarkerKind> {
        self.markers.iter().map(|marker| marker.kind).collect()
    }

    pub fn step_markers(&self) -> Vec<&MarkerRecord> {
        self.markers
            .iter()
            .filter(|marker| marker.kind == MarkerKind::Step)
            .collect()
    }

    pub fn line_styles(&self) -> Vec<&PolylineStyle> {
        self.polylines.iter().map(|line| &line.style).collect()
    }
}

impl MapSurface for RecordingSurface {
    type Handle = u64;

    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind, label: Option<&str>) -> u64 {
        self.next_handle += 1;
        self.markers.push(MarkerRecord {
            handle: self.next_handle,
            at,
            kind,
            label: label.map(str::to_string),
        });
        self.next_handle
    }

    fn remove_marker(&mut self, handle: u64) {
        self.markers.retain(|marker| marker.handle != handle);
        self.removed_markers += 1;
    }

    fn add_polyline(&mut self, line: &Polyline, style: PolylineStyle) -> u64 {
        self.next_handle += 1;
        self.polylines.push(PolylineRecord {
            handle: self.next_handle,
            point_count: line.len(),
            style,
        });
        self.next_handle
    }

    fn remove_polyline(&mut self, handle: u64) {
        self.polylines.retain(|line| line.handle != handle);
        self.removed_polylines += 1;
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.view = Some((center, zoom));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.fit_calls.push(bounds);
    }

    fn release(&mut self) {
        self.release_calls += 1;
    }
}
