//! Map canvas: owns every marker and polyline the planner draws.
//!
//! The canvas tracks surface handles so overlays can be reconciled or
//! torn down without the backend leaking objects. All operations are
//! no-ops once the canvas is disposed.

use tracing::debug;

use crate::geo::{Coordinate, LatLngBounds};
use crate::route::Route;
use crate::traits::{MapSurface, MarkerKind, PolylineStyle};

/// Initial map center (San Francisco).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 37.7749,
    lng: -122.4194,
};

/// Initial map zoom.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Zoom applied when centering on a highlighted turn step.
pub const STEP_ZOOM: f64 = 16.0;

/// Draws planner state onto a [`MapSurface`] and remembers what it
/// drew.
pub struct MapCanvas<S: MapSurface> {
    surface: S,
    waypoint_markers: Vec<(Coordinate, MarkerKind, S::Handle)>,
    route_lines: Vec<S::Handle>,
    step_marker: Option<S::Handle>,
    disposed: bool,
}

/// Marker role for waypoint `index` out of `count`.
fn marker_kind_at(index: usize, count: usize) -> MarkerKind {
    if index == 0 {
        MarkerKind::Start
    } else if index + 1 == count {
        MarkerKind::End
    } else {
        MarkerKind::Via
    }
}

impl<S: MapSurface> MapCanvas<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            waypoint_markers: Vec::new(),
            route_lines: Vec::new(),
            step_marker: None,
            disposed: false,
        }
    }

    /// Reconciles waypoint markers against the desired list.
    ///
    /// Markers whose position and role are unchanged keep their
    /// handles; appending a waypoint therefore replaces only the old
    /// End marker (its role becomes Via) and adds the new End.
    pub fn sync_waypoints(&mut self, waypoints: &[Coordinate]) {
        if self.disposed {
            return;
        }

        let mut keep = 0;
        while keep < self.waypoint_markers.len() && keep < waypoints.len() {
            let (at, kind, _) = &self.waypoint_markers[keep];
            if *at != waypoints[keep] || *kind != marker_kind_at(keep, waypoints.len()) {
                break;
            }
            keep += 1;
        }

        for (_, _, handle) in self.waypoint_markers.drain(keep..) {
            self.surface.remove_marker(handle);
        }

        for (index, at) in waypoints.iter().enumerate().skip(keep) {
            let kind = marker_kind_at(index, waypoints.len());
            let handle = self.surface.add_marker(*at, kind, None);
            self.waypoint_markers.push((*at, kind, handle));
        }
    }

    /// Replaces all route lines and fits the view to the selected
    /// route.
    pub fn draw_routes(&mut self, routes: &[Route], selected: usize) {
        if self.disposed {
            return;
        }
        self.redraw_lines(routes, selected);
        if let Some(bounds) = routes.get(selected).and_then(|route| route.geometry.bounds()) {
            self.surface.fit_bounds(bounds);
        }
    }

    /// Redraws route lines for a new selection without moving the
    /// view.
    pub fn set_emphasis(&mut self, routes: &[Route], selected: usize) {
        if self.disposed {
            return;
        }
        self.redraw_lines(routes, selected);
    }

    // Unselected alternatives first, the selected route last so it
    // renders on top.
    fn redraw_lines(&mut self, routes: &[Route], selected: usize) {
        self.clear_routes();
        for (index, route) in routes.iter().enumerate() {
            if index != selected {
                let handle = self
                    .surface
                    .add_polyline(&route.geometry, PolylineStyle::alternative());
                self.route_lines.push(handle);
            }
        }
        if let Some(route) = routes.get(selected) {
            let handle = self
                .surface
                .add_polyline(&route.geometry, PolylineStyle::selected());
            self.route_lines.push(handle);
        }
    }

    fn clear_routes(&mut self) {
        for handle in self.route_lines.drain(..) {
            self.surface.remove_polyline(handle);
        }
    }

    /// Marks the active turn step and centers on it. Any previous step
    /// marker is removed first.
    pub fn show_step_marker(&mut self, at: Coordinate, label: &str) {
        if self.disposed {
            return;
        }
        self.clear_step_marker();
        let handle = self.surface.add_marker(at, MarkerKind::Step, Some(label));
        self.step_marker = Some(handle);
        self.surface.set_view(at, STEP_ZOOM);
    }

    pub fn clear_step_marker(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(handle) = self.step_marker.take() {
            self.surface.remove_marker(handle);
        }
    }

    pub fn fit_to(&mut self, bounds: LatLngBounds) {
        if self.disposed {
            return;
        }
        self.surface.fit_bounds(bounds);
    }

    /// Returns the view to the default center and zoom.
    pub fn reset_view(&mut self) {
        if self.disposed {
            return;
        }
        self.surface.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);
    }

    /// Removes every overlay. Safe to call when nothing is drawn.
    pub fn clear_all(&mut self) {
        if self.disposed {
            return;
        }
        for (_, _, handle) in self.waypoint_markers.drain(..) {
            self.surface.remove_marker(handle);
        }
        self.clear_routes();
        self.clear_step_marker();
    }

    /// Tears down overlays and releases the surface. Later calls,
    /// including the one from `Drop`, do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.clear_all();
        self.surface.release();
        self.disposed = true;
        debug!("map canvas disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn marker_count(&self) -> usize {
        self.waypoint_markers.len() + usize::from(self.step_marker.is_some())
    }

    pub fn polyline_count(&self) -> usize {
        self.route_lines.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: MapSurface> Drop for MapCanvas<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::polyline::Polyline;

    #[derive(Default)]
    struct FakeSurface {
        next_handle: u64,
        markers: Vec<(u64, Coordinate, MarkerKind, Option<String>)>,
        lines: Vec<(u64, PolylineStyle)>,
        views: Vec<(Coordinate, f64)>,
        fit_count: u64,
        releases: Rc<Cell<u64>>,
    }

    impl FakeSurface {
        fn take_handle(&mut self) -> u64 {
            self.next_handle += 1;
            self.next_handle
        }

        fn marker_kinds(&self) -> Vec<MarkerKind> {
            self.markers.iter().map(|(_, _, kind, _)| *kind).collect()
        }
    }

    impl MapSurface for FakeSurface {
        type Handle = u64;

        fn add_marker(
            &mut self,
            at: Coordinate,
            kind: MarkerKind,
            label: Option<&str>,
        ) -> u64 {
            let handle = self.take_handle();
            self.markers
                .push((handle, at, kind, label.map(str::to_string)));
            handle
        }

        fn remove_marker(&mut self, handle: u64) {
            self.markers.retain(|(h, _, _, _)| *h != handle);
        }

        fn add_polyline(&mut self, _line: &Polyline, style: PolylineStyle) -> u64 {
            let handle = self.take_handle();
            self.lines.push((handle, style));
            handle
        }

        fn remove_polyline(&mut self, handle: u64) {
            self.lines.retain(|(h, _)| *h != handle);
        }

        fn set_view(&mut self, center: Coordinate, zoom: f64) {
            self.views.push((center, zoom));
        }

        fn fit_bounds(&mut self, _bounds: LatLngBounds) {
            self.fit_count += 1;
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    fn route_between(from: Coordinate, to: Coordinate) -> Route {
        Route {
            distance: 1000.0,
            duration: 300.0,
            geometry: Polyline::new(vec![from, to]),
            legs: Vec::new(),
        }
    }

    #[test]
    fn test_sync_reassigns_roles_as_waypoints_grow() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        let a = coord(37.77, -122.41);
        let b = coord(37.78, -122.40);
        let c = coord(37.79, -122.39);

        canvas.sync_waypoints(&[a]);
        assert_eq!(canvas.surface().marker_kinds(), vec![MarkerKind::Start]);

        canvas.sync_waypoints(&[a, b]);
        assert_eq!(
            canvas.surface().marker_kinds(),
            vec![MarkerKind::Start, MarkerKind::End]
        );
        let start_handle = canvas.surface().markers[0].0;

        canvas.sync_waypoints(&[a, b, c]);
        assert_eq!(
            canvas.surface().marker_kinds(),
            vec![MarkerKind::Start, MarkerKind::Via, MarkerKind::End]
        );
        // Start marker was untouched; the middle one was replaced.
        assert_eq!(canvas.surface().markers[0].0, start_handle);
    }

    #[test]
    fn test_selected_route_drawn_last() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        let routes = vec![
            route_between(coord(37.0, -122.0), coord(37.1, -122.1)),
            route_between(coord(37.0, -122.0), coord(37.2, -122.2)),
        ];

        canvas.draw_routes(&routes, 0);
        assert_eq!(canvas.polyline_count(), 2);

        let lines = &canvas.surface().lines;
        assert_eq!(lines[0].1, PolylineStyle::alternative());
        assert_eq!(lines[1].1, PolylineStyle::selected());
        assert_eq!(canvas.surface().fit_count, 1);
    }

    #[test]
    fn test_set_emphasis_does_not_refit() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        let routes = vec![
            route_between(coord(37.0, -122.0), coord(37.1, -122.1)),
            route_between(coord(37.0, -122.0), coord(37.2, -122.2)),
        ];

        canvas.draw_routes(&routes, 0);
        canvas.set_emphasis(&routes, 1);

        assert_eq!(canvas.polyline_count(), 2);
        assert_eq!(canvas.surface().fit_count, 1, "emphasis must not refit");
    }

    #[test]
    fn test_repeated_redraw_leaves_identical_lines() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        let routes = vec![
            route_between(coord(37.0, -122.0), coord(37.1, -122.1)),
            route_between(coord(37.0, -122.0), coord(37.2, -122.2)),
        ];
        let styles = |canvas: &MapCanvas<FakeSurface>| -> Vec<PolylineStyle> {
            canvas
                .surface()
                .lines
                .iter()
                .map(|(_, style)| style.clone())
                .collect()
        };

        canvas.draw_routes(&routes, 1);
        let drawn = styles(&canvas);

        canvas.draw_routes(&routes, 1);
        assert_eq!(styles(&canvas), drawn, "redraw must not change the lines");
        assert_eq!(canvas.polyline_count(), 2, "redraw must not stack lines");

        canvas.set_emphasis(&routes, 1);
        canvas.set_emphasis(&routes, 1);
        assert_eq!(styles(&canvas), drawn);
        assert_eq!(canvas.polyline_count(), 2);
    }

    #[test]
    fn test_step_marker_is_replaced_not_stacked() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        canvas.show_step_marker(coord(37.0, -122.0), "Turn left onto Oak St");
        canvas.show_step_marker(coord(37.1, -122.1), "Turn right onto Fell St");

        assert_eq!(canvas.marker_count(), 1);
        let (_, at, kind, label) = canvas.surface().markers[0].clone();
        assert_eq!(at, coord(37.1, -122.1));
        assert_eq!(kind, MarkerKind::Step);
        assert_eq!(label.as_deref(), Some("Turn right onto Fell St"));
        assert_eq!(
            canvas.surface().views.last(),
            Some(&(coord(37.1, -122.1), STEP_ZOOM))
        );
    }

    #[test]
    fn test_clear_all_when_empty_is_safe() {
        let mut canvas = MapCanvas::new(FakeSurface::default());
        canvas.clear_all();
        assert_eq!(canvas.marker_count(), 0);
        assert_eq!(canvas.polyline_count(), 0);
    }

    #[test]
    fn test_dispose_releases_exactly_once() {
        let surface = FakeSurface::default();
        let releases = surface.releases.clone();
        let mut canvas = MapCanvas::new(surface);

        canvas.sync_waypoints(&[coord(37.0, -122.0)]);
        canvas.dispose();
        canvas.dispose();
        assert!(canvas.is_disposed());

        // Disposed canvas ignores further drawing.
        canvas.sync_waypoints(&[coord(37.0, -122.0), coord(37.1, -122.1)]);
        assert_eq!(canvas.marker_count(), 0);

        drop(canvas);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_drop_releases_when_not_disposed() {
        let surface = FakeSurface::default();
        let releases = surface.releases.clone();
        {
            let mut canvas = MapCanvas::new(surface);
            canvas.reset_view();
        }
        assert_eq!(releases.get(), 1);
    }
}
