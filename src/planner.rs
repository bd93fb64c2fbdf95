//! Route-planning interaction core.
//!
//! The planner owns the waypoint list, fetch status, fetched routes,
//! selection, and the highlighted turn step. It never performs IO
//! itself: waypoint and preference changes hand back a [`RouteQuery`]
//! snapshot for the caller to execute, and the result comes back
//! through [`RoutePlanner::apply_route_outcome`]. Stale results are
//! recognized by generation number and discarded, so only the most
//! recently initiated fetch can mutate state.

use tracing::debug;

use crate::directions::DirectionsError;
use crate::format;
use crate::geo::Coordinate;
use crate::map_view::MapCanvas;
use crate::prefs::{RoutePreferences, TravelMode};
use crate::route::{Route, StepRef};
use crate::traits::MapSurface;

/// Where the planner is in the interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerPhase {
    /// No waypoints placed.
    Empty,
    /// One waypoint placed, nothing to route yet.
    AwaitingSecondPoint,
    /// A directions request is in flight.
    Fetching,
    /// Routes are available and drawn.
    Ready,
    /// The last fetch failed; any earlier routes are retained.
    Error,
}

/// Snapshot of everything a directions request needs.
///
/// The generation number doubles as the supersession token: outcomes
/// carrying an older generation than the planner's current one are
/// discarded on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub generation: u64,
    pub waypoints: Vec<Coordinate>,
    pub mode: TravelMode,
    pub preferences: RoutePreferences,
}

/// Initial planner settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerConfig {
    pub mode: TravelMode,
    pub preferences: RoutePreferences,
}

/// The stateful route-planning controller.
pub struct RoutePlanner<S: MapSurface> {
    canvas: MapCanvas<S>,
    phase: PlannerPhase,
    waypoints: Vec<Coordinate>,
    mode: TravelMode,
    preferences: RoutePreferences,
    /// Main route first, provider-ranked alternatives after it.
    routes: Vec<Route>,
    selected: usize,
    active_step: Option<StepRef>,
    error: Option<String>,
    generation: u64,
}

impl<S: MapSurface> RoutePlanner<S> {
    pub fn new(surface: S, config: PlannerConfig) -> Self {
        let mut canvas = MapCanvas::new(surface);
        canvas.reset_view();
        Self {
            canvas,
            phase: PlannerPhase::Empty,
            waypoints: Vec::new(),
            mode: config.mode,
            preferences: config.preferences,
            routes: Vec::new(),
            selected: 0,
            active_step: None,
            error: None,
            generation: 0,
        }
    }

    /// Appends a waypoint and places its marker. Returns the query to
    /// execute once two or more waypoints exist.
    pub fn add_waypoint(&mut self, at: Coordinate) -> Option<RouteQuery> {
        self.waypoints.push(at);
        self.canvas.sync_waypoints(&self.waypoints);

        if self.waypoints.len() < 2 {
            self.phase = PlannerPhase::AwaitingSecondPoint;
            None
        } else {
            Some(self.begin_fetch())
        }
    }

    /// Replaces the waypoint at `index` (a marker drag) and reconciles
    /// its marker. With a routable waypoint set this behaves as a new
    /// fetch, superseding any request in flight. An out-of-range index
    /// is rejected and nothing changes.
    pub fn move_waypoint(&mut self, index: usize, to: Coordinate) -> Option<RouteQuery> {
        let Some(waypoint) = self.waypoints.get_mut(index) else {
            debug!(
                "ignoring move of waypoint {} ({} exist)",
                index,
                self.waypoints.len()
            );
            return None;
        };
        *waypoint = to;
        self.canvas.sync_waypoints(&self.waypoints);
        self.refetch_if_routable()
    }

    fn begin_fetch(&mut self) -> RouteQuery {
        self.generation += 1;
        self.phase = PlannerPhase::Fetching;
        debug!(
            "starting fetch generation {} with {} waypoints",
            self.generation,
            self.waypoints.len()
        );
        RouteQuery {
            generation: self.generation,
            waypoints: self.waypoints.clone(),
            mode: self.mode,
            preferences: self.preferences,
        }
    }

    /// Applies a completed fetch.
    ///
    /// Outcomes from superseded fetches (older generation) are
    /// dropped. On success the routes replace previous state, the
    /// selection returns to the main route, and the canvas redraws.
    /// On failure the error is recorded and every drawn overlay plus
    /// any previously fetched routes stay as they were, so the user
    /// keeps their context while retrying.
    pub fn apply_route_outcome(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Route>, DirectionsError>,
    ) {
        if generation != self.generation {
            debug!(
                "discarding stale route outcome (generation {}, current {})",
                generation, self.generation
            );
            return;
        }

        match outcome {
            Ok(routes) => {
                debug_assert!(
                    !routes.is_empty(),
                    "providers must map an empty result to NoRoute"
                );
                debug!("fetch generation {} returned {} route(s)", generation, routes.len());
                self.routes = routes;
                self.selected = 0;
                self.active_step = None;
                self.error = None;
                self.phase = PlannerPhase::Ready;
                self.canvas.clear_step_marker();
                self.canvas.draw_routes(&self.routes, self.selected);
            }
            Err(err) => {
                debug!("fetch generation {} failed: {}", generation, err);
                self.error = Some(err.to_string());
                self.phase = PlannerPhase::Error;
            }
        }
    }

    /// Switches the visually dominant route. Presentation only; never
    /// fetches. Returns false outside `Ready` or for an out-of-range
    /// index.
    pub fn select_alternative(&mut self, index: usize) -> bool {
        if self.phase != PlannerPhase::Ready || index >= self.routes.len() {
            return false;
        }
        self.selected = index;
        self.active_step = None;
        self.canvas.clear_step_marker();
        self.canvas.set_emphasis(&self.routes, self.selected);
        true
    }

    /// Highlights one turn step of the selected route: places the step
    /// marker with its instruction text and centers the view on the
    /// maneuver. Returns false outside `Ready` or when the reference
    /// does not resolve.
    pub fn highlight_step(&mut self, step_ref: StepRef) -> bool {
        if self.phase != PlannerPhase::Ready {
            return false;
        }
        let Some(step) = self
            .routes
            .get(self.selected)
            .and_then(|route| route.step(step_ref))
        else {
            return false;
        };

        let label = format::step_instruction(step);
        let at = step.maneuver.location;
        self.active_step = Some(step_ref);
        self.canvas.show_step_marker(at, &label);
        true
    }

    /// Replaces the preference snapshot. Returns a refetch query when
    /// a routable waypoint set exists.
    pub fn update_preferences(&mut self, preferences: RoutePreferences) -> Option<RouteQuery> {
        self.preferences = preferences;
        self.refetch_if_routable()
    }

    /// Switches the travel profile. Returns a refetch query when a
    /// routable waypoint set exists.
    pub fn set_travel_mode(&mut self, mode: TravelMode) -> Option<RouteQuery> {
        self.mode = mode;
        self.refetch_if_routable()
    }

    fn refetch_if_routable(&mut self) -> Option<RouteQuery> {
        if self.waypoints.len() >= 2 {
            Some(self.begin_fetch())
        } else {
            None
        }
    }

    /// Returns to the initial state: no waypoints, no routes, no
    /// error, no overlays, default view. Any in-flight fetch is
    /// stranded behind the generation bump and its outcome will be
    /// discarded. Idempotent.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.waypoints.clear();
        self.routes.clear();
        self.selected = 0;
        self.active_step = None;
        self.error = None;
        self.phase = PlannerPhase::Empty;
        self.canvas.clear_all();
        self.canvas.reset_view();
    }

    /// Releases the canvas and its surface. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.canvas.dispose();
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// All fetched routes, main route first.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.routes.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn active_step(&self) -> Option<StepRef> {
        self.active_step
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Generation of the most recently initiated fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn preferences(&self) -> RoutePreferences {
        self.preferences
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.mode
    }

    pub fn canvas(&self) -> &MapCanvas<S> {
        &self.canvas
    }
}
