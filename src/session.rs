//! Async planner session.
//!
//! Wraps a [`RoutePlanner`] in an event loop: UI-facing events go in
//! through a channel sender, directions requests run as background
//! tasks, and their outcomes re-enter the loop as events. The planner
//! itself stays single-threaded; the loop serializes every mutation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::directions::DirectionsError;
use crate::geo::Coordinate;
use crate::planner::{PlannerConfig, RoutePlanner, RouteQuery};
use crate::prefs::{RoutePreferences, TravelMode};
use crate::route::{Route, StepRef};
use crate::traits::{DirectionsProvider, MapSurface};

/// Everything that can happen to a planner session.
#[derive(Debug)]
pub enum PlannerEvent {
    /// The user clicked the map at a coordinate.
    MapClick(Coordinate),
    /// The user dragged the waypoint at `index` to a new position.
    MoveWaypoint { index: usize, to: Coordinate },
    SetPreferences(RoutePreferences),
    SetTravelMode(TravelMode),
    SelectAlternative(usize),
    HighlightStep(StepRef),
    Reset,
    /// Ends the loop; the session disposes its canvas and returns.
    Shutdown,
    /// A background fetch finished.
    RouteOutcome {
        generation: u64,
        outcome: Result<Vec<Route>, DirectionsError>,
    },
}

/// Event loop around a planner and a directions provider.
pub struct PlannerSession<S: MapSurface, D> {
    planner: RoutePlanner<S>,
    directions: Arc<D>,
    events_tx: mpsc::UnboundedSender<PlannerEvent>,
    events_rx: mpsc::UnboundedReceiver<PlannerEvent>,
}

impl<S, D> PlannerSession<S, D>
where
    S: MapSurface,
    D: DirectionsProvider + Send + Sync + 'static,
{
    pub fn new(surface: S, directions: Arc<D>, config: PlannerConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            planner: RoutePlanner::new(surface, config),
            directions,
            events_tx,
            events_rx,
        }
    }

    /// Sender for feeding events into the loop. Clone freely.
    pub fn handle(&self) -> mpsc::UnboundedSender<PlannerEvent> {
        self.events_tx.clone()
    }

    pub fn planner(&self) -> &RoutePlanner<S> {
        &self.planner
    }

    /// Runs until a [`PlannerEvent::Shutdown`] arrives, then disposes
    /// the canvas and returns the final planner state. The session
    /// keeps its own sender alive, so dropping external handles does
    /// not end the loop; Shutdown does.
    pub async fn run(mut self) -> RoutePlanner<S> {
        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
        self.planner.dispose();
        self.planner
    }

    fn handle_event(&mut self, event: PlannerEvent) -> bool {
        match event {
            PlannerEvent::MapClick(at) => {
                let query = self.planner.add_waypoint(at);
                self.spawn_fetch(query);
            }
            PlannerEvent::MoveWaypoint { index, to } => {
                let query = self.planner.move_waypoint(index, to);
                self.spawn_fetch(query);
            }
            PlannerEvent::SetPreferences(preferences) => {
                let query = self.planner.update_preferences(preferences);
                self.spawn_fetch(query);
            }
            PlannerEvent::SetTravelMode(mode) => {
                let query = self.planner.set_travel_mode(mode);
                self.spawn_fetch(query);
            }
            PlannerEvent::SelectAlternative(index) => {
                self.planner.select_alternative(index);
            }
            PlannerEvent::HighlightStep(step_ref) => {
                self.planner.highlight_step(step_ref);
            }
            PlannerEvent::Reset => self.planner.reset(),
            PlannerEvent::RouteOutcome {
                generation,
                outcome,
            } => {
                self.planner.apply_route_outcome(generation, outcome);
            }
            PlannerEvent::Shutdown => return false,
        }
        true
    }

    // Superseded fetches are not aborted; their outcomes come back
    // with an old generation and the planner drops them.
    fn spawn_fetch(&self, query: Option<RouteQuery>) {
        let Some(query) = query else { return };
        let directions = Arc::clone(&self.directions);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let generation = query.generation;
            let outcome = directions.fetch_route(&query).await;
            let delivered = events_tx.send(PlannerEvent::RouteOutcome {
                generation,
                outcome,
            });
            if delivered.is_err() {
                debug!(
                    "session ended before fetch generation {} completed",
                    generation
                );
            }
        });
    }
}
