//! Scripted providers with deterministic delays and outcomes.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use route_planner::directions::DirectionsError;
use route_planner::planner::RouteQuery;
use route_planner::route::Route;
use route_planner::traits::DirectionsProvider;

/// What one scripted fetch should produce.
pub enum ScriptedOutcome {
    Routes(Vec<Route>),
    NoRoute,
    Provider(u16, &'static str),
}

/// Directions provider that replays a script: each fetch pops the
/// next `(delay, outcome)` entry, waits, and resolves. Queries are
/// recorded for assertions.
pub struct ScriptedDirections {
    script: Mutex<VecDeque<(Duration, ScriptedOutcome)>>,
    calls: Mutex<Vec<RouteQuery>>,
}

impl ScriptedDirections {
    pub fn new(script: Vec<(Duration, ScriptedOutcome)>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RouteQuery> {
        self.calls.lock().unwrap().clone()
    }
}

impl DirectionsProvider for ScriptedDirections {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Vec<Route>, DirectionsError> {
        // Locks are released before the await.
        let (delay, outcome) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted: unexpected fetch");
        self.calls.lock().unwrap().push(query.clone());

        tokio::time::sleep(delay).await;

        match outcome {
            ScriptedOutcome::Routes(routes) => Ok(routes),
            ScriptedOutcome::NoRoute => Err(DirectionsError::NoRoute),
            ScriptedOutcome::Provider(status, message) => Err(DirectionsError::Provider {
                status,
                message: message.to_string(),
            }),
        }
    }
}
