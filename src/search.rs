//! Debounced place search.
//!
//! Keystrokes arrive faster than anyone wants geocoding requests to
//! go out. The debouncer holds each query for a fixed delay and
//! cancels the pending one whenever a newer keystroke lands, so only
//! the latest query reaches the provider.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::geocoding::{GeocodingError, Place};
use crate::traits::GeocodingProvider;

/// Pause after the last keystroke before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A finished search: the query it ran and what came back.
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    pub result: Result<Vec<Place>, GeocodingError>,
}

/// Turns a stream of keystrokes into at most one in-flight geocoding
/// request.
pub struct SearchDebouncer<G> {
    geocoder: Arc<G>,
    delay: Duration,
    outcomes_tx: mpsc::UnboundedSender<SearchOutcome>,
    pending: Option<JoinHandle<()>>,
}

impl<G> SearchDebouncer<G>
where
    G: GeocodingProvider + Send + Sync + 'static,
{
    /// Debouncer with the standard delay. Outcomes arrive on the
    /// returned receiver.
    pub fn new(geocoder: Arc<G>) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        Self::with_delay(geocoder, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(
        geocoder: Arc<G>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        (
            Self {
                geocoder,
                delay,
                outcomes_tx,
                pending: None,
            },
            outcomes_rx,
        )
    }

    /// Feeds a keystroke. Blank input resolves immediately to an
    /// empty result without touching the provider; anything else
    /// schedules a search after the delay, replacing whatever was
    /// pending.
    pub fn input(&mut self, query: &str) {
        self.cancel_pending();

        let trimmed = query.trim();
        if trimmed.is_empty() {
            let _ = self.outcomes_tx.send(SearchOutcome {
                query: String::new(),
                result: Ok(Vec::new()),
            });
            return;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let outcomes_tx = self.outcomes_tx.clone();
        let delay = self.delay;
        let query = trimmed.to_string();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("debounce elapsed, searching {:?}", query);
            let result = geocoder.search(&query).await;
            let _ = outcomes_tx.send(SearchOutcome { query, result });
        }));
    }
}

impl<G> SearchDebouncer<G> {
    /// Aborts any scheduled search.
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<G> Drop for SearchDebouncer<G> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
