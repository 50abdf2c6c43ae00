use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{OrderRecord, OrderUid},
    error::{LookupError, TransportError},
    protocol::FetchResponse,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

mod http;
pub mod view;

pub use http::HttpOrderSource;
pub use view::{render, UiState};

const STATE_EVENT_CAPACITY: usize = 64;

/// Where order documents come from. The HTTP implementation is
/// [`HttpOrderSource`]; tests plug in canned responses.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, uid: &OrderUid) -> Result<FetchResponse, TransportError>;
}

/// Maps the outcome of a fetch for `uid` to the state that should be shown.
pub fn resolve(uid: &OrderUid, outcome: Result<FetchResponse, TransportError>) -> UiState {
    match classify(uid, outcome) {
        Ok(record) => UiState::Success(record),
        Err(err) => UiState::Error(err),
    }
}

fn classify(
    uid: &OrderUid,
    outcome: Result<FetchResponse, TransportError>,
) -> Result<OrderRecord, LookupError> {
    let response = outcome?;

    if response.is_not_found() {
        return Err(LookupError::NotFound {
            uid: uid.to_string(),
        });
    }
    if !response.is_success() {
        return Err(LookupError::Http {
            status: response.status,
            reason: response.reason,
        });
    }

    OrderRecord::from_json_slice(&response.body).map_err(|e| LookupError::transport(e.to_string()))
}

struct StateSlot {
    latest_submission: u64,
    current: UiState,
}

/// Drives order lookups and owns the single state slot that a renderer
/// displays.
///
/// Every submission gets a sequence number. An outcome is only committed when
/// no newer submission has been made in the meantime, so a slow response can
/// never overwrite the result of a later lookup.
pub struct OrderLookupController {
    source: Arc<dyn OrderSource>,
    slot: Mutex<StateSlot>,
    events: broadcast::Sender<UiState>,
}

impl OrderLookupController {
    pub fn new(source: Arc<dyn OrderSource>) -> Self {
        let (events, _) = broadcast::channel(STATE_EVENT_CAPACITY);
        Self {
            source,
            slot: Mutex::new(StateSlot {
                latest_submission: 0,
                current: UiState::Idle,
            }),
            events,
        }
    }

    pub async fn lookup_order(&self, raw_input: &str) -> UiState {
        let uid = match OrderUid::parse(raw_input) {
            Ok(uid) => uid,
            Err(err) => {
                debug!("order lookup rejected: empty order uid");
                let state = UiState::Error(err);
                self.begin_submission(state.clone()).await;
                return state;
            }
        };

        let submission = self.begin_submission(UiState::Loading).await;
        info!(uid = %uid, submission, "order lookup started");

        let outcome = self.source.fetch_order(&uid).await;
        let state = resolve(&uid, outcome);
        match &state {
            UiState::Success(_) => info!(uid = %uid, submission, "order lookup succeeded"),
            UiState::Error(err) => {
                warn!(uid = %uid, submission, kind = ?err.kind(), error = %err, "order lookup failed")
            }
            UiState::Idle | UiState::Loading => {}
        }

        self.commit(submission, state.clone()).await;
        state
    }

    pub async fn current(&self) -> UiState {
        self.slot.lock().await.current.clone()
    }

    /// Every state committed from now on, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<UiState> {
        self.events.subscribe()
    }

    async fn begin_submission(&self, state: UiState) -> u64 {
        let mut slot = self.slot.lock().await;
        slot.latest_submission += 1;
        slot.current = state.clone();
        let _ = self.events.send(state);
        slot.latest_submission
    }

    async fn commit(&self, submission: u64, state: UiState) {
        let mut slot = self.slot.lock().await;
        if slot.latest_submission != submission {
            debug!(
                submission,
                latest = slot.latest_submission,
                "discarding stale order lookup result"
            );
            return;
        }
        slot.current = state.clone();
        let _ = self.events.send(state);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
