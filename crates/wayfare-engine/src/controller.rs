//! # Route Request Controller
//!
//! Manages the lifecycle of the single outstanding route request: mode
//! selection, dispatch, and epoch-guarded completion so a slow response can
//! never overwrite a newer request's state.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    RouteController Lifecycle                            │
//! │                                                                         │
//! │  request_route(origin, destination, arrival)                           │
//! │        │                                                                │
//! │        ├── epoch += 1, capture e, phase = Loading   (synchronous)      │
//! │        │                                                                │
//! │        ├── arrival_time == ""  ──► DirectRoute      ──► /get_route     │
//! │        │   arrival_time != ""  ──► PredictedArrival ──► /predict       │
//! │        │                                                                │
//! │        ├── await RouteBackend::fetch_route          (soft-cancellable) │
//! │        │                                                                │
//! │        └── apply terminal phase ONLY IF e == current epoch             │
//! │            otherwise discard the response entirely                     │
//! │                                                                         │
//! │  body has non-empty "error"  ──► Failed(error verbatim)                │
//! │  transport/decode failure    ──► Failed(generic connectivity message)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller only ever reads slot snapshots taken synchronously by the
//! caller; it never mutates slots.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use wayfare_core::{EndpointState, RequestPhase, RouteQuery, RouteResponse};

use crate::error::BackendResult;

/// The one user-facing message for transport-class failures.
///
/// Backend-REPORTED errors are surfaced verbatim instead; this message is
/// only for "could not reach / could not understand the backend".
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Is the backend running?";

// =============================================================================
// Backend Trait
// =============================================================================

/// The route backend port.
///
/// One call per `request_route`; implementations must not retry (a failure
/// is terminal until the user re-triggers the action).
#[async_trait]
pub trait RouteBackend: Send + Sync {
    /// Executes one route/prediction request.
    ///
    /// The target operation follows from `query.mode()`.
    async fn fetch_route(&self, query: &RouteQuery) -> BackendResult<RouteResponse>;
}

// =============================================================================
// Request Outcome
// =============================================================================

/// What one `request_route` call contributed to the display state.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// This call's response became the controller's terminal phase.
    Completed(RequestPhase),

    /// A newer request was issued while this one was in flight; its
    /// response was discarded without touching the phase. Not an error.
    Superseded,
}

// =============================================================================
// Route Controller
// =============================================================================

struct ControllerState {
    /// Request epoch; bumped once per `request_route` call.
    epoch: u64,

    /// Lifecycle state shown to the display surface.
    phase: RequestPhase,
}

/// The single-outstanding-request controller.
///
/// Cheap to clone; clones share epoch and phase.
#[derive(Clone)]
pub struct RouteController {
    backend: Arc<dyn RouteBackend>,
    state: Arc<Mutex<ControllerState>>,
}

impl RouteController {
    /// Creates a controller over a backend, starting in `Idle`.
    pub fn new(backend: Arc<dyn RouteBackend>) -> Self {
        RouteController {
            backend,
            state: Arc::new(Mutex::new(ControllerState {
                epoch: 0,
                phase: RequestPhase::Idle,
            })),
        }
    }

    /// The current lifecycle phase, for display.
    pub fn phase(&self) -> RequestPhase {
        self.state.lock().expect("controller mutex poisoned").phase.clone()
    }

    /// Issues a route request for a snapshot of both slots.
    ///
    /// Re-enters `Loading` immediately (clearing any previous result or
    /// error from display), then resolves to `Success`/`Failed`, unless a
    /// newer call supersedes this one first, in which case the response is
    /// dropped and [`RequestOutcome::Superseded`] is returned.
    ///
    /// No field is validated before sending: empty addresses and `null`
    /// coordinates go to the backend as-is.
    pub async fn request_route(
        &self,
        origin: &EndpointState,
        destination: &EndpointState,
        arrival_time: &str,
    ) -> RequestOutcome {
        let query = RouteQuery::from_snapshots(origin, destination, arrival_time);

        let epoch = {
            let mut state = self.state.lock().expect("controller mutex poisoned");
            state.epoch += 1;
            state.phase = RequestPhase::Loading;
            state.epoch
        };

        info!(mode = %query.mode(), epoch, "route request dispatched");

        let phase = match self.backend.fetch_route(&query).await {
            Ok(response) => match response.backend_error() {
                Some(message) => RequestPhase::Failed(message.to_string()),
                None => RequestPhase::Success(response),
            },
            Err(err) => {
                warn!(error = %err, epoch, "route request failed");
                RequestPhase::Failed(NETWORK_ERROR_MESSAGE.to_string())
            }
        };

        let mut state = self.state.lock().expect("controller mutex poisoned");
        if state.epoch != epoch {
            debug!(epoch, current = state.epoch, "stale route response dropped");
            return RequestOutcome::Superseded;
        }
        state.phase = phase.clone();
        RequestOutcome::Completed(phase)
    }
}

impl std::fmt::Debug for RouteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteController")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
