//! Request controller: one prediction request at a time, state published to
//! observers through a watch channel.

use std::time::Instant;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::common::error::{PanelError, PanelResult};
use crate::patient::domain::PatientRecord;

use super::domain::{FailureKind, PredictionFailure, PredictionResult, RequestState};
use super::transport::PredictionTransport;

pub struct PredictionController<T> {
    transport: T,
    state: watch::Sender<RequestState>,
}

impl<T: PredictionTransport> PredictionController<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self { transport, state }
    }

    /// Receiver that sees every state the controller publishes, including
    /// `Pending` while a request is in flight.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a snapshot of `record` and wait for the outcome.
    ///
    /// Refused with [`PanelError::SubmissionInFlight`] while another submission
    /// is pending; no request is issued in that case. Otherwise the returned
    /// state is `Succeeded` or `Failed`, never `Pending`.
    pub async fn submit(&self, record: &PatientRecord) -> PanelResult<RequestState> {
        let snapshot = *record;
        let accepted = self.state.send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                *state = RequestState::Pending;
                true
            }
        });
        if !accepted {
            warn!("submission refused, a request is already pending");
            return Err(PanelError::SubmissionInFlight);
        }

        let guard = PendingGuard { state: &self.state };
        let started = Instant::now();
        info!(state = RequestState::Pending.as_str(), "prediction request started");

        let next = match self.request(&snapshot).await {
            Ok(result) => RequestState::Succeeded(result),
            Err(failure) => RequestState::Failed(failure),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &next {
            RequestState::Succeeded(result) => info!(
                state = next.as_str(),
                diagnosis = %result.diagnosis,
                probability_positive = result.probability_positive,
                elapsed_ms,
                "prediction request finished"
            ),
            RequestState::Failed(failure) => {
                let status = match failure.kind {
                    FailureKind::Status(code) => Some(code),
                    _ => None,
                };
                warn!(
                    state = next.as_str(),
                    kind = ?failure.kind,
                    status,
                    error = %failure,
                    elapsed_ms,
                    "prediction request failed"
                );
            }
            RequestState::Idle | RequestState::Pending => {}
        }

        guard.finish(next.clone());
        Ok(next)
    }

    async fn request(&self, record: &PatientRecord) -> Result<PredictionResult, PredictionFailure> {
        let body =
            serde_json::to_vec(record).map_err(|err| PredictionFailure::unexpected(err.to_string()))?;
        let response = self
            .transport
            .post_json(body)
            .await
            .map_err(|err| PredictionFailure::transport(err.0))?;
        if !response.is_success() {
            return Err(PredictionFailure::status(response.status));
        }
        PredictionResult::from_slice(&response.body).map_err(PredictionFailure::malformed_response)
    }
}

/// Clears `Pending` if a submission future is dropped before it completes.
struct PendingGuard<'a> {
    state: &'a watch::Sender<RequestState>,
}

impl PendingGuard<'_> {
    fn finish(self, next: RequestState) {
        self.state.send_replace(next);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = RequestState::Idle;
                true
            } else {
                false
            }
        });
    }
}
