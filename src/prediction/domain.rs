//! Prediction results and the request lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::{PanelCode, PanelError, PanelResult};

/// Label the model returns for the positive class.
pub const POSITIVE_DIAGNOSIS: &str = "Alzheimer Positivo";

/// Message shown when the endpoint answers with a non-success status. The
/// status itself only goes to the logs.
pub const STATUS_FAILURE_MESSAGE: &str = "prediction API responded with a failure status";

/// Fallback when an error carries no description of its own.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "an unexpected error occurred";

/// Body of a successful prediction response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub diagnosis: String,
    pub probability_positive: f64,
}

impl PredictionResult {
    /// Decode and validate a response body. Unknown keys are ignored; the two
    /// documented keys must be present with sane values.
    pub fn from_slice(body: &[u8]) -> PanelResult<Self> {
        let result: PredictionResult =
            serde_json::from_slice(body).map_err(|err| PanelError::malformed(err.to_string()))?;
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> PanelResult<()> {
        if self.diagnosis.trim().is_empty() {
            return Err(PanelError::malformed("diagnosis is empty"));
        }
        if !(0.0..=1.0).contains(&self.probability_positive) {
            return Err(PanelError::malformed(format!(
                "probability_positive {} is outside [0, 1]",
                self.probability_positive
            )));
        }
        Ok(())
    }

    pub fn is_positive(&self) -> bool {
        self.diagnosis == POSITIVE_DIAGNOSIS
    }

    /// Positive-class probability as a percentage with two decimals.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability_positive * 100.0)
    }
}

/// What went wrong with a request, for logs and callers that care.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Connection refused, DNS failure, timeout and the like.
    Transport,
    /// The endpoint answered with a non-2xx status.
    Status(u16),
    /// 2xx answer whose body is not a valid prediction.
    MalformedResponse,
    /// The record could not be encoded.
    Unexpected,
}

impl FailureKind {
    /// Exit code the binary reports for a request that ended this way.
    pub fn code(&self) -> PanelCode {
        match self {
            FailureKind::Transport | FailureKind::Status(_) => PanelCode::RequestFailed,
            FailureKind::MalformedResponse => PanelCode::BadResponse,
            FailureKind::Unexpected => PanelCode::Internal,
        }
    }
}

/// Failure surfaced to the user as a single message.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionFailure {
    pub kind: FailureKind,
    message: String,
}

impl PredictionFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNEXPECTED_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn status(code: u16) -> Self {
        Self::new(FailureKind::Status(code), STATUS_FAILURE_MESSAGE)
    }

    pub fn malformed_response(err: PanelError) -> Self {
        Self::new(FailureKind::MalformedResponse, err.to_string())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unexpected, message)
    }

    /// User-visible message; never empty.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PredictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of the single prediction request a session can have in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(PredictionResult),
    Failed(PredictionFailure),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PredictionFailure> {
        match self {
            RequestState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_shape() {
        let result = PredictionResult::from_slice(
            br#"{"diagnosis":"Alzheimer Positivo","probability_positive":0.87}"#,
        )
        .unwrap();
        assert_eq!(result.diagnosis, "Alzheimer Positivo");
        assert!(result.is_positive());
        assert_eq!(result.probability_percent(), "87.00%");
    }

    #[test]
    fn ignores_extra_keys() {
        let result = PredictionResult::from_slice(
            br#"{"diagnosis":"Alzheimer Negativo","probability_positive":0.1234,"model":"rf-v2"}"#,
        )
        .unwrap();
        assert!(!result.is_positive());
        assert_eq!(result.probability_percent(), "12.34%");
    }

    #[test]
    fn percent_formatting_edges() {
        let at = |p| PredictionResult {
            diagnosis: "x".into(),
            probability_positive: p,
        };
        assert_eq!(at(0.0).probability_percent(), "0.00%");
        assert_eq!(at(1.0).probability_percent(), "100.00%");
        assert_eq!(at(0.5).probability_percent(), "50.00%");
    }

    #[test]
    fn rejects_malformed_bodies() {
        let bodies: [&[u8]; 7] = [
            b"",
            b"<html>oops</html>",
            br#"{"diagnosis":"Alzheimer Positivo"}"#,
            br#"{"probability_positive":0.3}"#,
            br#"{"diagnosis":"","probability_positive":0.3}"#,
            br#"{"diagnosis":"Alzheimer Positivo","probability_positive":1.5}"#,
            br#"{"diagnosis":"Alzheimer Positivo","probability_positive":"0.3"}"#,
        ];
        for body in bodies {
            let err = PredictionResult::from_slice(body).unwrap_err();
            assert!(
                matches!(err, PanelError::MalformedResponse(_)),
                "{}: {err}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn failure_messages_are_never_empty() {
        assert_eq!(
            PredictionFailure::status(500).message(),
            STATUS_FAILURE_MESSAGE
        );
        assert_eq!(
            PredictionFailure::transport("  ").message(),
            UNEXPECTED_FAILURE_MESSAGE
        );
        assert_eq!(PredictionFailure::status(503).kind, FailureKind::Status(503));
    }

    #[test]
    fn state_accessors() {
        assert_eq!(RequestState::default(), RequestState::Idle);
        assert!(RequestState::Pending.is_pending());
        let failed = RequestState::Failed(PredictionFailure::status(502));
        assert!(failed.result().is_none());
        assert_eq!(failed.failure().unwrap().kind, FailureKind::Status(502));
        assert_eq!(failed.as_str(), "failed");
        assert_eq!(RequestState::Idle.as_str(), "idle");
        assert_eq!(RequestState::Pending.as_str(), "pending");
    }

    #[test]
    fn failure_kinds_map_to_exit_codes() {
        assert_eq!(FailureKind::Transport.code(), PanelCode::RequestFailed);
        assert_eq!(FailureKind::Status(500).code(), PanelCode::RequestFailed);
        assert_eq!(FailureKind::MalformedResponse.code(), PanelCode::BadResponse);
        assert_eq!(FailureKind::Unexpected.code(), PanelCode::Internal);
    }
}
