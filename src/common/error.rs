//! Error handling primitives shared across the crate.
//!
//! Request outcomes (transport failures, error statuses, malformed bodies) are
//! not errors at this level: they end up as `RequestState::Failed`. The
//! variants here cover invalid form input, refused submissions and setup.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::patient::domain::FieldKind;

/// Stable process exit codes for the binary.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PanelCode {
    /// Prediction succeeded, or the command had nothing to submit.
    Ok = 0,
    /// Form input was rejected.
    InvalidInput = 1,
    /// A submission is already in flight.
    Busy = 2,
    /// Configuration could not be read.
    Config = 3,
    /// The prediction endpoint answered with something unusable.
    BadResponse = 4,
    /// Catch-all for client setup, IO and encoding failures.
    Internal = 5,
    /// The request never got a usable answer (transport error or error status).
    RequestFailed = 6,
}

impl From<PanelCode> for ExitCode {
    fn from(code: PanelCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Canonical error type for the crate.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{field}` expects {expected} input")]
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
    },

    #[error("`{raw}` is not a valid number for field `{field}`")]
    InvalidValue { field: &'static str, raw: String },

    #[error("field `{field}` only accepts 0 or 1, got {value}")]
    NotBinary { field: &'static str, value: f64 },

    #[error("field `{0}` is missing")]
    MissingField(&'static str),

    #[error("expected NAME=VALUE, got `{0}`")]
    MalformedAssignment(String),

    #[error("a prediction request is already in flight")]
    SubmissionInFlight,

    #[error("invalid configuration value for {key}: `{value}`")]
    Config { key: &'static str, value: String },

    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),

    #[error("reading {}: {source}", path.display())]
    ReadRecord {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result alias used throughout the crate.
pub type PanelResult<T> = Result<T, PanelError>;

impl PanelError {
    /// Machine readable code for the error.
    pub fn code(&self) -> PanelCode {
        match self {
            PanelError::UnknownField(_)
            | PanelError::KindMismatch { .. }
            | PanelError::InvalidValue { .. }
            | PanelError::NotBinary { .. }
            | PanelError::MissingField(_)
            | PanelError::MalformedAssignment(_) => PanelCode::InvalidInput,
            PanelError::SubmissionInFlight => PanelCode::Busy,
            PanelError::Config { .. } => PanelCode::Config,
            PanelError::MalformedResponse(_) => PanelCode::BadResponse,
            PanelError::ReadRecord { .. } | PanelError::Json(_) | PanelError::Http(_) => {
                PanelCode::Internal
            }
        }
    }

    /// Validation helper for response bodies.
    pub fn malformed(msg: impl Into<String>) -> Self {
        PanelError::MalformedResponse(msg.into())
    }
}

/// Exit code for an error that reached the top of the binary. The first
/// `PanelError` in the cause chain decides; anything else is internal.
pub fn exit_code(err: &anyhow::Error) -> PanelCode {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PanelError>())
        .map(PanelError::code)
        .unwrap_or(PanelCode::Internal)
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(PanelCode::Ok as u8, 0);
        assert_eq!(PanelCode::InvalidInput as u8, 1);
        assert_eq!(PanelCode::Busy as u8, 2);
        assert_eq!(PanelCode::Config as u8, 3);
        assert_eq!(PanelCode::BadResponse as u8, 4);
        assert_eq!(PanelCode::Internal as u8, 5);
        assert_eq!(PanelCode::RequestFailed as u8, 6);
    }

    #[test]
    fn input_errors_share_a_code() {
        let errors = [
            PanelError::UnknownField("Height".into()),
            PanelError::InvalidValue {
                field: "Age",
                raw: "abc".into(),
            },
            PanelError::NotBinary {
                field: "Smoking",
                value: 2.0,
            },
            PanelError::MissingField("BMI"),
            PanelError::MalformedAssignment("Age".into()),
        ];
        for err in errors {
            assert_eq!(err.code(), PanelCode::InvalidInput, "{err}");
        }
        assert_eq!(PanelError::SubmissionInFlight.code(), PanelCode::Busy);
    }

    #[test]
    fn exit_code_reads_through_context() {
        let err = Err::<(), _>(PanelError::Config {
            key: "ALZPANEL_TIMEOUT_MS",
            value: "soon".into(),
        })
        .context("loading configuration")
        .unwrap_err();
        assert_eq!(exit_code(&err), PanelCode::Config);

        let bare = anyhow::Error::new(PanelError::UnknownField("Height".into()));
        assert_eq!(exit_code(&bare), PanelCode::InvalidInput);
    }

    #[test]
    fn foreign_errors_exit_as_internal() {
        let err = anyhow::anyhow!("something else broke");
        assert_eq!(exit_code(&err), PanelCode::Internal);
    }
}
