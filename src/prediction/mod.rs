//! Prediction domain: request lifecycle, transport seam and response types.

pub mod domain;
pub mod service;
pub mod transport;

pub use domain::{FailureKind, PredictionFailure, PredictionResult, RequestState, POSITIVE_DIAGNOSIS};
pub use service::PredictionController;
pub use transport::{HttpTransport, PredictionTransport, TransportError, TransportResponse};
