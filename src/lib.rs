// lib.rs - form state and prediction lifecycle for the Alzheimer panel
pub mod common;
pub mod patient;
pub mod prediction;
pub mod ui;

pub use common::{AppCfg, PanelError, PanelResult};
pub use patient::{FieldInput, FormStore, PatientRecord};
pub use prediction::{PredictionController, RequestState};
