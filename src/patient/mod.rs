//! Patient domain: the field table, the record value and the form store.

pub mod domain;
pub mod service;

pub use domain::{Field, FieldKind, FieldSpec, PatientRecord, SliderBounds, FIELD_COUNT, FIELD_SPECS};
pub use service::{FieldInput, FormStore};
