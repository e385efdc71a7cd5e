//! Form state: applies control events to the patient record.

use tracing::debug;

use crate::common::error::{PanelError, PanelResult};

use super::domain::{Field, FieldKind, PatientRecord};

/// A single control event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldInput<'a> {
    /// Range control moved; carries the control's raw text value.
    Slider(&'a str),
    /// Checkbox toggled.
    Toggle(bool),
}

impl FieldInput<'_> {
    fn kind(&self) -> FieldKind {
        match self {
            FieldInput::Slider(_) => FieldKind::Continuous,
            FieldInput::Toggle(_) => FieldKind::Binary,
        }
    }
}

/// Pure update: resolve `name`, convert `input` and return the new record.
/// On any error the caller's record is left as it was.
pub fn apply(record: &PatientRecord, name: &str, input: FieldInput<'_>) -> PanelResult<PatientRecord> {
    let field: Field = name.parse()?;
    if input.kind() != field.kind() {
        return Err(PanelError::KindMismatch {
            field: field.name(),
            expected: field.kind(),
        });
    }

    let value = match input {
        FieldInput::Toggle(checked) => {
            if checked {
                1.0
            } else {
                0.0
            }
        }
        FieldInput::Slider(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| PanelError::InvalidValue {
                field: field.name(),
                raw: raw.to_string(),
            })?,
    };

    record.with_value(field, value)
}

/// Owns the current record for one session.
#[derive(Clone, Debug, Default)]
pub struct FormStore {
    record: PatientRecord,
}

impl FormStore {
    /// Start a session from the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: PatientRecord) -> Self {
        Self { record }
    }

    /// Copy of the current record. Later updates never change a copy.
    pub fn record(&self) -> PatientRecord {
        self.record
    }

    /// Apply one control event and return the resulting record.
    pub fn set_field(&mut self, name: &str, input: FieldInput<'_>) -> PanelResult<PatientRecord> {
        match apply(&self.record, name, input) {
            Ok(next) => {
                debug!(field = name, ?input, "form field updated");
                self.record = next;
                Ok(next)
            }
            Err(err) => {
                debug!(field = name, ?input, error = %err, "form update rejected");
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.record = PatientRecord::defaults();
    }
}
