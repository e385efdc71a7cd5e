//! Form flags shared by the `body` and `predict` commands.

use std::path::PathBuf;

use clap::Args;

use crate::common::error::{PanelError, PanelResult};
use crate::patient::domain::{Field, PatientRecord};
use crate::patient::service::{FieldInput, FormStore};

#[derive(Args, Clone, Debug, Default)]
pub struct FormArgs {
    /// Start from a saved JSON record instead of the defaults.
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Set a continuous field, e.g. `--set Age=80`.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Check a yes/no field.
    #[arg(long = "on", value_name = "NAME")]
    pub on: Vec<String>,

    /// Uncheck a yes/no field.
    #[arg(long = "off", value_name = "NAME")]
    pub off: Vec<String>,

    /// Clamp and step `--set` values to the field's control bounds.
    #[arg(long)]
    pub snap: bool,
}

impl FormArgs {
    /// Apply the flags in order: record file, `--set`, `--on`, `--off`.
    /// The first rejected edit aborts the whole build.
    pub fn build(&self) -> PanelResult<FormStore> {
        let mut store = match &self.record {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    PanelError::ReadRecord {
                        path: path.clone(),
                        source,
                    }
                })?;
                FormStore::from_record(PatientRecord::from_json(&raw)?)
            }
            None => FormStore::new(),
        };

        for pair in &self.set {
            let (name, raw) = pair
                .split_once('=')
                .ok_or_else(|| PanelError::MalformedAssignment(pair.clone()))?;
            let raw = if self.snap {
                snapped(name, raw)
            } else {
                raw.to_string()
            };
            store.set_field(name, FieldInput::Slider(&raw))?;
        }
        for name in &self.on {
            store.set_field(name, FieldInput::Toggle(true))?;
        }
        for name in &self.off {
            store.set_field(name, FieldInput::Toggle(false))?;
        }

        Ok(store)
    }
}

/// Anything that cannot be snapped is passed through for the form to reject.
fn snapped(name: &str, raw: &str) -> String {
    let bounds = Field::from_name(name).and_then(|field| field.spec().control);
    match (bounds, raw.trim().parse::<f64>()) {
        (Some(bounds), Ok(value)) if value.is_finite() => bounds.snap(value).to_string(),
        _ => raw.to_string(),
    }
}
