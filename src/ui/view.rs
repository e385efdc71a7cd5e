//! What a front-end shows for a given request state.

use crate::prediction::domain::RequestState;

pub const SUBMIT_LABEL: &str = "Generate diagnosis";
pub const SUBMIT_LABEL_PENDING: &str = "Processing...";

/// Colour family of the result card.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Tone {
    Positive,
    Negative,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultCard {
    pub diagnosis: String,
    /// Already formatted, e.g. `87.00%`.
    pub probability: String,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub loading: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub result: Option<ResultCard>,
}

impl PanelView {
    pub fn from_state(state: &RequestState) -> Self {
        let loading = state.is_pending();
        let result = state.result().map(|result| ResultCard {
            diagnosis: result.diagnosis.clone(),
            probability: result.probability_percent(),
            tone: if result.is_positive() {
                Tone::Positive
            } else {
                Tone::Negative
            },
        });

        Self {
            loading,
            submit_enabled: !loading,
            submit_label: if loading {
                SUBMIT_LABEL_PENDING
            } else {
                SUBMIT_LABEL
            },
            error: state.failure().map(|f| f.message().to_string()),
            result,
        }
    }
}
