//! Plain-text rendering for the terminal front-end.

use std::fmt::Write;

use crate::patient::domain::{FieldKind, PatientRecord, FIELD_SPECS};

use super::view::{PanelView, Tone};

/// Marks a value a slider could not have produced, e.g. one loaded from a file.
pub const OUT_OF_RANGE_NOTE: &str = "(outside control range)";

/// Two sections: range controls first, then the
/// yes/no toggles. Fields without a control are not shown.
pub fn render_form(record: &PatientRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Clinical and lifestyle data");
    for spec in FIELD_SPECS {
        let Some(bounds) = spec.control else { continue };
        let value = record.get(spec.field);
        let unit = if spec.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", spec.unit)
        };
        let note = if bounds.contains(value) {
            String::new()
        } else {
            format!(" {OUT_OF_RANGE_NOTE}")
        };
        let _ = writeln!(out, "  {:<32} {}{}{}", spec.label, value, unit, note);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "History and symptoms (yes/no)");
    for spec in FIELD_SPECS.iter().filter(|s| s.kind == FieldKind::Binary) {
        let mark = if record.is_checked(spec.field) { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}", spec.label);
    }

    out
}

/// Table of every field with its wire name, kind, default and control bounds.
pub fn render_fields() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:<10} {:>8}  {}",
        "FIELD", "KIND", "DEFAULT", "CONTROL"
    );
    for spec in FIELD_SPECS {
        let control = match (spec.kind, spec.control) {
            (FieldKind::Binary, _) => "toggle".to_string(),
            (_, Some(b)) => format!("{}..={} step {}", b.min, b.max, b.step),
            (_, None) => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<26} {:<10} {:>8}  {}",
            spec.name, spec.kind, spec.default, control
        );
    }
    out
}

pub fn render_panel(view: &PanelView) -> String {
    let mut out = String::new();
    if view.loading {
        let _ = writeln!(out, "{}", view.submit_label);
        return out;
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Prediction error");
        let _ = writeln!(out, "  {error}");
    }
    if let Some(card) = &view.result {
        let tone = match card.tone {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
        };
        let _ = writeln!(out, "Analysis result ({tone})");
        let _ = writeln!(out, "  {}", card.diagnosis);
        let _ = writeln!(out, "  Probability (positive): {}", card.probability);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::domain::Field;
    use crate::prediction::domain::{PredictionFailure, PredictionResult, RequestState};

    #[test]
    fn form_lists_controls_and_toggles() {
        let record = PatientRecord::defaults()
            .with_value(Field::Smoking, 1.0)
            .unwrap();
        let text = render_form(&record);
        assert!(text.contains("28.5"));
        assert!(text.contains("[x] Smoker"));
        assert!(text.contains("[ ] Diabetes"));
        assert!(!text.contains("Ethnicity"));
        assert!(!text.contains(OUT_OF_RANGE_NOTE));
    }

    #[test]
    fn form_flags_values_outside_the_control_range() {
        let record = PatientRecord::defaults()
            .with_value(Field::Age, 120.0)
            .unwrap();
        let text = render_form(&record);
        let age_line = text.lines().find(|l| l.trim_start().starts_with("Age ")).unwrap();
        assert!(age_line.contains(OUT_OF_RANGE_NOTE), "{age_line}");
        assert_eq!(text.matches(OUT_OF_RANGE_NOTE).count(), 1);
    }

    #[test]
    fn field_table_has_a_row_per_field() {
        let text = render_fields();
        assert_eq!(text.lines().count(), FIELD_SPECS.len() + 1);
        assert!(text.contains("40..=100 step 1"));
    }

    #[test]
    fn panel_shows_percentage() {
        let state = RequestState::Succeeded(PredictionResult {
            diagnosis: "Alzheimer Positivo".into(),
            probability_positive: 0.87,
        });
        let text = render_panel(&PanelView::from_state(&state));
        assert!(text.contains("Alzheimer Positivo"));
        assert!(text.contains("87.00%"));
    }

    #[test]
    fn panel_shows_error() {
        let state = RequestState::Failed(PredictionFailure::transport("connection refused"));
        let text = render_panel(&PanelView::from_state(&state));
        assert!(text.contains("connection refused"));
    }
}
