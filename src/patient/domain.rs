//! Patient record: a closed set of named numeric fields.
//!
//! The record is a small `Copy` value. Updates never touch the value a caller
//! already holds; they return a new record with one field replaced.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::error::{PanelError, PanelResult};

/// How a field is entered and encoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// Real number, entered through a range control.
    Continuous,
    /// Yes/no flag, encoded as the integers 0 and 1.
    Binary,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Continuous => "continuous",
            FieldKind::Binary => "binary",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Bounds of a range control. These are input affordances, the record itself
/// accepts any finite value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderBounds {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp to `[min, max]` and round to the nearest step counted from `min`,
    /// the way a range control settles its thumb.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Strip float noise such as 28.500000000000004.
        let snapped = (snapped * 1e9).round() / 1e9;
        snapped.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Static description of one field.
#[derive(Copy, Clone, Debug)]
pub struct FieldSpec {
    pub field: Field,
    /// Wire name, preserved verbatim in request bodies.
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub kind: FieldKind,
    pub default: f64,
    /// `None` for binary fields and for fields no control exposes.
    pub control: Option<SliderBounds>,
}

macro_rules! patient_fields {
    ($(($variant:ident, $kind:ident, $default:expr, $control:expr, $label:expr, $unit:expr)),+ $(,)?) => {
        /// Closed set of record fields, in wire order. Variant names are the
        /// wire names.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub enum Field {
            $($variant),+
        }

        /// One entry per [`Field`], indexed by discriminant.
        pub const FIELD_SPECS: &[FieldSpec] = &[
            $(FieldSpec {
                field: Field::$variant,
                name: stringify!($variant),
                label: $label,
                unit: $unit,
                kind: FieldKind::$kind,
                default: $default,
                control: $control,
            }),+
        ];
    };
}

const fn slider(min: f64, max: f64, step: f64) -> Option<SliderBounds> {
    Some(SliderBounds::new(min, max, step))
}

patient_fields![
    (Age, Continuous, 75.0, slider(40.0, 100.0, 1.0), "Age", "years"),
    (Gender, Binary, 0.0, None, "Gender (1=M, 0=F)", ""),
    (Ethnicity, Continuous, 0.0, None, "Ethnicity", ""),
    (EducationLevel, Continuous, 2.0, slider(0.0, 4.0, 1.0), "Education level", ""),
    (BMI, Continuous, 28.5, slider(15.0, 50.0, 0.1), "BMI", ""),
    (Smoking, Binary, 0.0, None, "Smoker", ""),
    (AlcoholConsumption, Continuous, 3.5, slider(0.0, 20.0, 0.5), "Alcohol consumption", "units/week"),
    (PhysicalActivity, Continuous, 4.0, slider(0.0, 20.0, 0.5), "Physical activity", "hours/week"),
    (DietQuality, Continuous, 6.5, slider(0.0, 10.0, 0.5), "Diet quality (0-10)", ""),
    (SleepQuality, Continuous, 7.0, slider(0.0, 10.0, 0.5), "Sleep quality (0-10)", ""),
    (FamilyHistoryAlzheimers, Binary, 1.0, None, "Family history of Alzheimer's", ""),
    (CardiovascularDisease, Binary, 1.0, None, "Cardiovascular disease", ""),
    (Diabetes, Binary, 0.0, None, "Diabetes", ""),
    (Depression, Binary, 0.0, None, "Depression", ""),
    (HeadInjury, Binary, 0.0, None, "Head injury", ""),
    (Hypertension, Binary, 1.0, None, "Hypertension", ""),
    (SystolicBP, Continuous, 140.0, slider(90.0, 200.0, 1.0), "Systolic pressure", "mmHg"),
    (DiastolicBP, Continuous, 90.0, slider(60.0, 120.0, 1.0), "Diastolic pressure", "mmHg"),
    (CholesterolTotal, Continuous, 200.0, slider(100.0, 300.0, 1.0), "Total cholesterol", "mg/dL"),
    (CholesterolLDL, Continuous, 130.0, slider(50.0, 200.0, 1.0), "LDL cholesterol", "mg/dL"),
    (CholesterolHDL, Continuous, 50.0, slider(20.0, 100.0, 1.0), "HDL cholesterol", "mg/dL"),
    (CholesterolTriglycerides, Continuous, 150.0, slider(50.0, 300.0, 1.0), "Triglycerides", "mg/dL"),
    (MMSE, Continuous, 25.0, slider(0.0, 30.0, 1.0), "MMSE score", ""),
    (FunctionalAssessment, Continuous, 7.0, slider(0.0, 10.0, 1.0), "Functional assessment (0-10)", ""),
    (MemoryComplaints, Binary, 1.0, None, "Memory complaints", ""),
    (BehavioralProblems, Binary, 0.0, None, "Behavioral problems", ""),
    (ADL, Continuous, 8.0, slider(0.0, 10.0, 1.0), "ADL score", ""),
    (Confusion, Binary, 0.0, None, "Confusion", ""),
    (Disorientation, Binary, 0.0, None, "Disorientation", ""),
    (PersonalityChanges, Binary, 0.0, None, "Personality changes", ""),
    (DifficultyCompletingTasks, Binary, 1.0, None, "Difficulty completing tasks", ""),
    (Forgetfulness, Binary, 1.0, None, "Forgetfulness", ""),
];

/// Number of fields in a record.
pub const FIELD_COUNT: usize = FIELD_SPECS.len();

impl Field {
    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    /// All fields in wire order.
    pub fn all() -> impl Iterator<Item = Field> {
        FIELD_SPECS.iter().map(|spec| spec.field)
    }

    pub fn from_name(name: &str) -> Option<Field> {
        FIELD_SPECS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.field)
    }
}

impl FromStr for Field {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_name(s).ok_or_else(|| PanelError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Full set of patient inputs sent to the prediction endpoint.
///
/// Every field is always present and finite; binary fields hold exactly 0 or
/// 1. The only way to change a value is [`PatientRecord::with_value`], which
/// checks both.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct PatientRecord {
    values: [f64; FIELD_COUNT],
}

impl PatientRecord {
    /// Record holding the documented default for every field.
    pub fn defaults() -> Self {
        let mut values = [0.0; FIELD_COUNT];
        for spec in FIELD_SPECS {
            values[spec.field as usize] = spec.default;
        }
        Self { values }
    }

    pub fn get(&self, field: Field) -> f64 {
        self.values[field as usize]
    }

    /// True when a binary field is set.
    pub fn is_checked(&self, field: Field) -> bool {
        self.get(field) == 1.0
    }

    /// Return a copy with `field` replaced by `value`.
    pub fn with_value(&self, field: Field, value: f64) -> PanelResult<Self> {
        let value = check_value(field, value)?;
        let mut next = *self;
        next.values[field as usize] = value;
        Ok(next)
    }

    /// Iterate `(field, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::all().map(move |field| (field, self.get(field)))
    }

    /// Parse a record from a JSON object shaped like a request body.
    pub fn from_json(raw: &str) -> PanelResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> PanelResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self::defaults()
    }
}

fn check_value(field: Field, value: f64) -> PanelResult<f64> {
    if !value.is_finite() {
        return Err(PanelError::InvalidValue {
            field: field.name(),
            raw: value.to_string(),
        });
    }
    if field.kind() == FieldKind::Binary && value != 0.0 && value != 1.0 {
        return Err(PanelError::NotBinary {
            field: field.name(),
            value,
        });
    }
    // Normalise -0.0 so the wire never carries a signed zero.
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl Serialize for PatientRecord {
    /// Binary fields and integral values go out as JSON integers (`75`, not
    /// `75.0`), everything else as floats.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            match field.kind() {
                FieldKind::Binary => map.serialize_entry(field.name(), &(value as u8))?,
                FieldKind::Continuous if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT => {
                    map.serialize_entry(field.name(), &(value as i64))?
                }
                FieldKind::Continuous => map.serialize_entry(field.name(), &value)?,
            }
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, f64>> for PatientRecord {
    type Error = PanelError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut values = [0.0; FIELD_COUNT];
        let mut seen = [false; FIELD_COUNT];
        for (name, value) in raw {
            let field: Field = name.parse()?;
            values[field as usize] = check_value(field, value)?;
            seen[field as usize] = true;
        }
        if let Some(missing) = Field::all().find(|f| !seen[*f as usize]) {
            return Err(PanelError::MissingField(missing.name()));
        }
        Ok(Self { values })
    }
}
