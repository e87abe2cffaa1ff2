//! Patient feature types for diabetes risk prediction.
//!
//! Based on the Pima Indians Diabetes dataset (NIDDK).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of clinical features consumed by the model.
pub const FEATURE_COUNT: usize = 8;

/// Feature names in model order. These are also the JSON wire names.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Name of the label column in the training dataset.
pub const LABEL_COLUMN: &str = "Outcome";

/// Columns where a recorded 0 means "not measured" (a living subject cannot
/// have zero glucose, blood pressure, skin fold, insulin or BMI).
pub const ZERO_AS_MISSING: [usize; 5] = [1, 2, 3, 4, 5];

/// Clinical features of one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureRecord {
    /// Number of pregnancies (whole number, >= 0)
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,

    /// Plasma glucose concentration, 2h oral glucose tolerance test (mg/dL)
    #[serde(rename = "Glucose")]
    pub glucose: f64,

    /// Diastolic blood pressure (mm Hg)
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,

    /// Triceps skin fold thickness (mm)
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,

    /// 2-hour serum insulin (uU/ml)
    #[serde(rename = "Insulin")]
    pub insulin: f64,

    /// Body mass index (kg/m^2)
    #[serde(rename = "BMI")]
    pub bmi: f64,

    /// Diabetes pedigree function (family history score, >= 0)
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree: f64,

    /// Age in years (whole number, >= 1)
    #[serde(rename = "Age")]
    pub age: f64,
}

/// A single constraint violation in a feature record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' must be a number")]
    NotNumeric(&'static str),

    #[error("field '{0}' must be a finite number")]
    NotFinite(&'static str),

    #[error("field '{field}' must be a whole number, got {value}")]
    NotWhole { field: &'static str, value: f64 },

    #[error("field '{field}' is outside its clinical range (must be >= {min}), got {value}")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        value: f64,
    },
}

/// All constraint violations found in one feature record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", describe(.0))]
pub struct InvalidRecord(pub Vec<ValidationError>);

impl InvalidRecord {
    /// The individual violations, in field order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FeatureRecord {
    /// Features as an array in model order.
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree,
            self.age,
        ]
    }

    /// Build a record from values in model order.
    #[must_use]
    pub fn from_array(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            pregnancies: v[0],
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree: v[6],
            age: v[7],
        }
    }

    /// Parse and validate a record from an untyped JSON request body.
    ///
    /// Every field is checked for presence and numeric type before any range
    /// check runs, and all violations are reported together. Unknown keys are
    /// ignored.
    ///
    /// # Errors
    /// Returns every violation found.
    pub fn from_json(body: &Value) -> Result<Self, InvalidRecord> {
        let Some(object) = body.as_object() else {
            return Err(InvalidRecord(vec![ValidationError::NotAnObject]));
        };

        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            match object.get(name) {
                None | Some(Value::Null) => errors.push(ValidationError::MissingField(name)),
                Some(v) => match v.as_f64() {
                    Some(x) => *slot = x,
                    None => errors.push(ValidationError::NotNumeric(name)),
                },
            }
        }

        if !errors.is_empty() {
            return Err(InvalidRecord(errors));
        }

        let record = Self::from_array(values);
        record.validate()?;
        Ok(record)
    }

    /// Validate that all features are finite and within their domain.
    ///
    /// Zero is accepted in every column; zeros in the imputed columns are
    /// filled in later from training medians.
    ///
    /// # Errors
    /// Returns every violation found.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        let mut errors = Vec::new();

        for (value, name) in self.to_array().into_iter().zip(FEATURE_NAMES) {
            if !value.is_finite() {
                errors.push(ValidationError::NotFinite(name));
                continue;
            }

            let min = if name == "Age" { 1.0 } else { 0.0 };
            if value < min {
                errors.push(ValidationError::BelowMinimum {
                    field: name,
                    min,
                    value,
                });
            }
            if matches!(name, "Pregnancies" | "Age") && value.fract() != 0.0 {
                errors.push(ValidationError::NotWhole { field: name, value });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvalidRecord(errors))
        }
    }
}

/// A training example: features plus the observed outcome (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub features: FeatureRecord,
    pub outcome: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_body() -> Value {
        json!({
            "Pregnancies": 6,
            "Glucose": 148,
            "BloodPressure": 72,
            "SkinThickness": 35,
            "Insulin": 0,
            "BMI": 33.6,
            "DiabetesPedigreeFunction": 0.627,
            "Age": 50
        })
    }

    #[test]
    fn test_to_array_follows_feature_order() {
        let record = FeatureRecord::from_json(&reference_body()).expect("valid record");
        let v = record.to_array();
        assert_eq!(v.len(), FEATURE_NAMES.len());
        assert!((v[0] - 6.0).abs() < f64::EPSILON);
        assert!((v[1] - 148.0).abs() < f64::EPSILON);
        assert!((v[5] - 33.6).abs() < f64::EPSILON);
        assert!((v[7] - 50.0).abs() < f64::EPSILON);
        assert_eq!(FeatureRecord::from_array(v), record);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let record = FeatureRecord::from_json(&reference_body()).expect("valid record");
        let encoded = serde_json::to_value(record).expect("serialize");
        assert_eq!(encoded["DiabetesPedigreeFunction"], json!(0.627));
        assert!(encoded.get("diabetes_pedigree").is_none());
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut body = reference_body();
        body.as_object_mut().unwrap().remove("Glucose");

        let err = FeatureRecord::from_json(&body).expect_err("must reject");
        assert_eq!(err.errors(), &[ValidationError::MissingField("Glucose")]);
        assert!(err.to_string().contains("Glucose"));
    }

    #[test]
    fn test_non_numeric_and_null_fields() {
        let mut body = reference_body();
        body["BMI"] = json!("33.6");
        body["Age"] = Value::Null;

        let err = FeatureRecord::from_json(&body).expect_err("must reject");
        assert_eq!(
            err.errors(),
            &[
                ValidationError::NotNumeric("BMI"),
                ValidationError::MissingField("Age"),
            ]
        );
    }

    #[test]
    fn test_rejects_non_object_body() {
        let err = FeatureRecord::from_json(&json!([1, 2, 3])).expect_err("must reject");
        assert_eq!(err.errors(), &[ValidationError::NotAnObject]);
    }

    #[test]
    fn test_range_validation() {
        let invalid = FeatureRecord {
            pregnancies: 1.5, // not whole
            age: 0.0,         // below 1
            diabetes_pedigree: -0.1,
            ..Default::default()
        };
        let err = invalid.validate().expect_err("must reject");
        assert_eq!(err.errors().len(), 3);

        let non_finite = FeatureRecord {
            glucose: f64::NAN,
            age: 30.0,
            ..Default::default()
        };
        assert_eq!(
            non_finite.validate().expect_err("must reject").errors(),
            &[ValidationError::NotFinite("Glucose")]
        );
    }

    #[test]
    fn test_negative_measurement_reports_clinical_range() {
        let mut body = reference_body();
        body["Glucose"] = json!(-1);

        let err = FeatureRecord::from_json(&body).expect_err("must reject");
        assert_eq!(
            err.errors(),
            &[ValidationError::BelowMinimum {
                field: "Glucose",
                min: 0.0,
                value: -1.0,
            }]
        );
        assert_eq!(
            err.to_string(),
            "field 'Glucose' is outside its clinical range (must be >= 0), got -1"
        );
    }

    #[test]
    fn test_zeros_in_imputed_columns_are_accepted() {
        let mut body = reference_body();
        for idx in ZERO_AS_MISSING {
            body[FEATURE_NAMES[idx]] = json!(0);
        }
        assert!(FeatureRecord::from_json(&body).is_ok());
    }
}
