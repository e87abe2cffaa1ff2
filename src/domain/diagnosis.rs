//! Prediction result types.
//!
//! Represents the output of the diabetes risk classifier.

use serde::{Deserialize, Serialize};

/// Probability at or above which a subject is classified as at risk.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    /// Outcome 0: no apparent diabetes risk
    NoRisk,
    /// Outcome 1: diabetes risk detected
    Risk,
}

impl RiskClass {
    /// Classify a raw probability of the positive class.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= DECISION_THRESHOLD {
            Self::Risk
        } else {
            Self::NoRisk
        }
    }

    /// Outcome label as used in the dataset and on the wire (0 or 1).
    #[must_use]
    pub fn label(self) -> u8 {
        match self {
            Self::NoRisk => 0,
            Self::Risk => 1,
        }
    }

    /// Human-readable message shown to the operator.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NoRisk => "Sin riesgo aparente",
            Self::Risk => "Riesgo de diabetes detectado",
        }
    }
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRisk => write!(f, "NO_RISK"),
            Self::Risk => write!(f, "RISK"),
        }
    }
}

/// Result of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw probability of class 1 (full precision)
    pub probability: f64,

    /// Predicted class
    pub class: RiskClass,
}

impl PredictionResult {
    /// Create a result from the raw positive-class probability.
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            class: RiskClass::from_probability(probability),
        }
    }

    /// Probability rounded to two decimals for external reporting.
    ///
    /// Exact ties round to even, so 0.125 reports as 0.12.
    #[must_use]
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 100.0).round_ties_even() / 100.0
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.class.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_probability() {
        assert_eq!(RiskClass::from_probability(0.1), RiskClass::NoRisk);
        assert_eq!(RiskClass::from_probability(0.4999), RiskClass::NoRisk);
        assert_eq!(RiskClass::from_probability(0.5), RiskClass::Risk);
        assert_eq!(RiskClass::from_probability(0.9), RiskClass::Risk);
    }

    #[test]
    fn test_labels_and_messages() {
        assert_eq!(RiskClass::NoRisk.label(), 0);
        assert_eq!(RiskClass::Risk.label(), 1);
        assert_eq!(RiskClass::Risk.message(), "Riesgo de diabetes detectado");
        assert_eq!(RiskClass::NoRisk.message(), "Sin riesgo aparente");
    }

    #[test]
    fn test_rounding_keeps_raw_probability() {
        let result = PredictionResult::new(0.73456);
        assert!((result.rounded_probability() - 0.73).abs() < 1e-12);
        assert!((result.probability - 0.73456).abs() < 1e-12);
        assert_eq!(result.class, RiskClass::Risk);
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(PredictionResult::new(0.125).rounded_probability(), 0.12);
        assert_eq!(PredictionResult::new(0.375).rounded_probability(), 0.38);
        assert_eq!(PredictionResult::new(0.5).rounded_probability(), 0.5);
        assert_eq!(PredictionResult::new(0.7676).rounded_probability(), 0.77);
    }
}
