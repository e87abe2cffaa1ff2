//! Fitted artifacts shared by training and inference.
//!
//! The scaler artifact carries the imputation medians and the standardization
//! statistics; the classifier artifact carries the logistic weights. Both
//! record the feature names they were fitted on, so a pair can be checked
//! against [`FEATURE_NAMES`] before it is used.

use serde::{Deserialize, Serialize};

use super::imputer::ZeroMedianImputer;
use super::logistic::LogisticRegression;
use super::patient::{FEATURE_COUNT, FEATURE_NAMES};
use super::scaler::StandardScaler;

/// Which rows the imputation medians are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImputationScope {
    /// Medians over the whole dataset, before the split. Test-set values
    /// leak into the medians used for training.
    #[default]
    FullDataset,
    /// Medians over the training split only.
    TrainingSplit,
}

impl std::fmt::Display for ImputationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullDataset => write!(f, "full-dataset"),
            Self::TrainingSplit => write!(f, "training-split"),
        }
    }
}

/// Preprocessing fitted during training: imputation then standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub feature_names: Vec<String>,
    pub imputer: ZeroMedianImputer,
    pub scaler: StandardScaler,
}

/// How a classifier was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProvenance {
    pub split_seed: u64,
    pub test_ratio: f64,
    pub imputation_scope: ImputationScope,
    pub train_size: usize,
    pub test_size: usize,
    pub held_out_accuracy: f64,
    pub trained_at: chrono::DateTime<chrono::Utc>,
}

/// Fitted classifier plus the feature order it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub feature_names: Vec<String>,
    pub model: LogisticRegression,
    #[serde(default)]
    pub provenance: Option<TrainingProvenance>,
}

/// The persisted (scaler, classifier) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPair {
    pub scaler: ScalerArtifact,
    pub classifier: ClassifierArtifact,
}

/// Reasons a loaded pair cannot serve this build's feature contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompatibilityError {
    #[error("{artifact} was fitted on features {found:?}, expected {expected:?}")]
    FeatureNames {
        artifact: &'static str,
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("{artifact} holds {found} {what}, expected {expected}")]
    Length {
        artifact: &'static str,
        what: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("{artifact} contains a non-finite {what}")]
    NonFinite {
        artifact: &'static str,
        what: &'static str,
    },

    #[error("scaler has zero scale for feature '{0}'")]
    ZeroScale(&'static str),
}

/// Feature names of this build, as owned strings.
#[must_use]
pub fn expected_feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
}

fn check_len(
    artifact: &'static str,
    what: &'static str,
    found: usize,
) -> Result<(), CompatibilityError> {
    if found == FEATURE_COUNT {
        Ok(())
    } else {
        Err(CompatibilityError::Length {
            artifact,
            what,
            found,
            expected: FEATURE_COUNT,
        })
    }
}

fn check_finite<'a>(
    artifact: &'static str,
    what: &'static str,
    values: impl IntoIterator<Item = &'a f64>,
) -> Result<(), CompatibilityError> {
    if values.into_iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CompatibilityError::NonFinite { artifact, what })
    }
}

impl ArtifactPair {
    /// Verify both artifacts were fitted on this build's features, in order,
    /// and hold usable numbers.
    ///
    /// # Errors
    /// Returns the first incompatibility found.
    pub fn check_compatible(&self) -> Result<(), CompatibilityError> {
        let expected = expected_feature_names();
        for (artifact, names) in [
            ("scaler", &self.scaler.feature_names),
            ("classifier", &self.classifier.feature_names),
        ] {
            if *names != expected {
                return Err(CompatibilityError::FeatureNames {
                    artifact,
                    found: names.clone(),
                    expected,
                });
            }
        }

        check_len("scaler", "imputation medians", self.scaler.imputer.n_features())?;
        check_len("scaler", "means", self.scaler.scaler.mean.len())?;
        check_len("scaler", "scales", self.scaler.scaler.scale.len())?;
        check_len("classifier", "weights", self.classifier.model.n_features())?;

        check_finite("scaler", "mean", &self.scaler.scaler.mean)?;
        check_finite("scaler", "scale", &self.scaler.scaler.scale)?;
        if let Some(idx) = self.scaler.scaler.scale.iter().position(|s| *s == 0.0) {
            return Err(CompatibilityError::ZeroScale(FEATURE_NAMES[idx]));
        }
        check_finite(
            "scaler",
            "imputation median",
            self.scaler.imputer.medians.iter().flatten(),
        )?;
        check_finite("classifier", "weight", &self.classifier.model.weights)?;
        check_finite(
            "classifier",
            "intercept",
            std::iter::once(&self.classifier.model.intercept),
        )?;

        Ok(())
    }

    /// Impute then standardize a raw feature vector.
    #[must_use]
    pub fn preprocess(&self, raw: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        let imputed = self.scaler.imputer.transform(raw);
        self.scaler.scaler.transform(&imputed)
    }

    /// Raw probability of class 1 for a raw feature vector.
    #[must_use]
    pub fn probability(&self, raw: &[f64; FEATURE_COUNT]) -> f64 {
        self.classifier.model.predict_proba(&self.preprocess(raw))
    }
}
