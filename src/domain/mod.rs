//! Domain layer: Core types and the model math.
//!
//! Pure Rust with no I/O. Everything here is deterministic and serializable.

pub mod artifacts;
mod diagnosis;
mod error;
pub mod imputer;
pub mod logistic;
pub mod metrics;
mod patient;
pub mod scaler;

pub use artifacts::{
    ArtifactPair, ClassifierArtifact, CompatibilityError, ImputationScope, ScalerArtifact,
    TrainingProvenance,
};
pub use diagnosis::{PredictionResult, RiskClass, DECISION_THRESHOLD};
pub use error::FitError;
pub use imputer::ZeroMedianImputer;
pub use logistic::{LogisticConfig, LogisticRegression};
pub use metrics::{ClassMetrics, ConfusionMatrix, EvaluationReport};
pub use patient::{
    FeatureRecord, InvalidRecord, LabeledRecord, ValidationError, FEATURE_COUNT, FEATURE_NAMES,
    LABEL_COLUMN, ZERO_AS_MISSING,
};
pub use scaler::StandardScaler;
