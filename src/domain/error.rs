//! Errors raised while fitting preprocessing steps and the classifier.

/// Error type for model fitting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("Cannot fit on an empty sample")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Column '{column}' has no non-zero values; its median is undefined")]
    DegenerateColumn { column: String },

    #[error("Training labels contain a single class ({0}); need both 0 and 1")]
    SingleClass(u8),

    #[error("Label {0} is not a binary outcome")]
    InvalidLabel(u8),

    #[error("Logistic solver failed: {0}")]
    Solver(String),
}
