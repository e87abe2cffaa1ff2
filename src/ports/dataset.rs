//! Dataset port: Trait for loading labelled training data.
//!
//! Abstracts the dataset format (CSV) from the training pipeline.

use crate::domain::LabeledRecord;

/// Source of labelled training records.
pub trait DatasetSource: Send + Sync {
    /// Error type for dataset loading.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every record, in file order.
    ///
    /// # Errors
    /// Returns error if the dataset is missing, unreadable or malformed.
    fn load(&self) -> Result<Vec<LabeledRecord>, Self::Error>;

    /// Human-readable origin for logs and reports.
    fn describe(&self) -> String;
}
