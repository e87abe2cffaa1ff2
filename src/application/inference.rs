//! Inference service: Scores one patient record against the loaded model.
//!
//! The artifact pair is loaded once, before the service accepts requests, and
//! is read-only afterwards. Predictions are pure functions of the record, so
//! the service can be shared across request handlers behind an `Arc`.

use serde_json::Value;

use crate::domain::{ArtifactPair, FeatureRecord, InvalidRecord, PredictionResult};
use crate::ports::ArtifactStore;
use crate::GlucoguardError;

/// Service for scoring feature records.
#[derive(Debug, Clone)]
pub struct InferenceService {
    artifacts: ArtifactPair,
}

impl InferenceService {
    /// Wrap an in-memory pair after checking it fits this build's features.
    ///
    /// # Errors
    /// Returns `GlucoguardError::Artifact` if the pair is incompatible.
    pub fn from_artifacts(artifacts: ArtifactPair) -> Result<Self, GlucoguardError> {
        artifacts
            .check_compatible()
            .map_err(crate::adapters::ArtifactError::from)?;
        Ok(Self { artifacts })
    }

    /// Load the pair from a store.
    ///
    /// # Errors
    /// Returns error if either artifact is missing, unreadable or incompatible.
    pub fn load<S>(store: &S) -> Result<Self, GlucoguardError>
    where
        S: ArtifactStore,
        S::Error: Into<GlucoguardError>,
    {
        tracing::info!("Loading model artifacts...");
        let artifacts = store.load().map_err(Into::into)?;
        let service = Self::from_artifacts(artifacts)?;

        if let Some(provenance) = &service.artifacts.classifier.provenance {
            tracing::info!(
                "Model trained at {} (seed={}, held-out accuracy={:.4})",
                provenance.trained_at,
                provenance.split_seed,
                provenance.held_out_accuracy
            );
        }
        Ok(service)
    }

    #[must_use]
    pub fn artifacts(&self) -> &ArtifactPair {
        &self.artifacts
    }

    /// Score a typed record.
    ///
    /// Zeros in the clinical columns are replaced with the training medians
    /// before standardization.
    ///
    /// # Errors
    /// Returns `InvalidRecord` if any feature is non-finite or out of range.
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, InvalidRecord> {
        record.validate()?;

        let probability = self.artifacts.probability(&record.to_array());
        let result = PredictionResult::new(probability);

        tracing::info!(
            "Inference complete: class={}, probability={:.2}",
            result.class,
            result.rounded_probability()
        );
        Ok(result)
    }

    /// Score an untyped JSON body.
    ///
    /// # Errors
    /// Returns `InvalidRecord` listing every missing, non-numeric or
    /// out-of-range field.
    pub fn predict_json(&self, body: &Value) -> Result<PredictionResult, InvalidRecord> {
        let record = FeatureRecord::from_json(body).map_err(|e| {
            tracing::warn!("Rejected prediction request: {} violation(s)", e.errors().len());
            e
        })?;
        self.predict(&record)
    }
}
