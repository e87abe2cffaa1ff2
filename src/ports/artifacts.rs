//! Artifact port: Trait for persisting the fitted (scaler, classifier) pair.
//!
//! Training writes through this port; the inference service reads through it
//! once at startup.

use crate::domain::ArtifactPair;

/// Persistent home of the artifact pair.
pub trait ArtifactStore: Send + Sync {
    /// Error type for artifact operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist both artifacts, replacing any previous pair.
    ///
    /// Implementations must never leave a partially written artifact behind.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    fn save(&self, artifacts: &ArtifactPair) -> Result<(), Self::Error>;

    /// Load and integrity-check the persisted pair.
    ///
    /// # Errors
    /// Returns error if either artifact is missing, corrupt or incompatible.
    fn load(&self) -> Result<ArtifactPair, Self::Error>;

    /// Whether a complete pair is present.
    fn exists(&self) -> bool;
}
