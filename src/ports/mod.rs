//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the use cases and external systems (dataset files, artifact storage).

mod artifacts;
mod dataset;

pub use artifacts::ArtifactStore;
pub use dataset::DatasetSource;
