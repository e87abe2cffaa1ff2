//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the two use cases: offline training and online inference.

mod inference;
pub mod training;

pub use inference::InferenceService;
pub use training::{
    fit_and_evaluate, train_test_split, Split, TrainingOptions, TrainingOutcome, TrainingPipeline,
};
