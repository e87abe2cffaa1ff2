//! # Glucoguard
//!
//! Diabetes risk prediction on the Pima Indians table.
//!
//! This crate provides:
//! - An offline pipeline that imputes, standardizes and fits an L2 logistic
//!   regression, evaluates it on a held-out split and persists the result
//! - An inference service that scores one patient record against the
//!   persisted pair, exposed over a small JSON HTTP API
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Feature records, preprocessing and model math, metrics
//! - `ports`: Trait definitions for the dataset and artifact storage
//! - `adapters`: Concrete implementations (CSV, JSON files, axum)
//! - `application`: Training and inference use cases

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{FeatureRecord, PredictionResult, RiskClass};

/// Main error type for Glucoguard
#[derive(Debug, thiserror::Error)]
pub enum GlucoguardError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid feature record: {0}")]
    Validation(#[from] domain::InvalidRecord),

    #[error("Model fitting failed: {0}")]
    Fit(#[from] domain::FitError),

    #[error("Configuration error: {0}")]
    Config(String),
}
