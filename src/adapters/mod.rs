//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `csv_dataset`: csv for the labelled training table
//! - `json_store`: serde_json + sha2 for the persisted artifact pair
//! - `http`: axum for the prediction API
//! - `sanitize`: clinical value filtering for logs

pub mod csv_dataset;
pub mod http;
pub mod json_store;
pub mod sanitize;

pub use csv_dataset::{CsvDataset, DatasetError};
pub use json_store::{ArtifactError, JsonArtifactStore};
