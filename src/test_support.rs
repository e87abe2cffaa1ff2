//! Fixtures shared by unit tests.

use crate::adapters::csv_dataset::parse_records;
use crate::application::{fit_and_evaluate, InferenceService, TrainingOptions};
use crate::domain::LabeledRecord;

pub const SAMPLE_CSV: &str = include_str!("../testdata/diabetes_sample.csv");

/// The 40-row fixture table.
pub fn sample_records() -> Vec<LabeledRecord> {
    parse_records(SAMPLE_CSV.as_bytes()).expect("fixture parses")
}

/// A service backed by a model fitted on the fixture with default options.
pub fn trained_service() -> InferenceService {
    let outcome =
        fit_and_evaluate(&sample_records(), &TrainingOptions::default()).expect("fixture fits");
    InferenceService::from_artifacts(outcome.artifacts).expect("fresh pair is compatible")
}
