//! CSV adapter: Implementation of DatasetSource.
//!
//! Reads the Pima diabetes table. Columns are matched by header name, so their
//! order in the file does not matter; extra columns are ignored.

use std::io::Read;
use std::path::PathBuf;

use crate::domain::{FeatureRecord, LabeledRecord, FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
use crate::ports::DatasetSource;

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found at {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Line {line}: column '{column}' has invalid value {value:?}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Line {line}: outcome must be 0 or 1, got {value:?}")]
    InvalidLabel { line: u64, value: String },

    #[error("Dataset contains no records")]
    Empty,
}

/// CSV file dataset.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for CsvDataset {
    type Error = DatasetError;

    fn load(&self) -> Result<Vec<LabeledRecord>, DatasetError> {
        let file = std::fs::File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DatasetError::NotFound(self.path.clone()),
            _ => DatasetError::Io(e),
        })?;

        let records = parse_records(file)?;
        tracing::info!(
            "Loaded dataset from {:?}: {} records, {} columns",
            self.path,
            records.len(),
            FEATURE_COUNT + 1
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse labelled records from CSV text with a header row.
///
/// # Errors
/// Returns error on missing columns, non-numeric or non-finite feature values,
/// non-binary outcomes, or an empty table.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<LabeledRecord>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DatasetError::MissingColumn(name))
    };

    let mut feature_cols = [0usize; FEATURE_COUNT];
    for (slot, name) in feature_cols.iter_mut().zip(FEATURE_NAMES) {
        *slot = position(name)?;
    }
    let label_col = position(LABEL_COLUMN)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);

        let mut values = [0.0; FEATURE_COUNT];
        for ((value, &col), name) in values.iter_mut().zip(&feature_cols).zip(FEATURE_NAMES) {
            let raw = row.get(col).unwrap_or_default();
            *value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::InvalidValue {
                    line,
                    column: name,
                    value: raw.to_string(),
                })?;
        }

        let raw_label = row.get(label_col).unwrap_or_default();
        let outcome = match raw_label.parse::<f64>() {
            Ok(v) if v == 0.0 => 0,
            Ok(v) if v == 1.0 => 1,
            _ => {
                return Err(DatasetError::InvalidLabel {
                    line,
                    value: raw_label.to_string(),
                })
            }
        };

        records.push(LabeledRecord {
            features: FeatureRecord::from_array(values),
            outcome,
        });
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(records)
}
