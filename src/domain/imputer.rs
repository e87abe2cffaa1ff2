//! Zero-as-missing median imputation.
//!
//! In the clinical columns listed in [`ZERO_AS_MISSING`](super::patient::ZERO_AS_MISSING)
//! a recorded 0 is a placeholder for "not measured". Such values are replaced
//! with the median of the column's non-zero values.

use serde::{Deserialize, Serialize};

use super::error::FitError;
use super::patient::{FEATURE_COUNT, FEATURE_NAMES, ZERO_AS_MISSING};

/// Fitted per-column medians.
///
/// `medians[i]` is `None` for columns that are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroMedianImputer {
    pub medians: Vec<Option<f64>>,
}

impl ZeroMedianImputer {
    /// Learn the median of non-zero values for every zero-as-missing column.
    ///
    /// # Errors
    /// Returns `FitError::EmptyInput` for an empty sample and
    /// `FitError::DegenerateColumn` when an imputed column is all zeros.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyInput);
        }

        let mut medians = vec![None; FEATURE_COUNT];
        for col in ZERO_AS_MISSING {
            let present: Vec<f64> = rows.iter().map(|r| r[col]).filter(|&x| x != 0.0).collect();
            let median = median(present).ok_or_else(|| FitError::DegenerateColumn {
                column: FEATURE_NAMES[col].to_string(),
            })?;
            medians[col] = Some(median);
        }

        Ok(Self { medians })
    }

    /// Replace zeros in the imputed columns with the fitted medians.
    #[must_use]
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = *row;
        for (value, median) in out.iter_mut().zip(&self.medians) {
            if let Some(m) = median {
                if *value == 0.0 {
                    *value = *m;
                }
            }
        }
        out
    }

    /// Number of columns this imputer was fitted for.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.medians.len()
    }
}

/// Median with the midpoint convention for even counts.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
