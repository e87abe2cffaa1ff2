//! Per-feature standardization: `z = (x - mean) / scale`.

use serde::{Deserialize, Serialize};

use super::error::FitError;

/// Fitted standard scaler.
///
/// `scale` is the population standard deviation of each column; a column
/// with zero variance gets scale 1.0 so it maps to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Learn column means and standard deviations.
    ///
    /// # Errors
    /// Returns `FitError::EmptyInput` for an empty sample and
    /// `FitError::DimensionMismatch` for ragged rows.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, FitError> {
        let first = rows.first().ok_or(FitError::EmptyInput)?;
        let d = first.as_ref().len();
        let n = rows.len() as f64;

        let mut mean = vec![0.0; d];
        for row in rows {
            let row = row.as_ref();
            if row.len() != d {
                return Err(FitError::DimensionMismatch {
                    expected: d,
                    got: row.len(),
                });
            }
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; d];
        for row in rows {
            for ((v, x), m) in var.iter_mut().zip(row.as_ref()).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Standardize one feature vector.
    #[must_use]
    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }

    /// Map a standardized vector back to the original units.
    #[must_use]
    pub fn inverse_transform(&self, z: &[f64]) -> Vec<f64> {
        z.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(z, (m, s))| z * s + m)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_population_statistics() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let scaler = StandardScaler::fit(&rows).expect("fit");

        assert!((scaler.mean[0] - 3.0).abs() < 1e-12);
        // Population std of [1, 3, 5] = sqrt(8/3)
        assert!((scaler.scale[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // Constant column falls back to unit scale.
        assert!((scaler.scale[1] - 1.0).abs() < 1e-12);
        assert_eq!(scaler.transform(&[7.0, 10.0])[1], 0.0);
    }

    #[test]
    fn test_transformed_training_columns_are_standard() {
        let rows = vec![[2.0, -1.0], [4.0, 0.5], [9.0, 3.0], [1.0, 0.0]];
        let scaler = StandardScaler::fit(&rows).expect("fit");
        let z: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();

        for col in 0..2 {
            let mean: f64 = z.iter().map(|r| r[col]).sum::<f64>() / 4.0;
            let var: f64 = z.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverse_transform_round_trip() {
        let rows = vec![
            [6.0, 148.0, 72.0, 35.0, 125.0, 33.6, 0.627, 50.0],
            [1.0, 85.0, 66.0, 29.0, 125.0, 26.6, 0.351, 31.0],
            [8.0, 183.0, 64.0, 29.0, 125.0, 23.3, 0.672, 32.0],
        ];
        let scaler = StandardScaler::fit(&rows).expect("fit");

        let v = [3.0, 120.5, 80.0, 22.0, 94.0, 41.2, 1.25, 67.0];
        let back = scaler.inverse_transform(&scaler.transform(&v));
        for (a, b) in v.iter().zip(&back) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_fit_rejects_empty_and_ragged() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(StandardScaler::fit(&empty), Err(FitError::EmptyInput));

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            StandardScaler::fit(&ragged),
            Err(FitError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }
}
