//! L2-regularized binary logistic regression.
//!
//! Minimizes
//!
//! ```text
//! sum_i [ log(1 + exp(z_i)) - y_i * z_i ] + ||w||^2 / (2C),   z_i = w . x_i + b
//! ```
//!
//! with linfa's L-BFGS solver. The intercept is not penalized. Only the fitted
//! weights and intercept are kept; scoring is plain arithmetic so inference
//! does not depend on linfa.

use linfa::prelude::*;
use linfa_logistic::LogisticRegression as LinfaLogistic;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::diagnosis::DECISION_THRESHOLD;
use super::error::FitError;

/// Solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Maximum L-BFGS iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm.
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-8,
        }
    }
}

/// Fitted logistic model over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Numerically stable logistic function.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Fit on standardized rows `x` with binary labels `y`.
    ///
    /// # Errors
    /// Returns `FitError` on empty/ragged input, non-binary or single-class
    /// labels, or a solver failure.
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[u8],
        config: &LogisticConfig,
    ) -> Result<Self, FitError> {
        let d = x.first().ok_or(FitError::EmptyInput)?.as_ref().len();
        if x.len() != y.len() {
            return Err(FitError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if let Some(row) = x.iter().find(|r| r.as_ref().len() != d) {
            return Err(FitError::DimensionMismatch {
                expected: d,
                got: row.as_ref().len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&l| l > 1) {
            return Err(FitError::InvalidLabel(bad));
        }
        if y.iter().all(|&l| l == y[0]) {
            return Err(FitError::SingleClass(y[0]));
        }

        let records = Array2::from_shape_vec(
            (x.len(), d),
            x.iter().flat_map(|r| r.as_ref().iter().copied()).collect(),
        )
        .map_err(|e| FitError::Solver(e.to_string()))?;
        let targets: Array1<usize> = y.iter().map(|&l| usize::from(l)).collect();
        let dataset = Dataset::new(records, targets);

        // linfa labels the larger class (1) as positive, so its parameters
        // score P(outcome = 1) directly.
        let fitted = LinfaLogistic::default()
            .alpha(1.0 / config.c)
            .max_iterations(config.max_iter as u64)
            .gradient_tolerance(config.tol)
            .fit(&dataset)
            .map_err(|e| FitError::Solver(e.to_string()))?;

        let model = Self {
            weights: fitted.params().to_vec(),
            intercept: fitted.intercept(),
        };
        if !model.weights.iter().chain([&model.intercept]).all(|v| v.is_finite()) {
            return Err(FitError::Solver("non-finite parameters".to_string()));
        }
        Ok(model)
    }

    /// Linear score `w . z + b` for a standardized vector.
    #[must_use]
    pub fn decision_function(&self, z: &[f64]) -> f64 {
        self.weights.iter().zip(z).map(|(w, x)| w * x).sum::<f64>() + self.intercept
    }

    /// Probability of class 1.
    #[must_use]
    pub fn predict_proba(&self, z: &[f64]) -> f64 {
        sigmoid(self.decision_function(z))
    }

    /// Predicted class label (1 iff probability >= 0.5).
    #[must_use]
    pub fn predict(&self, z: &[f64]) -> u8 {
        u8::from(self.predict_proba(z) >= DECISION_THRESHOLD)
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}
