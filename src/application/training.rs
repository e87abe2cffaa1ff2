//! Training service: Fits and evaluates the model, then persists artifacts.
//!
//! Pipeline:
//! 1. Load labelled records from the dataset source
//! 2. Split 80/20 with a seeded shuffle
//! 3. Impute zero-as-missing columns with non-zero medians
//! 4. Fit the scaler on the training split, standardize both splits
//! 5. Fit logistic regression on the training split
//! 6. Evaluate on the held-out split
//! 7. Persist the (scaler, classifier) pair
//!
//! Nothing is written unless every step before persistence succeeded.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::artifacts::expected_feature_names;
use crate::domain::{
    ArtifactPair, ClassifierArtifact, EvaluationReport, ImputationScope, LabeledRecord,
    LogisticConfig, LogisticRegression, ScalerArtifact, StandardScaler, TrainingProvenance,
    ZeroMedianImputer, FEATURE_COUNT,
};
use crate::ports::{ArtifactStore, DatasetSource};
use crate::GlucoguardError;

/// Knobs for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    /// Fraction of records held out for evaluation.
    pub test_ratio: f64,
    /// Seed of the split shuffle.
    pub seed: u64,
    pub imputation_scope: ImputationScope,
    pub solver: LogisticConfig,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            imputation_scope: ImputationScope::FullDataset,
            solver: LogisticConfig::default(),
        }
    }
}

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifacts: ArtifactPair,
    pub report: EvaluationReport,
    pub split: Split,
    pub dataset_size: usize,
}

/// Partition `n` rows into train/test with a seeded shuffle.
///
/// The test partition gets `ceil(n * test_ratio)` rows. Same `n`, ratio and
/// seed always yield the same partition.
///
/// # Errors
/// Returns `GlucoguardError::Config` if the ratio is outside (0, 1) or either
/// partition would be empty.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<Split, GlucoguardError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(GlucoguardError::Config(format!(
            "test ratio must be in (0, 1), got {test_ratio}"
        )));
    }

    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(GlucoguardError::Config(format!(
            "cannot split {n} records with test ratio {test_ratio}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

/// Fit, evaluate and assemble the artifact pair from in-memory records.
///
/// # Errors
/// Returns error on an invalid split configuration, a degenerate imputed
/// column, or a solver failure.
pub fn fit_and_evaluate(
    records: &[LabeledRecord],
    options: &TrainingOptions,
) -> Result<TrainingOutcome, GlucoguardError> {
    let split = train_test_split(records.len(), options.test_ratio, options.seed)?;
    tracing::info!(
        "Split {} records: {} train, {} held out (seed={})",
        records.len(),
        split.train.len(),
        split.test.len(),
        options.seed
    );

    let raw: Vec<[f64; FEATURE_COUNT]> = records.iter().map(|r| r.features.to_array()).collect();
    let labels: Vec<u8> = records.iter().map(|r| r.outcome).collect();

    let imputer = match options.imputation_scope {
        ImputationScope::FullDataset => ZeroMedianImputer::fit(&raw)?,
        ImputationScope::TrainingSplit => {
            let train_rows: Vec<_> = split.train.iter().map(|&i| raw[i]).collect();
            ZeroMedianImputer::fit(&train_rows)?
        }
    };
    tracing::debug!(scope = %options.imputation_scope, "Fitted imputation medians");

    let cleaned: Vec<[f64; FEATURE_COUNT]> = raw.iter().map(|r| imputer.transform(r)).collect();
    let gather = |idx: &[usize]| -> (Vec<[f64; FEATURE_COUNT]>, Vec<u8>) {
        (
            idx.iter().map(|&i| cleaned[i]).collect(),
            idx.iter().map(|&i| labels[i]).collect(),
        )
    };
    let (x_train, y_train) = gather(&split.train);
    let (x_test, y_test) = gather(&split.test);

    let scaler = StandardScaler::fit(&x_train)?;
    let z_train: Vec<Vec<f64>> = x_train.iter().map(|r| scaler.transform(r)).collect();
    let z_test: Vec<Vec<f64>> = x_test.iter().map(|r| scaler.transform(r)).collect();

    let model = LogisticRegression::fit(&z_train, &y_train, &options.solver)?;
    tracing::info!(
        "Fitted logistic regression on {} rows (C={}, max_iter={})",
        z_train.len(),
        options.solver.c,
        options.solver.max_iter
    );

    let predicted: Vec<u8> = z_test.iter().map(|z| model.predict(z)).collect();
    let report = EvaluationReport::compute(&y_test, &predicted);

    let artifacts = ArtifactPair {
        scaler: ScalerArtifact {
            feature_names: expected_feature_names(),
            imputer,
            scaler,
        },
        classifier: ClassifierArtifact {
            feature_names: expected_feature_names(),
            model,
            provenance: Some(TrainingProvenance {
                split_seed: options.seed,
                test_ratio: options.test_ratio,
                imputation_scope: options.imputation_scope,
                train_size: split.train.len(),
                test_size: split.test.len(),
                held_out_accuracy: report.accuracy,
                trained_at: chrono::Utc::now(),
            }),
        },
    };

    Ok(TrainingOutcome {
        artifacts,
        report,
        split,
        dataset_size: records.len(),
    })
}

/// Offline training use case.
pub struct TrainingPipeline<D, S>
where
    D: DatasetSource,
    S: ArtifactStore,
{
    dataset: Arc<D>,
    store: Arc<S>,
    options: TrainingOptions,
}

impl<D, S> TrainingPipeline<D, S>
where
    D: DatasetSource,
    S: ArtifactStore,
    D::Error: Into<GlucoguardError>,
    S::Error: Into<GlucoguardError>,
{
    pub fn new(dataset: Arc<D>, store: Arc<S>, options: TrainingOptions) -> Self {
        Self {
            dataset,
            store,
            options,
        }
    }

    /// Run the whole pipeline. Persists only after evaluation succeeds; the
    /// evaluation result never gates persistence.
    ///
    /// # Errors
    /// Returns error if loading, fitting or saving fails. No artifact is
    /// written when loading or fitting fails.
    pub fn run(&self) -> Result<TrainingOutcome, GlucoguardError> {
        tracing::info!("Loading dataset from {}...", self.dataset.describe());
        let records = self.dataset.load().map_err(Into::into)?;

        let outcome = fit_and_evaluate(&records, &self.options)?;
        tracing::info!(
            "Held-out accuracy: {:.4} ({} of {})",
            outcome.report.accuracy,
            outcome.report.confusion.correct(),
            outcome.report.confusion.total()
        );

        self.store.save(&outcome.artifacts).map_err(Into::into)?;
        tracing::info!("Training complete");
        Ok(outcome)
    }
}
