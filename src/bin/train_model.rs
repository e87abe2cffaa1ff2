//! Offline training: fit the diabetes model and persist its artifacts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use glucoguard::adapters::{CsvDataset, JsonArtifactStore};
use glucoguard::application::{TrainingOptions, TrainingPipeline};
use glucoguard::config::LogConfig;
use glucoguard::domain::{ImputationScope, LogisticConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scope {
    /// Medians over every row, before the split.
    FullDataset,
    /// Medians over the training split only.
    TrainingSplit,
}

impl From<Scope> for ImputationScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::FullDataset => Self::FullDataset,
            Scope::TrainingSplit => Self::TrainingSplit,
        }
    }
}

#[derive(Parser)]
#[command(name = "train_model", about = "Train the diabetes risk model")]
struct Cli {
    /// Labelled CSV table with the eight features and Outcome.
    #[arg(long, env = "GLUCOGUARD_DATASET", default_value = "dataset/diabetes.csv")]
    dataset: PathBuf,

    /// Output directory for the artifact pair.
    #[arg(long, env = "GLUCOGUARD_MODEL_DIR", default_value = "modelo")]
    model_dir: PathBuf,

    /// Seed of the train/test shuffle.
    #[arg(long, env = "GLUCOGUARD_SPLIT_SEED", default_value = "42")]
    seed: u64,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value = "0.2")]
    test_ratio: f64,

    /// Maximum solver iterations.
    #[arg(long, default_value = "1000")]
    max_iter: usize,

    /// Inverse L2 regularization strength.
    #[arg(long, default_value = "1.0")]
    c: f64,

    #[arg(long, value_enum, default_value = "full-dataset")]
    imputation_scope: Scope,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = glucoguard::logging::init(&LogConfig::from_env()?)
        .context("failed to initialize logging")?;

    let options = TrainingOptions {
        test_ratio: cli.test_ratio,
        seed: cli.seed,
        imputation_scope: cli.imputation_scope.into(),
        solver: LogisticConfig {
            c: cli.c,
            max_iter: cli.max_iter,
            ..LogisticConfig::default()
        },
    };

    let store = Arc::new(JsonArtifactStore::new(&cli.model_dir));
    let pipeline = TrainingPipeline::new(
        Arc::new(CsvDataset::new(&cli.dataset)),
        Arc::clone(&store),
        options,
    );

    let outcome = pipeline
        .run()
        .with_context(|| format!("training on {:?} failed", cli.dataset))?;

    println!("{}", outcome.report);
    println!();
    println!("Scaler saved to {}", store.scaler_path().display());
    println!("Model saved to {}", store.model_path().display());
    Ok(())
}
