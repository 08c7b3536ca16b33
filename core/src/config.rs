//! Pipeline configuration.
//!
//! Every component entry point takes an explicit `PipelineConfig` — there
//! is no module-scope mutable state. The defaults reproduce the canonical
//! run exactly: paths, seeds, counts and thresholds all match the original
//! pipeline constants.

use crate::error::PipelineResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Labeled training dataset (CSV).
    pub dataset_path: PathBuf,
    /// Persisted model artifact (single JSON blob, overwritten on retrain).
    pub model_path: PathBuf,
    /// Evaluation metrics from the last training run (JSON).
    pub metrics_path: PathBuf,
    /// Scored-records report consumed by the dashboard (CSV).
    pub report_path: PathBuf,
    /// Directory for the chart side artifacts.
    pub figures_dir: PathBuf,

    /// Regenerate the dataset even when one already exists.
    pub recreate_data: bool,
    /// Rows to generate for the training dataset.
    pub dataset_size: usize,
    /// Records to generate for the scoring batch.
    pub scoring_size: usize,
    /// P(is_fraud = 1) in generated training data.
    pub fraud_base_rate: f64,
    /// Probability at or above which a record is flagged as fraud.
    pub fraud_threshold: f64,
    /// Seed for training-data generation and the train/test split.
    pub training_seed: u64,
    /// Seed for the scoring batch.
    pub scoring_seed: u64,
    /// Trees in the forest.
    pub n_trees: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/fraud_data.csv"),
            model_path: PathBuf::from("models/random_forest_model.json"),
            metrics_path: PathBuf::from("models/training_metrics.json"),
            report_path: PathBuf::from("reports/fraud_predictions_report.csv"),
            figures_dir: PathBuf::from("reports/figures"),
            recreate_data: true,
            dataset_size: 500_000,
            scoring_size: 100,
            fraud_base_rate: 0.1,
            fraud_threshold: 0.6,
            training_seed: 42,
            scoring_seed: 100,
            n_trees: 100,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Fields absent from the file keep their
    /// default values.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Defaults with every path re-rooted under `root`. Used by the
    /// runner's `--data-dir` flag and by tests.
    pub fn with_root(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            dataset_path: root.join(defaults.dataset_path),
            model_path: root.join(defaults.model_path),
            metrics_path: root.join(defaults.metrics_path),
            report_path: root.join(defaults.report_path),
            figures_dir: root.join(defaults.figures_dir),
            ..defaults
        }
    }
}
