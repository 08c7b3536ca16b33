//! Model training: split, fit, evaluate, persist.
//!
//! The 80/20 split is a plain deterministic shuffle — NOT stratified,
//! despite the 9:1 class imbalance. That matches the system this one
//! reimplements; adding stratification would silently change its behavior.

use crate::charts;
use crate::config::PipelineConfig;
use crate::dataset;
use crate::error::{PipelineError, PipelineResult};
use crate::forest::{ForestParams, FraudModel};
use crate::metrics::{self, EvalMetrics};
use crate::rng::{StreamRng, StreamSlot};
use crate::types::{Features, LabeledClaim};
use std::fs;

/// Share of rows held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// Deterministic 80/20 split: shuffle the index space with the split
/// stream, then take the leading fifth as the test partition.
pub fn split_indices(n: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StreamRng::new(seed, StreamSlot::Split as u64).with_name("split");
    // Fisher-Yates.
    for i in (1..n).rev() {
        let j = rng.next_u64_below((i + 1) as u64) as usize;
        indices.swap(i, j);
    }

    let mut n_test = ((n as f64) * TEST_FRACTION).ceil() as usize;
    if n_test >= n {
        n_test = n.saturating_sub(1);
    }
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Fit the classifier on a cleaned dataset and evaluate it on the held-out
/// partition. Fails with `EmptyDataset` when there is nothing to fit.
pub fn train(
    records: &[LabeledClaim],
    params: &ForestParams,
    split_seed: u64,
) -> PipelineResult<(FraudModel, EvalMetrics)> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let features: Vec<Features> = records.iter().map(LabeledClaim::features).collect();
    let labels: Vec<u8> = records.iter().map(|record| record.is_fraud).collect();

    let (train_idx, test_idx) = split_indices(records.len(), split_seed);
    log::info!(
        "training on {} rows, evaluating on {}",
        train_idx.len(),
        test_idx.len()
    );

    let train_x: Vec<Features> = train_idx.iter().map(|&i| features[i]).collect();
    let train_y: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();
    let model = FraudModel::fit(&train_x, &train_y, params);

    let test_y: Vec<u8> = test_idx.iter().map(|&i| labels[i]).collect();
    let test_probabilities: Vec<f64> =
        test_idx.iter().map(|&i| model.predict_proba(&features[i])).collect();
    let test_predictions: Vec<u8> =
        test_idx.iter().map(|&i| model.predict(&features[i])).collect();

    let eval = metrics::evaluate(&test_y, &test_predictions, &test_probabilities);
    log::info!(
        "evaluation: accuracy {:.4}, AUC-ROC {:?}",
        eval.accuracy,
        eval.auc_roc
    );

    Ok((model, eval))
}

/// Full training run: ensure the dataset per the recreate gate, load and
/// clean it, train, persist the model, the metrics file and the confusion
/// heatmap figure.
pub fn run(cfg: &PipelineConfig) -> PipelineResult<(FraudModel, EvalMetrics)> {
    dataset::ensure_dataset(cfg)?;
    let records = dataset::read_labeled(&cfg.dataset_path)?;

    let params = ForestParams {
        n_trees: cfg.n_trees,
        seed: cfg.training_seed,
        ..ForestParams::default()
    };
    let (model, eval) = train(&records, &params, cfg.training_seed)?;

    model.save(&cfg.model_path)?;
    if let Some(parent) = cfg.metrics_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let metrics_file = fs::File::create(&cfg.metrics_path)?;
    serde_json::to_writer_pretty(metrics_file, &eval)?;
    log::info!("saved metrics: {}", cfg.metrics_path.display());

    charts::render_confusion(&cfg.figures_dir, &eval.confusion)?;

    Ok((model, eval))
}
