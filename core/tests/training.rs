//! Trainer integration: deterministic split, evaluation on the held-out
//! partition, idempotent runs, and the persistence of model + metrics.

use fraudsight_core::config::PipelineConfig;
use fraudsight_core::dataset;
use fraudsight_core::error::PipelineError;
use fraudsight_core::forest::{ForestParams, FraudModel};
use fraudsight_core::trainer;
use std::path::Path;

fn small_cfg(root: &Path) -> PipelineConfig {
    PipelineConfig {
        dataset_size: 400,
        scoring_size: 20,
        n_trees: 10,
        ..PipelineConfig::with_root(root)
    }
}

fn small_params() -> ForestParams {
    ForestParams { n_trees: 10, ..ForestParams::default() }
}

#[test]
fn split_is_deterministic_and_80_20() {
    let (train_a, test_a) = trainer::split_indices(500, 42);
    let (train_b, test_b) = trainer::split_indices(500, 42);
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);

    assert_eq!(test_a.len(), 100);
    assert_eq!(train_a.len(), 400);

    let mut all: Vec<usize> = train_a.iter().chain(&test_a).copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..500).collect::<Vec<_>>(), "split lost or duplicated rows");
}

#[test]
fn evaluation_covers_the_test_partition() {
    let records = dataset::generate_labeled(300, 42, 0.1);
    let (_, metrics) = trainer::train(&records, &small_params(), 42).unwrap();

    let confusion_total: u64 = metrics.confusion.iter().flatten().sum();
    assert_eq!(confusion_total, 60, "confusion matrix must cover the 20% test rows");
    assert_eq!(metrics.legit.support + metrics.fraud.support, 60);
    if let Some(auc) = metrics.auc_roc {
        assert!((0.0..=1.0).contains(&auc));
    }
}

#[test]
fn empty_dataset_fails() {
    let result = trainer::train(&[], &small_params(), 42);
    assert!(matches!(result, Err(PipelineError::EmptyDataset)));
}

#[test]
fn training_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PipelineConfig { recreate_data: false, ..small_cfg(dir.path()) };

    // First run creates the dataset; the second reuses it byte-for-byte.
    let (_, metrics_a) = trainer::run(&cfg).unwrap();
    let (_, metrics_b) = trainer::run(&cfg).unwrap();
    assert_eq!(metrics_a, metrics_b, "same dataset + same seeds must give same metrics");
}

#[test]
fn run_persists_model_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = small_cfg(dir.path());

    trainer::run(&cfg).unwrap();
    assert!(cfg.model_path.exists(), "model artifact missing");
    assert!(cfg.metrics_path.exists(), "metrics file missing");
    assert!(
        cfg.figures_dir.join(fraudsight_core::charts::CONFUSION_FILE).exists(),
        "confusion heatmap missing"
    );

    // The metrics file must parse back into the same shape.
    let text = std::fs::read_to_string(&cfg.metrics_path).unwrap();
    let parsed: fraudsight_core::metrics::EvalMetrics = serde_json::from_str(&text).unwrap();
    let confusion_total: u64 = parsed.confusion.iter().flatten().sum();
    assert_eq!(confusion_total, 80); // 20% of 400 rows
}

#[test]
fn saved_model_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let records = dataset::generate_labeled(200, 42, 0.1);
    let (model, _) = trainer::train(&records, &small_params(), 42).unwrap();

    let path = dir.path().join("models").join("model.json");
    model.save(&path).unwrap();
    let loaded = FraudModel::load(&path).unwrap();

    for claim in dataset::generate_unlabeled(25, 100) {
        assert_eq!(
            model.predict_proba(&claim.features()),
            loaded.predict_proba(&claim.features()),
            "loaded model disagrees with the fitted one"
        );
    }
}

#[test]
fn loading_an_absent_model_is_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = FraudModel::load(&dir.path().join("no_model.json"));
    assert!(matches!(result, Err(PipelineError::MissingFile { .. })));
}
