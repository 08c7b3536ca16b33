//! End-to-end orchestration.
//!
//! The decision of whether to train before scoring lives here, not inside
//! the scorer: `ensure_model` loads the persisted artifact when one exists
//! and runs a full training pass when it does not. Components below this
//! module receive their inputs explicitly.

use crate::config::PipelineConfig;
use crate::dataset;
use crate::error::PipelineResult;
use crate::forest::FraudModel;
use crate::scorer;
use crate::trainer;
use crate::types::ScoredRecord;

/// Create the dataset when needed (recreate gate or missing file).
pub fn ensure_dataset(cfg: &PipelineConfig) -> PipelineResult<()> {
    dataset::ensure_dataset(cfg)
}

/// Load the persisted model, training one first when no artifact exists.
pub fn ensure_model(cfg: &PipelineConfig) -> PipelineResult<FraudModel> {
    if cfg.model_path.exists() {
        log::info!("loading model: {}", cfg.model_path.display());
        FraudModel::load(&cfg.model_path)
    } else {
        log::info!("no model artifact found, training first");
        let (model, _) = trainer::run(cfg)?;
        Ok(model)
    }
}

/// Run the whole pipeline: dataset, model, scoring, report and charts.
pub fn run(cfg: &PipelineConfig) -> PipelineResult<Vec<ScoredRecord>> {
    let model = ensure_model(cfg)?;
    scorer::run(cfg, &model)
}
