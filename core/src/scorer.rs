//! Scoring and rule-based justification.
//!
//! The scorer takes an already-loaded model — whether to train one first is
//! the orchestrator's decision (see pipeline.rs), never the scorer's.
//!
//! Justification rules fire independently and are reported in a fixed
//! order, joined by "; ". They are business rules over the record's own
//! fields plus one rule over the model output, so a justification can
//! always be re-derived from the scored record itself.

use crate::charts;
use crate::config::PipelineConfig;
use crate::dataset;
use crate::error::PipelineResult;
use crate::forest::FraudModel;
use crate::types::{ClaimRecord, ScoredRecord};

/// Reported when no rule fires.
pub const NO_SIGNAL: &str = "no evident signal";

const HIGH_CLAIM_AMOUNT: u32 = 30_000;
const HIGH_NUM_CLAIMS: u32 = 3;
const LOW_INCOME: u32 = 25_000;
const HIGH_PROBABILITY: f64 = 0.7;

/// Evaluate the five rules in order and join every one that fires.
pub fn justify(claim: &ClaimRecord, probability: f64) -> String {
    let mut reasons: Vec<&str> = Vec::new();
    if claim.has_prior_fraud == 1 {
        reasons.push("prior fraud history");
    }
    if claim.claim_amount > HIGH_CLAIM_AMOUNT {
        reasons.push("high claim amount");
    }
    if claim.num_claims > HIGH_NUM_CLAIMS {
        reasons.push("high number of claims");
    }
    if claim.income < LOW_INCOME {
        reasons.push("low income");
    }
    if probability > HIGH_PROBABILITY {
        reasons.push("high model probability (>70%)");
    }
    if reasons.is_empty() {
        NO_SIGNAL.to_string()
    } else {
        reasons.join("; ")
    }
}

/// Assemble one scored record from a claim and its model probability.
pub fn score_one(claim: &ClaimRecord, probability: f64, threshold: f64) -> ScoredRecord {
    ScoredRecord {
        age: claim.age,
        income: claim.income,
        claim_amount: claim.claim_amount,
        num_claims: claim.num_claims,
        has_prior_fraud: claim.has_prior_fraud,
        fraud_probability: probability,
        is_predicted_fraud: u8::from(probability >= threshold),
        justification: justify(claim, probability),
    }
}

/// Score a batch of claims with the given model and decision threshold.
pub fn score(model: &FraudModel, claims: &[ClaimRecord], threshold: f64) -> Vec<ScoredRecord> {
    claims
        .iter()
        .map(|claim| score_one(claim, model.predict_proba(&claim.features()), threshold))
        .collect()
}

/// Full scoring run: generate the evaluation batch, score it, persist the
/// report and the chart artifacts.
pub fn run(cfg: &PipelineConfig, model: &FraudModel) -> PipelineResult<Vec<ScoredRecord>> {
    let claims = dataset::generate_unlabeled(cfg.scoring_size, cfg.scoring_seed);
    let scored = score(model, &claims, cfg.fraud_threshold);

    let flagged = scored.iter().filter(|r| r.is_predicted_fraud == 1).count();
    log::info!(
        "scored {} records, {} flagged at threshold {}",
        scored.len(),
        flagged,
        cfg.fraud_threshold
    );

    dataset::write_report(&cfg.report_path, &scored)?;
    charts::render_all(&cfg.figures_dir, &scored)?;
    Ok(scored)
}
