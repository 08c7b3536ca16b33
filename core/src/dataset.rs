//! Synthetic claim generation and dataset/report file I/O.
//!
//! Generation contract: `generate_labeled(count, seed, rate)` called twice
//! with identical arguments yields identical records, and therefore
//! byte-identical CSV output. All draws go through a single
//! [`StreamSlot::Dataset`] stream.
//!
//! Writers create parent directories and overwrite in place — there is no
//! temp-then-rename step, matching the single-writer/run-then-read
//! discipline of the pipeline.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::rng::{StreamRng, StreamSlot};
use crate::types::{ClaimRecord, LabeledClaim, ScoredRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Columns a training dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "age",
    "income",
    "claim_amount",
    "num_claims",
    "has_prior_fraud",
    "is_fraud",
];

fn draw_claim(rng: &mut StreamRng) -> ClaimRecord {
    ClaimRecord {
        age: rng.uniform_u32(18, 70),
        income: rng.uniform_u32(20_000, 120_000),
        claim_amount: rng.uniform_u32(1_000, 50_000),
        num_claims: rng.poisson(2.0),
        has_prior_fraud: rng.uniform_u32(0, 2) as u8,
    }
}

/// Generate `count` labeled claims. The label is an independent Bernoulli
/// draw at `fraud_base_rate` — deliberately uncorrelated with the features.
pub fn generate_labeled(count: usize, seed: u64, fraud_base_rate: f64) -> Vec<LabeledClaim> {
    let mut rng = StreamRng::new(seed, StreamSlot::Dataset as u64).with_name("dataset");
    (0..count)
        .map(|_| {
            let claim = draw_claim(&mut rng);
            let is_fraud = u8::from(rng.chance(fraud_base_rate));
            LabeledClaim {
                age: claim.age,
                income: claim.income,
                claim_amount: claim.claim_amount,
                num_claims: claim.num_claims,
                has_prior_fraud: claim.has_prior_fraud,
                is_fraud,
            }
        })
        .collect()
}

/// Generate `count` unlabeled claims for scoring.
pub fn generate_unlabeled(count: usize, seed: u64) -> Vec<ClaimRecord> {
    let mut rng = StreamRng::new(seed, StreamSlot::Dataset as u64).with_name("dataset");
    (0..count).map(|_| draw_claim(&mut rng)).collect()
}

fn create_parent_dirs(path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write the labeled dataset as CSV with a header row.
pub fn write_labeled(path: &Path, records: &[LabeledClaim]) -> PipelineResult<()> {
    create_parent_dirs(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("wrote dataset: {} ({} rows)", path.display(), records.len());
    Ok(())
}

/// Raw dataset row with every field optional. Rows that fail to fill all
/// fields, or whose 0/1 flag columns hold anything but 0 or 1, are dropped
/// silently — the cleaning policy is row removal, never imputation.
#[derive(Debug, Deserialize)]
struct RawLabeledRow {
    age: Option<u32>,
    income: Option<u32>,
    claim_amount: Option<u32>,
    num_claims: Option<u32>,
    has_prior_fraud: Option<u8>,
    is_fraud: Option<u8>,
}

impl RawLabeledRow {
    fn complete(self) -> Option<LabeledClaim> {
        let record = LabeledClaim {
            age: self.age?,
            income: self.income?,
            claim_amount: self.claim_amount?,
            num_claims: self.num_claims?,
            has_prior_fraud: self.has_prior_fraud?,
            is_fraud: self.is_fraud?,
        };
        // Both flags are binary; everything downstream indexes on them.
        if record.has_prior_fraud > 1 || record.is_fraud > 1 {
            return None;
        }
        Some(record)
    }
}

/// Read and clean the labeled dataset.
///
/// Fails with `MissingFile` when the file is absent, `MissingColumns` when
/// the header lacks a required column, and `EmptyDataset` when no complete
/// rows remain after cleaning.
pub fn read_labeled(path: &Path) -> PipelineResult<Vec<LabeledClaim>> {
    if !path.exists() {
        return Err(PipelineError::MissingFile { path: path.to_path_buf() });
    }
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { missing });
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in reader.deserialize::<RawLabeledRow>() {
        match row?.complete() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} unusable rows from {}", path.display());
    }
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }
    Ok(records)
}

/// Create the dataset when `recreate_data` is set or no dataset exists,
/// otherwise reuse the file on disk.
pub fn ensure_dataset(cfg: &PipelineConfig) -> PipelineResult<()> {
    if cfg.recreate_data || !cfg.dataset_path.exists() {
        let records = generate_labeled(cfg.dataset_size, cfg.training_seed, cfg.fraud_base_rate);
        write_labeled(&cfg.dataset_path, &records)?;
    } else {
        log::info!("using existing dataset: {}", cfg.dataset_path.display());
    }
    Ok(())
}

/// Write the scored-records report as CSV with a header row.
pub fn write_report(path: &Path, records: &[ScoredRecord]) -> PipelineResult<()> {
    create_parent_dirs(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("wrote report: {} ({} rows)", path.display(), records.len());
    Ok(())
}

/// Read the scored-records report back (dashboard input).
pub fn read_report(path: &Path) -> PipelineResult<Vec<ScoredRecord>> {
    if !path.exists() {
        return Err(PipelineError::MissingFile { path: path.to_path_buf() });
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<ScoredRecord>() {
        records.push(row?);
    }
    Ok(records)
}
