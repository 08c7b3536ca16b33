//! Record types shared across the pipeline.
//!
//! The structs are kept flat (no nesting) because they map 1:1 onto CSV
//! rows of the dataset and report files.

use serde::{Deserialize, Serialize};

/// Number of model features per claim, in column order:
/// age, income, claim_amount, num_claims, has_prior_fraud.
pub const NUM_FEATURES: usize = 5;

/// A claim's feature vector, ready for the classifier.
pub type Features = [f64; NUM_FEATURES];

/// One simulated insurance claim, without a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub age: u32,
    pub income: u32,
    pub claim_amount: u32,
    pub num_claims: u32,
    pub has_prior_fraud: u8,
}

impl ClaimRecord {
    pub fn features(&self) -> Features {
        [
            self.age as f64,
            self.income as f64,
            self.claim_amount as f64,
            self.num_claims as f64,
            self.has_prior_fraud as f64,
        ]
    }
}

/// A claim with its training label.
///
/// The label is drawn independently of the features — the training data
/// carries no learnable signal by construction. That is a property of the
/// generator, preserved from the system this one reimplements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledClaim {
    pub age: u32,
    pub income: u32,
    pub claim_amount: u32,
    pub num_claims: u32,
    pub has_prior_fraud: u8,
    pub is_fraud: u8,
}

impl LabeledClaim {
    pub fn claim(&self) -> ClaimRecord {
        ClaimRecord {
            age: self.age,
            income: self.income,
            claim_amount: self.claim_amount,
            num_claims: self.num_claims,
            has_prior_fraud: self.has_prior_fraud,
        }
    }

    pub fn features(&self) -> Features {
        self.claim().features()
    }
}

/// A scored claim as it appears in the report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub age: u32,
    pub income: u32,
    pub claim_amount: u32,
    pub num_claims: u32,
    pub has_prior_fraud: u8,
    pub fraud_probability: f64,
    pub is_predicted_fraud: u8,
    pub justification: String,
}

impl ScoredRecord {
    pub fn claim(&self) -> ClaimRecord {
        ClaimRecord {
            age: self.age,
            income: self.income,
            claim_amount: self.claim_amount,
            num_claims: self.num_claims,
            has_prior_fraud: self.has_prior_fraud,
        }
    }
}
