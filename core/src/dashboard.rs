//! Dashboard state: the read-only consumer of the scored report.
//!
//! Holds the full report plus the two interactive filters — the
//! fraud-class selector and the probability threshold (in percent). The
//! filters combine conjunctively. Loading never triggers scoring or
//! training; a missing report is surfaced as `MissingFile` and rendering
//! halts.

use crate::dataset;
use crate::error::PipelineResult;
use crate::types::ScoredRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default slider position, matching the scoring threshold (60%).
pub const DEFAULT_THRESHOLD_PCT: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudFilter {
    All,
    FraudOnly,
    LegitOnly,
}

impl FraudFilter {
    /// Parse a selector label from the wire ("all" / "fraud" / "legit").
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "all" => Some(Self::All),
            "fraud" => Some(Self::FraudOnly),
            "legit" => Some(Self::LegitOnly),
            _ => None,
        }
    }

    fn accepts(self, record: &ScoredRecord) -> bool {
        match self {
            Self::All => true,
            Self::FraudOnly => record.is_predicted_fraud == 1,
            Self::LegitOnly => record.is_predicted_fraud == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub loaded: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    records: Vec<ScoredRecord>,
    pub filter: FraudFilter,
    pub threshold_pct: u8,
}

impl DashboardState {
    /// Load the report from disk. `MissingFile` when it is absent.
    pub fn load(report_path: &Path) -> PipelineResult<Self> {
        let records = dataset::read_report(report_path)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<ScoredRecord>) -> Self {
        Self {
            records,
            filter: FraudFilter::All,
            threshold_pct: DEFAULT_THRESHOLD_PCT,
        }
    }

    pub fn set_filter(&mut self, filter: FraudFilter, threshold_pct: u8) {
        self.filter = filter;
        self.threshold_pct = threshold_pct.min(100);
    }

    /// The full, unfiltered report.
    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    /// Rows passing both filters: class selector AND probability >= slider.
    pub fn filtered(&self) -> Vec<&ScoredRecord> {
        self.records
            .iter()
            .filter(|record| {
                self.filter.accepts(record)
                    && record.fraud_probability * 100.0 >= self.threshold_pct as f64
            })
            .collect()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            loaded: self.records.len(),
            filtered: self.filtered().len(),
        }
    }
}
