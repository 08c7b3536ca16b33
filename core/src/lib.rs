//! fraudsight-core: synthetic insurance-claim generation, fraud-model
//! training, scoring with rule-based justifications, and the dashboard
//! view over the scored report.
//!
//! PIPELINE ORDER (fixed):
//!   dataset → trainer → model artifact → scorer → report → dashboard
//!
//! RULES:
//!   - All randomness flows through `rng::StreamRng`. Nothing calls a
//!     platform RNG, so every artifact is reproducible from its seed.
//!   - File I/O is confined to the artifact writers: `dataset`, `forest`,
//!     `trainer` and `charts`.
//!   - The dashboard is read-only over the report. It never re-triggers
//!     scoring or training.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod metrics;
pub mod pipeline;
pub mod rng;
pub mod scorer;
pub mod trainer;
pub mod types;
