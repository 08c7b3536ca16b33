use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Required file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("Dataset is missing required columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("Dataset is empty after dropping incomplete rows")]
    EmptyDataset,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
