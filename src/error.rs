use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Errors raised by the forecast and reshape pipelines.
#[derive(ThisError, Debug)]
pub enum ForecastError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Dimension mismatch: {left} actual values vs {right} predicted values")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(String),
}

impl From<anyhow::Error> for ForecastError {
    fn from(err: anyhow::Error) -> Self {
        ForecastError::Model(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
