//! Error types for reco
//!
//! The reconciliation engine itself never fails; these errors come from the
//! layers around it (file ingestion, configuration, export).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Workbook error: {0}")]
    Xlsx(String),

    #[error("{dataset} export has none of the expected columns: {}", .expected.join(", "))]
    MissingColumns {
        dataset: String,
        expected: Vec<String>,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
