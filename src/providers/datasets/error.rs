use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {0}")]
    MissingInput(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("dataset '{table}' has no columns")]
    NoColumns { table: String },
    #[error("stops table has no column resolvable to '{0}'")]
    MissingColumn(&'static str),
    #[error("stop '{stop_id}' has a non-numeric coordinate: '{value}'")]
    InvalidCoordinate { stop_id: String, value: String },
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
