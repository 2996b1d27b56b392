use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to decode body: {0}")]
    Decode(serde_json::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mark not recorded: {0}")]
    MissingMark(String),

    #[error("No measurement recorded for: {0}")]
    MissingMeasurement(String),

    #[error("Invalid proxy overhead value: {0:?}")]
    InvalidOverhead(String),
}

pub type Result<T> = std::result::Result<T, Error>;
