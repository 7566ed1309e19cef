//! Error types for saldo

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Spreadsheet decode error: {0}")]
    Decode(#[from] calamine::Error),

    #[error("Card marker does not match the expected pattern: {0}")]
    PatternMismatch(String),

    #[error("Unable to parse amount: {0}")]
    NumericParse(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
