// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 from the submissions API

    #[error("SEC Rate limit likely exceeded")]
    RateLimited, // 403 Forbidden, usually a missing/blocked User-Agent

    #[error("Could not find specified filing: {0}")]
    FilingDocNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Model returned no usable content")]
    EmptyResponse,

    #[error("Failed to parse model response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// Outward-facing failures of one analysis request.
///
/// Only the short `Display` text of these ever reaches a client; the
/// underlying cause is logged where it happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Ticker not found")]
    TickerNotFound,

    #[error("No 10-K found")]
    FilingNotFound,

    #[error("Section {0} not found")]
    SectionNotFound(String),

    #[error("Failed to fetch 10-K content")]
    Upstream(String),

    #[error("Failed to generate summary")]
    Generation(String),
}

impl PipelineError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::TickerNotFound
                | PipelineError::FilingNotFound
                | PipelineError::SectionNotFound(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("AI processing failed: {0}")]
    Ai(#[from] OracleError),
}
