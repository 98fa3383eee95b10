// ABOUTME: Error types for the summarization pipeline
// ABOUTME: Distinguishes bad input, upstream failures, and schema mismatches

use thiserror::Error;

pub type SummarizerResult<T> = Result<T, SummarizerError>;

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("README decoding failed: {0}")]
    Decode(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Failed to parse model response: {0}")]
    ParseError(String),

    #[error("Model output did not match expected shape: {0}")]
    SchemaValidation(String),
}
