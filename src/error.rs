//! Error types for Pipelinr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Pipelinr
#[derive(Debug, Error)]
pub enum PipelinrError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog retrieval error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Tool execution error
    #[error("Tool error: {0}")]
    Tool(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Pipelinr operations
pub type Result<T> = std::result::Result<T, PipelinrError>;
