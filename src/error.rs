//! Error types for the remote backends and the aggregator.
//!
//! Library seams return these typed errors; the binary wraps them in
//! `anyhow` with context, the same way configuration loading does.

use thiserror::Error;

/// Failures talking to the repository-search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("GitHub API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("failed to decode GitHub response: {0}")]
    Decode(String),
}

/// Failures talking to the LLM backend.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to LLM endpoint at {0}")]
    Connect(String),

    #[error("failed to send request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("LLM API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse LLM response: {0}")]
    Decode(String),
}

/// Failures loading or rendering a prompt template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {name} from {path}: {source}")]
    Read {
        name: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template {template} has no value for placeholder `{placeholder}`")]
    MissingVariable {
        template: String,
        placeholder: String,
    },
}

/// Errors surfaced by the propagating aggregator operations.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Convenience alias used across the library.
pub type Result<T, E = AggregatorError> = std::result::Result<T, E>;
