//! The scoring oracle capability.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("oracle returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("prompt blocked by oracle: {0}")]
    Blocked(String),
    #[error("oracle returned no text")]
    EmptyResponse,
    #[error("oracle did not respond within {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Other(String),
}

/// A generative text model used to rank advocates for a case.
///
/// Treated as untrusted: it may be slow, fail, or ignore the requested
/// answer format. One prompt in, free text out.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;

    /// Model identifier for logs.
    fn model(&self) -> &str {
        "unknown"
    }
}
