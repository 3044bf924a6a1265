use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("advocate file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("no results for query")]
    NoResults,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid advocate data: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[cfg(feature = "duckdb")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(String),
}
