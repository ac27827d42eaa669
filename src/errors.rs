use thiserror::Error;

/// Error type covering persistence and import failures.
///
/// Malformed statement rows never surface here: ingestion recovers them
/// in-place with zero/sentinel defaults. Rejected category assignments are a
/// boolean no-op, not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Import rejected: {0}")]
    ImportFormat(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
