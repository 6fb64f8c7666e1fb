use thiserror::Error;

/// Error type that captures the fallible edges of the flight ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
