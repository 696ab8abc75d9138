//! Error types for the invoice ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Debug, Error)]
pub enum Error {
    /// Source file missing, unreadable, or not a structurally valid image
    #[error("invalid evidence: {0}")]
    InvalidEvidence(String),

    /// Destination name collision declined (strict collision policy only)
    #[error("duplicate evidence: '{0}' already exists in the evidence directory")]
    DuplicateEvidence(String),

    /// Disk or store write failure
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),

    /// Amount failed validation (non-positive or unparsable)
    #[error("malformed amount: {0}")]
    MalformedAmount(String),

    /// Stored chain failed an integrity check
    #[error("corrupt chain: {0}")]
    CorruptChain(String),

    /// Store encode/decode failure
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::PersistenceFailure(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::PersistenceFailure(err.to_string())
    }
}
