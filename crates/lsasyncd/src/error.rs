//! Error types for lsasyncd.

use lsr_sync_common::SessionError;
use thiserror::Error;

/// Errors that can occur in lsasyncd.
#[derive(Debug, Error)]
pub enum LsrError {
    /// Transport/session failure. Fatal when raised at session creation.
    #[error("sync session error: {0}")]
    Session(#[from] SessionError),

    /// A publish was requested before a session was created.
    #[error("no sync session has been created")]
    SessionNotCreated,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Name or router-name parse failure.
    #[error("parse error: {0}")]
    Parse(#[from] lsr_types::ParseError),

    /// Payload (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for lsasyncd operations.
pub type Result<T> = std::result::Result<T, LsrError>;
