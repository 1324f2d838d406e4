//! Transport and session seams.
//!
//! A [`SyncTransport`] creates [`SyncSession`]s bound to a dissemination
//! scope prefix. The dispatcher owns exactly one session at a time; failure
//! to construct one is fatal for the daemon, which cannot route without
//! dissemination.

use async_trait::async_trait;
use lsr_types::Name;
use tokio::sync::mpsc;

use crate::message::SyncMessage;

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session construction failed. Fatal for the daemon.
    #[error("failed to construct sync session: {0}")]
    Construction(String),

    /// A publish call failed. The transport's own resync logic retries.
    #[error("failed to publish {name}: {reason}")]
    Publish { name: Name, reason: String },

    /// A fetch failed; the update is dropped and eligible for redelivery.
    #[error("failed to fetch {name} at seq {seq_no}: {reason}")]
    Fetch {
        name: Name,
        seq_no: u64,
        reason: String,
    },
}

/// A live session bound to one scope prefix.
#[async_trait]
pub trait SyncSession: Send + Sync {
    /// Returns the scope prefix this session is bound to.
    fn scope_prefix(&self) -> &Name;

    /// Announces that `name` is now at `seq_no`.
    async fn publish(&self, name: &Name, seq_no: u64) -> Result<(), SessionError>;

    /// Fetches the content published under `name` at `seq_no`.
    async fn fetch(&self, name: &Name, seq_no: u64) -> Result<Vec<u8>, SessionError>;
}

/// A session plus the stream of notifications the transport delivers for it.
pub struct SessionHandle {
    pub session: std::sync::Arc<dyn SyncSession>,
    pub notifications: mpsc::UnboundedReceiver<SyncMessage>,
}

/// Factory for sync sessions.
pub trait SyncTransport: Send + Sync {
    /// Creates a session bound to `scope_prefix`.
    fn create_session(&self, scope_prefix: Name) -> Result<SessionHandle, SessionError>;
}
