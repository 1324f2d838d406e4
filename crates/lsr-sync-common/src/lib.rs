//! Shared sync abstractions for link-state routing daemons.
//!
//! This crate defines the seams between the sync dispatcher and its external
//! collaborators:
//!
//! - [`SyncTransport`] / [`SyncSession`]: the pub/sub dissemination layer
//! - [`SyncMessage`]: explicit remote-change / remote-removal notifications
//! - [`Validator`]: opaque accept/reject capability for fetched content
//! - [`Sequencer`]: the per-category local sequence counters
//! - [`KeyManager`]: source of the local certificate name and its counter
//! - [`LoopbackTransport`]: in-process transport for tests and single-node
//!   operation

mod keys;
mod loopback;
mod message;
mod sequencer;
mod session;
mod validator;

pub use keys::{KeyManager, StaticKeyManager};
pub use loopback::LoopbackTransport;
pub use message::{ChangedEntry, SyncMessage};
pub use sequencer::{InMemorySequencer, Sequencer};
pub use session::{SessionError, SessionHandle, SyncSession, SyncTransport};
pub use validator::{AcceptAllValidator, ValidationOutcome, Validator};
