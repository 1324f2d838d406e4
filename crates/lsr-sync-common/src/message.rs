//! Notification messages delivered by the transport.
//!
//! The transport reports remote state as explicit messages into the
//! dispatcher's single-threaded loop, rather than through callbacks. This
//! keeps the dispatcher's state machine testable by feeding it a scripted
//! sequence of messages.

use lsr_types::{Name, RouterName};

/// One remote change: a peer published `name` at `seq_no`, which is higher
/// than anything previously observed for that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedEntry {
    pub name: Name,
    pub seq_no: u64,
}

impl ChangedEntry {
    pub fn new(name: Name, seq_no: u64) -> Self {
        Self { name, seq_no }
    }
}

/// A notification from the dissemination layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// One or more publishers advanced their sequence numbers.
    Changed(Vec<ChangedEntry>),
    /// A publisher left the dissemination scope.
    Removed(RouterName),
}
