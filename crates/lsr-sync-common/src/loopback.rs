//! In-process loopback transport.
//!
//! Connects every session created from one transport through a shared bus:
//! a publish on one session is delivered as a [`SyncMessage::Changed`] to
//! every other session bound to the same scope prefix, and a content store
//! backs `fetch`. Used by the test suites and by single-node daemon runs
//! where no network transport is wired in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::trace;

use lsr_types::{Name, RouterName};

use crate::message::{ChangedEntry, SyncMessage};
use crate::session::{SessionError, SessionHandle, SyncSession, SyncTransport};

struct Subscriber {
    id: u64,
    scope_prefix: Name,
    tx: mpsc::UnboundedSender<SyncMessage>,
}

#[derive(Default)]
struct Bus {
    /// Published content, keyed by (name, seq_no).
    content: HashMap<(Name, u64), Vec<u8>>,
    /// Highest sequence number observed per name.
    latest: HashMap<Name, u64>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Transport connecting all of its sessions in-process.
#[derive(Clone, Default)]
pub struct LoopbackTransport {
    bus: Arc<Mutex<Bus>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages content so that peers can fetch `(name, seq_no)`.
    ///
    /// A publisher stores its advertisement here before announcing it.
    pub fn insert_content(&self, name: Name, seq_no: u64, content: Vec<u8>) {
        let mut bus = self.bus.lock().expect("loopback bus poisoned");
        bus.content.insert((name, seq_no), content);
    }

    /// Announces that `router` has left the scope.
    ///
    /// Delivers a removal notification to every session and drops the
    /// router's staged content and sequence records.
    pub fn withdraw(&self, router: &RouterName) {
        let mut bus = self.bus.lock().expect("loopback bus poisoned");
        let prefix = router.as_name();
        bus.content.retain(|(name, _), _| !name.starts_with(prefix));
        bus.latest.retain(|name, _| !name.starts_with(prefix));
        let msg = SyncMessage::Removed(router.clone());
        bus.subscribers
            .retain(|sub| sub.tx.send(msg.clone()).is_ok());
    }
}

impl SyncTransport for LoopbackTransport {
    fn create_session(&self, scope_prefix: Name) -> Result<SessionHandle, SessionError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut bus = self.bus.lock().expect("loopback bus poisoned");
        let id = bus.next_id;
        bus.next_id += 1;
        bus.subscribers.push(Subscriber {
            id,
            scope_prefix: scope_prefix.clone(),
            tx,
        });

        let session = Arc::new(LoopbackSession {
            id,
            scope_prefix,
            bus: Arc::clone(&self.bus),
        });

        Ok(SessionHandle {
            session,
            notifications: rx,
        })
    }
}

struct LoopbackSession {
    id: u64,
    scope_prefix: Name,
    bus: Arc<Mutex<Bus>>,
}

#[async_trait::async_trait]
impl SyncSession for LoopbackSession {
    fn scope_prefix(&self) -> &Name {
        &self.scope_prefix
    }

    async fn publish(&self, name: &Name, seq_no: u64) -> Result<(), SessionError> {
        let mut bus = self.bus.lock().expect("loopback bus poisoned");

        // The sync layer only propagates strictly higher sequence numbers.
        if bus.latest.get(name).is_some_and(|&last| seq_no <= last) {
            trace!(%name, seq_no, "Loopback publish at stale seq, not propagated");
            return Ok(());
        }
        bus.latest.insert(name.clone(), seq_no);

        let msg = SyncMessage::Changed(vec![ChangedEntry::new(name.clone(), seq_no)]);
        let (own_id, scope) = (self.id, &self.scope_prefix);
        bus.subscribers.retain(|sub| {
            if sub.id == own_id || sub.scope_prefix != *scope {
                return true;
            }
            sub.tx.send(msg.clone()).is_ok()
        });
        Ok(())
    }

    async fn fetch(&self, name: &Name, seq_no: u64) -> Result<Vec<u8>, SessionError> {
        let bus = self.bus.lock().expect("loopback bus poisoned");
        bus.content
            .get(&(name.clone(), seq_no))
            .cloned()
            .ok_or_else(|| SessionError::Fetch {
                name: name.clone(),
                seq_no,
                reason: "no content staged".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope() -> Name {
        "/ndn/broadcast/sync".parse().unwrap()
    }

    #[tokio::test]
    async fn test_publish_reaches_other_sessions_only() {
        let transport = LoopbackTransport::new();
        let mut a = transport.create_session(scope()).unwrap();
        let mut b = transport.create_session(scope()).unwrap();

        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        a.session.publish(&name, 1).await.unwrap();

        let msg = b.notifications.try_recv().unwrap();
        assert_eq!(
            msg,
            SyncMessage::Changed(vec![ChangedEntry::new(name, 1)])
        );
        assert!(a.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_publish_not_propagated() {
        let transport = LoopbackTransport::new();
        let a = transport.create_session(scope()).unwrap();
        let mut b = transport.create_session(scope()).unwrap();

        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        a.session.publish(&name, 5).await.unwrap();
        a.session.publish(&name, 5).await.unwrap();
        a.session.publish(&name, 3).await.unwrap();

        assert!(b.notifications.try_recv().is_ok());
        assert!(b.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_scope_isolation() {
        let transport = LoopbackTransport::new();
        let a = transport.create_session(scope()).unwrap();
        let mut other = transport
            .create_session("/ndn/other/sync".parse().unwrap())
            .unwrap();

        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        a.session.publish(&name, 1).await.unwrap();
        assert!(other.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fetch_staged_content() {
        let transport = LoopbackTransport::new();
        let a = transport.create_session(scope()).unwrap();

        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        transport.insert_content(name.clone(), 2, b"lsa-body".to_vec());

        assert_eq!(a.session.fetch(&name, 2).await.unwrap(), b"lsa-body");
        assert!(a.session.fetch(&name, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_withdraw_notifies_and_purges() {
        let transport = LoopbackTransport::new();
        let mut a = transport.create_session(scope()).unwrap();

        let router: RouterName = "/ndn/site/router1".parse().unwrap();
        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        transport.insert_content(name.clone(), 1, b"lsa".to_vec());

        transport.withdraw(&router);

        assert_eq!(
            a.notifications.try_recv().unwrap(),
            SyncMessage::Removed(router)
        );
        assert!(a.session.fetch(&name, 1).await.is_err());
    }
}
