//! Sync update dispatcher.
//!
//! Owns the one pub/sub session bound to the dissemination scope, publishes
//! local sequence-number changes, and reacts to remote notifications:
//! classify by name shape, dedup against the last applied sequence number
//! per (publisher, category), fetch the content, submit it to the validator,
//! and apply it to the topology/trust database only on acceptance.
//!
//! All entry points run on one cooperative loop; the only suspension point
//! is the fetch-and-validate step, and state is mutated only in its
//! continuation, never speculatively.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use lsr_sync_common::{
    ChangedEntry, KeyManager, Sequencer, SyncMessage, SyncSession, SyncTransport,
    ValidationOutcome, Validator,
};
use lsr_types::{Name, RouterName, UpdateCategory, UpdateName};

use crate::error::{LsrError, Result};
use crate::topology::TopologyDb;

/// One remote update that was fetched, validated, and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUpdate {
    pub router: RouterName,
    pub category: UpdateCategory,
    pub seq_no: u64,
}

/// What a batch of notifications did to local state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Updates applied to the topology/trust database.
    pub applied: Vec<AppliedUpdate>,
    /// Routers whose state was purged.
    pub removed: Vec<RouterName>,
}

impl DispatchOutcome {
    /// True if the topology database changed and routes should be re-derived.
    pub fn topology_changed(&self) -> bool {
        !self.applied.is_empty() || !self.removed.is_empty()
    }
}

/// State-synchronization core of the routing daemon.
pub struct SyncUpdateDispatcher {
    router_name: RouterName,
    scope_prefix: Name,
    session: Option<Arc<dyn SyncSession>>,
    validator: Arc<dyn Validator>,
    topology: TopologyDb,
    /// Last applied sequence number per (publisher, category).
    applied: HashMap<(RouterName, UpdateCategory), u64>,
    /// Bumped on every removal; an in-flight fetch that started under an
    /// older generation discards its result instead of resurrecting state.
    /// Entries for departed routers are retained: with no tracking of
    /// outstanding fetches, dropping one could let a stale fetch apply.
    /// Growth is bounded by the distinct router names seen in the scope.
    purge_generation: HashMap<RouterName, u64>,
}

impl SyncUpdateDispatcher {
    /// Creates a dispatcher for `router_name` in `scope_prefix`.
    ///
    /// No session exists yet; call [`create_session`](Self::create_session)
    /// before publishing.
    pub fn new(router_name: RouterName, scope_prefix: Name, validator: Arc<dyn Validator>) -> Self {
        Self {
            router_name,
            scope_prefix,
            session: None,
            validator,
            topology: TopologyDb::new(),
            applied: HashMap::new(),
            purge_generation: HashMap::new(),
        }
    }

    pub fn router_name(&self) -> &RouterName {
        &self.router_name
    }

    pub fn scope_prefix(&self) -> &Name {
        &self.scope_prefix
    }

    /// The validated topology/trust state applied so far.
    pub fn topology(&self) -> &TopologyDb {
        &self.topology
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Last applied sequence number for a publisher and category.
    pub fn last_applied(&self, router: &RouterName, category: UpdateCategory) -> Option<u64> {
        self.applied.get(&(router.clone(), category)).copied()
    }

    /// Replaces the dissemination scope. Idempotent for the same value;
    /// a different value clears the prior scope and drops the session,
    /// which must then be recreated.
    pub fn set_scope_prefix(&mut self, prefix: Name) {
        if self.scope_prefix == prefix {
            return;
        }
        info!(old = %self.scope_prefix, new = %prefix, "Rebinding dissemination scope");
        self.scope_prefix = prefix;
        self.session = None;
    }

    /// Constructs the session through the injected transport.
    ///
    /// Returns the notification stream the caller's dispatch loop must
    /// drain. Failure here is fatal for the daemon: it cannot route
    /// without dissemination.
    pub fn create_session(
        &mut self,
        transport: &dyn SyncTransport,
    ) -> Result<mpsc::UnboundedReceiver<SyncMessage>> {
        let handle = transport.create_session(self.scope_prefix.clone())?;
        self.session = Some(handle.session);
        info!(scope = %self.scope_prefix, "Sync session created");
        Ok(handle.notifications)
    }

    /// Publishes the current routing sequence number for a destination.
    ///
    /// The counter belongs to the sequencer; this only serializes and
    /// transmits its current value.
    pub async fn publish_routing_update(
        &self,
        sequencer: &dyn Sequencer,
        destination: &Name,
    ) -> Result<()> {
        let name = UpdateName::routing(&self.router_name, destination);
        self.publish_update(name, sequencer.seq_no(UpdateCategory::Routing))
            .await
    }

    /// Publishes the current certificate sequence number.
    pub async fn publish_key_update(&self, keys: &dyn KeyManager) -> Result<()> {
        self.publish_update(keys.certificate_name(), keys.certificate_seq_no())
            .await
    }

    /// Publishes the current identity sequence number for `identity_name`.
    pub async fn publish_identity_update(
        &self,
        sequencer: &dyn Sequencer,
        identity_name: &Name,
    ) -> Result<()> {
        let name = UpdateName::identity(identity_name);
        self.publish_update(name, sequencer.seq_no(UpdateCategory::Identity))
            .await
    }

    /// The single choke point all publishes route through.
    async fn publish_update(&self, name: Name, seq_no: u64) -> Result<()> {
        let session = self.session.as_ref().ok_or(LsrError::SessionNotCreated)?;
        debug!(%name, seq_no, "Publishing sync update");
        session.publish(&name, seq_no).await?;
        Ok(())
    }

    /// Processes one notification from the transport.
    pub async fn handle_message(&mut self, message: SyncMessage) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        match message {
            SyncMessage::Changed(entries) => {
                self.on_remote_change(entries, &mut outcome).await;
            }
            SyncMessage::Removed(router) => {
                if self.on_remote_removal(&router) {
                    outcome.removed.push(router);
                }
            }
        }
        outcome
    }

    /// Classifies and processes a batch of remote changes.
    async fn on_remote_change(&mut self, entries: Vec<ChangedEntry>, outcome: &mut DispatchOutcome) {
        for entry in entries {
            match UpdateName::classify(&entry.name) {
                UpdateName::Routing {
                    router,
                    destination: _,
                } => {
                    if router == self.router_name {
                        trace!(name = %entry.name, "Ignoring own routing update");
                        continue;
                    }
                    if let Some(applied) = self
                        .process_routing_update(router, entry.name, entry.seq_no)
                        .await
                    {
                        outcome.applied.push(applied);
                    }
                }
                UpdateName::Key { router, cert_name } => {
                    if router == self.router_name {
                        trace!(name = %cert_name, "Ignoring own key update");
                        continue;
                    }
                    if let Some(applied) = self
                        .process_keys_update(router, cert_name, entry.seq_no)
                        .await
                    {
                        outcome.applied.push(applied);
                    }
                }
                UpdateName::Identity {
                    router,
                    identity_name,
                } => {
                    if router == self.router_name {
                        trace!(name = %identity_name, "Ignoring own identity update");
                        continue;
                    }
                    if let Some(applied) = self
                        .process_identity_update(router, identity_name, entry.seq_no)
                        .await
                    {
                        outcome.applied.push(applied);
                    }
                }
                UpdateName::Unrecognized => {
                    warn!(name = %entry.name, seq_no = entry.seq_no, "Dropping unrecognized update name");
                }
            }
        }
    }

    /// Purges every piece of state attributable to `router`.
    ///
    /// Idempotent; unknown prefixes are a no-op. Returns true if any state
    /// was removed.
    pub fn on_remote_removal(&mut self, router: &RouterName) -> bool {
        let seq_entries = self.applied.len();
        self.applied.retain(|(r, _), _| r != router);
        let purged_seqs = self.applied.len() != seq_entries;

        let purged_db = self.topology.purge_router(router);

        // Any fetch still in flight for this router must not apply.
        *self.purge_generation.entry(router.clone()).or_insert(0) += 1;

        if purged_seqs || purged_db {
            info!(%router, "Router left the scope, purged its state");
            true
        } else {
            debug!(%router, "Removal for unknown router, nothing to purge");
            false
        }
    }

    async fn process_routing_update(
        &mut self,
        router: RouterName,
        name: Name,
        seq_no: u64,
    ) -> Option<AppliedUpdate> {
        let content = self
            .fetch_validated(&router, UpdateCategory::Routing, &name, seq_no)
            .await?;
        self.topology.install_lsa(router.clone(), seq_no, content);
        self.record_applied(router, UpdateCategory::Routing, seq_no)
    }

    async fn process_keys_update(
        &mut self,
        router: RouterName,
        cert_name: Name,
        seq_no: u64,
    ) -> Option<AppliedUpdate> {
        let content = self
            .fetch_validated(&router, UpdateCategory::Key, &cert_name, seq_no)
            .await?;
        self.topology
            .install_certificate(router.clone(), cert_name, seq_no, content);
        self.record_applied(router, UpdateCategory::Key, seq_no)
    }

    async fn process_identity_update(
        &mut self,
        router: RouterName,
        identity_name: Name,
        seq_no: u64,
    ) -> Option<AppliedUpdate> {
        let content = self
            .fetch_validated(&router, UpdateCategory::Identity, &identity_name, seq_no)
            .await?;
        self.topology
            .install_identity(router.clone(), identity_name, seq_no, content);
        self.record_applied(router, UpdateCategory::Identity, seq_no)
    }

    /// Dedup, fetch, validate. Returns the content only when it is safe to
    /// apply; every other path drops the update and leaves state untouched.
    async fn fetch_validated(
        &mut self,
        router: &RouterName,
        category: UpdateCategory,
        name: &Name,
        seq_no: u64,
    ) -> Option<Vec<u8>> {
        if self.is_stale(router, category, seq_no) {
            trace!(%router, %category, seq_no, "Ignoring stale sequence number");
            return None;
        }

        let Some(session) = self.session.clone() else {
            warn!(%name, "No session, dropping remote update");
            return None;
        };
        let generation = self.purge_generation.get(router).copied().unwrap_or(0);

        let content = match session.fetch(name, seq_no).await {
            Ok(content) => content,
            Err(e) => {
                // The transport's own resync logic redelivers later.
                warn!(%name, seq_no, error = %e, "Fetch failed, dropping update");
                return None;
            }
        };

        match self.validator.validate(name, &content).await {
            ValidationOutcome::Accept => {}
            ValidationOutcome::Reject(reason) => {
                // Terminal for this update: the same content yields the
                // same verdict, so there is no retry.
                warn!(%name, seq_no, %reason, "Validator rejected update");
                return None;
            }
        }

        // Re-check after the suspension point: the publisher may have been
        // withdrawn, or a higher sequence number applied, while the fetch
        // was in flight.
        if self.purge_generation.get(router).copied().unwrap_or(0) != generation {
            debug!(%router, seq_no, "Publisher withdrawn during fetch, dropping update");
            return None;
        }
        if self.is_stale(router, category, seq_no) {
            trace!(%router, %category, seq_no, "Superseded during fetch, dropping update");
            return None;
        }

        Some(content)
    }

    fn is_stale(&self, router: &RouterName, category: UpdateCategory, seq_no: u64) -> bool {
        self.last_applied(router, category)
            .is_some_and(|last| seq_no <= last)
    }

    fn record_applied(
        &mut self,
        router: RouterName,
        category: UpdateCategory,
        seq_no: u64,
    ) -> Option<AppliedUpdate> {
        self.applied
            .insert((router.clone(), category), seq_no);
        info!(%router, %category, seq_no, "Applied remote update");
        Some(AppliedUpdate {
            router,
            category,
            seq_no,
        })
    }
}
