//! Topology and trust database.
//!
//! Holds the validated state the dispatcher has applied: one link-state
//! advertisement per router, plus certificate and identity records keyed by
//! name with the owning router tracked so a departing router's state can be
//! purged in one call.

use std::collections::HashMap;
use tracing::debug;

use lsr_types::{Name, RouterName};

/// A router's latest applied link-state advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsaRecord {
    pub seq_no: u64,
    pub content: Vec<u8>,
}

/// A validated certificate or identity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustRecord {
    pub owner: RouterName,
    pub seq_no: u64,
    pub content: Vec<u8>,
}

/// Validated topology and trust state, written only by the dispatcher and
/// read by the route-computation collaborator.
#[derive(Debug, Default)]
pub struct TopologyDb {
    lsas: HashMap<RouterName, LsaRecord>,
    certificates: HashMap<Name, TrustRecord>,
    identities: HashMap<Name, TrustRecord>,
}

impl TopologyDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs (or replaces) a router's link-state advertisement.
    pub fn install_lsa(&mut self, router: RouterName, seq_no: u64, content: Vec<u8>) {
        self.lsas.insert(router, LsaRecord { seq_no, content });
    }

    /// Returns a router's latest advertisement, if any.
    pub fn lsa(&self, router: &RouterName) -> Option<&LsaRecord> {
        self.lsas.get(router)
    }

    /// Iterates all applied advertisements.
    pub fn lsas(&self) -> impl Iterator<Item = (&RouterName, &LsaRecord)> {
        self.lsas.iter()
    }

    /// Installs (or replaces) a certificate record.
    pub fn install_certificate(
        &mut self,
        owner: RouterName,
        cert_name: Name,
        seq_no: u64,
        content: Vec<u8>,
    ) {
        self.certificates.insert(
            cert_name,
            TrustRecord {
                owner,
                seq_no,
                content,
            },
        );
    }

    /// Returns a certificate record by name.
    pub fn certificate(&self, cert_name: &Name) -> Option<&TrustRecord> {
        self.certificates.get(cert_name)
    }

    /// Installs (or replaces) an identity record.
    pub fn install_identity(
        &mut self,
        owner: RouterName,
        identity_name: Name,
        seq_no: u64,
        content: Vec<u8>,
    ) {
        self.identities.insert(
            identity_name,
            TrustRecord {
                owner,
                seq_no,
                content,
            },
        );
    }

    /// Returns an identity record by name.
    pub fn identity(&self, identity_name: &Name) -> Option<&TrustRecord> {
        self.identities.get(identity_name)
    }

    /// Number of routers with an applied advertisement.
    pub fn router_count(&self) -> usize {
        self.lsas.len()
    }

    /// Purges every record attributable to `router`.
    ///
    /// Idempotent; returns true if anything was removed.
    pub fn purge_router(&mut self, router: &RouterName) -> bool {
        let had_lsa = self.lsas.remove(router).is_some();

        let certs_before = self.certificates.len();
        self.certificates.retain(|_, record| record.owner != *router);
        let idents_before = self.identities.len();
        self.identities.retain(|_, record| record.owner != *router);

        let purged = had_lsa
            || self.certificates.len() != certs_before
            || self.identities.len() != idents_before;
        if purged {
            debug!(%router, "Purged topology and trust state");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn router(s: &str) -> RouterName {
        s.parse().unwrap()
    }

    #[test]
    fn test_install_and_replace_lsa() {
        let mut db = TopologyDb::new();
        let r = router("/ndn/site/router1");

        db.install_lsa(r.clone(), 1, b"v1".to_vec());
        db.install_lsa(r.clone(), 2, b"v2".to_vec());

        let record = db.lsa(&r).unwrap();
        assert_eq!(record.seq_no, 2);
        assert_eq!(record.content, b"v2");
        assert_eq!(db.router_count(), 1);
    }

    #[test]
    fn test_purge_removes_all_categories() {
        let mut db = TopologyDb::new();
        let r1 = router("/ndn/site/router1");
        let r2 = router("/ndn/site/router2");

        db.install_lsa(r1.clone(), 3, b"lsa1".to_vec());
        db.install_lsa(r2.clone(), 1, b"lsa2".to_vec());
        let cert: Name = "/ndn/site/router1/keys/ksk-1".parse().unwrap();
        db.install_certificate(r1.clone(), cert.clone(), 1, b"cert".to_vec());
        let ident: Name = "/ndn/site/router1/id-cert".parse().unwrap();
        db.install_identity(r1.clone(), ident.clone(), 1, b"id".to_vec());

        assert!(db.purge_router(&r1));
        assert!(db.lsa(&r1).is_none());
        assert!(db.certificate(&cert).is_none());
        assert!(db.identity(&ident).is_none());

        // Unrelated state survives.
        assert!(db.lsa(&r2).is_some());

        // Second purge is a no-op.
        assert!(!db.purge_router(&r1));
    }

    #[test]
    fn test_purge_unknown_router_noop() {
        let mut db = TopologyDb::new();
        assert!(!db.purge_router(&router("/ndn/site/ghost")));
    }
}
