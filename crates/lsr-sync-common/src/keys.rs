//! Key manager seam.
//!
//! The key manager owns the router's certificate and its own sequence
//! counter; the dispatcher reads both when publishing a key update.

use lsr_types::Name;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the local certificate name and its sequence number.
pub trait KeyManager: Send + Sync {
    /// Returns the name of the router's current certificate.
    ///
    /// Must carry the `keys` marker component so peers can classify it.
    fn certificate_name(&self) -> Name;

    /// Returns the current certificate sequence number.
    fn certificate_seq_no(&self) -> u64;
}

/// Key manager backed by a fixed certificate name.
#[derive(Debug)]
pub struct StaticKeyManager {
    cert_name: Name,
    seq_no: AtomicU64,
}

impl StaticKeyManager {
    pub fn new(cert_name: Name) -> Self {
        Self {
            cert_name,
            seq_no: AtomicU64::new(0),
        }
    }

    /// Advances the certificate counter, e.g. after a key rollover.
    pub fn bump(&self) -> u64 {
        self.seq_no.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl KeyManager for StaticKeyManager {
    fn certificate_name(&self) -> Name {
        self.cert_name.clone()
    }

    fn certificate_seq_no(&self) -> u64 {
        self.seq_no.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_static_key_manager() {
        let cert: Name = "/ndn/site/router1/keys/ksk-1".parse().unwrap();
        let keys = StaticKeyManager::new(cert.clone());

        assert_eq!(keys.certificate_name(), cert);
        assert_eq!(keys.certificate_seq_no(), 0);
        assert_eq!(keys.bump(), 1);
        assert_eq!(keys.certificate_seq_no(), 1);
    }
}
