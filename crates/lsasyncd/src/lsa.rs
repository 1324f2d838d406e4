//! Link-state advertisement payload.
//!
//! The body fetched for a routing update. A router declares the name
//! prefixes it can reach, with the face a neighbor should use to reach it
//! and the advertised cost. The wire shape of the sync layer itself is out
//! of scope; advertisement bodies are JSON records.

use serde::{Deserialize, Serialize};

use lsr_types::{Name, RouterName};

use crate::error::Result;

/// One prefix a router advertises reachability for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisedPrefix {
    /// The destination name prefix.
    pub destination: Name,
    /// The face a neighbor uses to reach the advertising router.
    pub face_uri: String,
    /// Advertised route cost.
    pub cost: f64,
}

/// A router's link-state advertisement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LsaPayload {
    /// The advertising router.
    pub origin: RouterName,
    /// Prefixes reachable through the advertising router.
    pub reachable: Vec<AdvertisedPrefix>,
}

impl LsaPayload {
    pub fn new(origin: RouterName) -> Self {
        Self {
            origin,
            reachable: Vec::new(),
        }
    }

    /// Serializes the advertisement for publication.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserializes a fetched advertisement body.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payload_round_trip() {
        let mut lsa = LsaPayload::new("/ndn/site/router1".parse().unwrap());
        lsa.reachable.push(AdvertisedPrefix {
            destination: "/ndn/site/prefixA".parse().unwrap(),
            face_uri: "udp4://10.0.0.1:6363".to_string(),
            cost: 12.5,
        });

        let bytes = lsa.to_bytes().unwrap();
        let back = LsaPayload::from_bytes(&bytes).unwrap();
        assert_eq!(back, lsa);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(LsaPayload::from_bytes(b"not json").is_err());
    }
}
