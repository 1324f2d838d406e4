//! Routing information base.
//!
//! Destination prefix to [`NextHopSet`] mappings, rebuilt wholesale whenever
//! the route-computation collaborator re-derives costs from the topology
//! database. The dispatcher never mutates the RIB directly.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use lsr_types::{Name, NextHop, NextHopSet};

use crate::lsa::LsaPayload;
use crate::topology::TopologyDb;

/// Produces per-destination next-hop candidates from the topology database.
///
/// The seam for the external route computation; the shipped implementation
/// condenses what routers directly advertise, anything smarter plugs in here.
pub trait RouteComputer: Send + Sync {
    /// Returns (destination, candidate) pairs. The same destination may
    /// appear multiple times with conflicting candidates; the RIB merge
    /// resolves them.
    fn compute(&self, topology: &TopologyDb) -> Vec<(Name, NextHop)>;
}

/// Route computer that condenses advertised prefixes across all applied
/// advertisements. Unparseable advertisement bodies are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdvertisedPrefixComputer;

impl RouteComputer for AdvertisedPrefixComputer {
    fn compute(&self, topology: &TopologyDb) -> Vec<(Name, NextHop)> {
        let mut candidates = Vec::new();
        for (router, record) in topology.lsas() {
            let payload = match LsaPayload::from_bytes(&record.content) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(%router, error = %e, "Skipping unparseable advertisement");
                    continue;
                }
            };
            for adv in payload.reachable {
                candidates.push((adv.destination, NextHop::new(adv.face_uri, adv.cost)));
            }
        }
        candidates
    }
}

/// The per-destination forwarding candidates currently installed.
#[derive(Debug, Default)]
pub struct Rib {
    entries: BTreeMap<Name, NextHopSet>,
}

impl Rib {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current contents and rebuilds from `candidates`.
    ///
    /// Candidates for the same destination are merged with lowest-cost-wins
    /// semantics, so the result is independent of input order.
    pub fn rebuild(&mut self, candidates: impl IntoIterator<Item = (Name, NextHop)>) {
        self.entries.clear();
        for (destination, next_hop) in candidates {
            self.entries.entry(destination).or_default().add(next_hop);
        }
        debug!(destinations = self.entries.len(), "Rebuilt RIB");
    }

    /// Returns the next-hop set for a destination.
    pub fn lookup(&self, destination: &Name) -> Option<&NextHopSet> {
        self.entries.get(destination)
    }

    /// Number of destinations with at least one next hop.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates destinations in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &NextHopSet)> {
        self.entries.iter()
    }

    /// Logs the full RIB for diagnostics.
    pub fn write_log(&self) {
        for (destination, hops) in &self.entries {
            debug!(%destination, next_hops = %hops, "RIB entry");
            hops.write_log();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsa::AdvertisedPrefix;
    use pretty_assertions::assert_eq;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn test_rebuild_merges_conflicting_candidates() {
        let mut rib = Rib::new();
        let dest = name("/ndn/site/prefixA");

        rib.rebuild(vec![
            (dest.clone(), NextHop::new("faceA", 20.0)),
            (dest.clone(), NextHop::new("faceB", 15.0)),
            (dest.clone(), NextHop::new("faceA", 10.0)),
        ]);

        let hops = rib.lookup(&dest).unwrap();
        assert_eq!(hops.size(), 2);
        let order: Vec<&str> = hops.iter().map(|nh| nh.connecting_face_uri()).collect();
        assert_eq!(order, vec!["faceA", "faceB"]);
    }

    #[test]
    fn test_rebuild_is_wholesale() {
        let mut rib = Rib::new();
        rib.rebuild(vec![(name("/ndn/old"), NextHop::new("faceA", 1.0))]);
        assert!(rib.lookup(&name("/ndn/old")).is_some());

        rib.rebuild(vec![(name("/ndn/new"), NextHop::new("faceB", 2.0))]);
        assert!(rib.lookup(&name("/ndn/old")).is_none());
        assert_eq!(rib.len(), 1);
    }

    #[test]
    fn test_advertised_prefix_computer() {
        let mut topology = TopologyDb::new();

        let r1: lsr_types::RouterName = "/ndn/site/router1".parse().unwrap();
        let mut lsa1 = LsaPayload::new(r1.clone());
        lsa1.reachable.push(AdvertisedPrefix {
            destination: name("/ndn/site/prefixA"),
            face_uri: "faceA".to_string(),
            cost: 20.0,
        });
        topology.install_lsa(r1, 1, lsa1.to_bytes().unwrap());

        let r2: lsr_types::RouterName = "/ndn/site/router2".parse().unwrap();
        let mut lsa2 = LsaPayload::new(r2.clone());
        lsa2.reachable.push(AdvertisedPrefix {
            destination: name("/ndn/site/prefixA"),
            face_uri: "faceB".to_string(),
            cost: 15.0,
        });
        topology.install_lsa(r2, 1, lsa2.to_bytes().unwrap());

        let mut rib = Rib::new();
        rib.rebuild(AdvertisedPrefixComputer.compute(&topology));

        let hops = rib.lookup(&name("/ndn/site/prefixA")).unwrap();
        let order: Vec<(&str, f64)> = hops
            .iter()
            .map(|nh| (nh.connecting_face_uri(), nh.route_cost()))
            .collect();
        assert_eq!(order, vec![("faceB", 15.0), ("faceA", 20.0)]);
    }

    #[test]
    fn test_computer_skips_malformed_lsa() {
        let mut topology = TopologyDb::new();
        let r1: lsr_types::RouterName = "/ndn/site/router1".parse().unwrap();
        topology.install_lsa(r1, 1, b"garbage".to_vec());

        assert!(AdvertisedPrefixComputer.compute(&topology).is_empty());
    }
}
