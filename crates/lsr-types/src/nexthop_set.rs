//! Next-hop aggregation set.
//!
//! Consolidates possibly-conflicting advertised routes for one destination
//! into a deduplicated, lowest-cost-preferred set. The merge policy is
//! commutative and idempotent, so rebuilding the set from the same inputs in
//! any order converges to the same result.

use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::nexthop::NextHop;

/// The current best-known forwarding candidates for one destination prefix.
///
/// Invariants:
/// - at most one entry per distinct face URI
/// - among entries competing for a face, only the lowest-cost one is kept
/// - iteration follows the total order of [`NextHop`] (ascending adjusted
///   cost, ties broken by face URI)
#[derive(Debug, Clone, Default, Eq)]
pub struct NextHopSet {
    // Keyed by the (cost, face) total order; per-face uniqueness is enforced
    // in add() with a linear scan, which is fine at neighbor-count sizes.
    hops: BTreeSet<NextHop>,
}

impl NextHopSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate next-hop.
    ///
    /// If no entry shares the face URI, inserts it. If one exists with a
    /// strictly higher cost, replaces it. Otherwise the existing entry wins
    /// (including cost ties). Always succeeds.
    pub fn add(&mut self, next_hop: NextHop) {
        let existing = self
            .hops
            .iter()
            .find(|nh| nh.connecting_face_uri() == next_hop.connecting_face_uri())
            .cloned();

        match existing {
            None => {
                self.hops.insert(next_hop);
            }
            Some(current)
                if current.route_cost_as_adjusted_integer()
                    > next_hop.route_cost_as_adjusted_integer() =>
            {
                self.hops.remove(&current);
                self.hops.insert(next_hop);
            }
            Some(_) => {
                // Existing best route wins.
            }
        }
    }

    /// Removes an entry only if both face URI and cost match exactly.
    ///
    /// Safe to call speculatively: retracting a previously advertised route
    /// cannot remove a newer, better route installed for the same face.
    pub fn remove(&mut self, next_hop: &NextHop) {
        self.hops.remove(next_hop);
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        self.hops.len()
    }

    /// Returns true if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns true if an entry matching both face URI and cost is present.
    pub fn contains(&self, next_hop: &NextHop) -> bool {
        self.hops.contains(next_hop)
    }

    /// Iterates entries in ascending-cost order.
    pub fn iter(&self) -> impl Iterator<Item = &NextHop> {
        self.hops.iter()
    }

    /// Logs an ordered listing of (position, face, cost) for diagnostics.
    pub fn write_log(&self) {
        for (i, nh) in self.hops.iter().enumerate() {
            debug!(
                position = i + 1,
                face = nh.connecting_face_uri(),
                cost = nh.route_cost(),
                "Next hop"
            );
        }
    }
}

impl PartialEq for NextHopSet {
    /// Equal iff same size and elementwise equal in the defined order.
    ///
    /// The size check first makes the lock-step traversal terminate exactly
    /// when both sides are exhausted.
    fn eq(&self, other: &Self) -> bool {
        if self.hops.len() != other.hops.len() {
            return false;
        }
        self.hops.iter().zip(other.hops.iter()).all(|(a, b)| a == b)
    }
}

impl FromIterator<NextHop> for NextHopSet {
    fn from_iter<I: IntoIterator<Item = NextHop>>(iter: I) -> Self {
        let mut set = NextHopSet::new();
        for nh in iter {
            set.add(nh);
        }
        set
    }
}

impl<'a> IntoIterator for &'a NextHopSet {
    type Item = &'a NextHop;
    type IntoIter = std::collections::btree_set::Iter<'a, NextHop>;

    fn into_iter(self) -> Self::IntoIter {
        self.hops.iter()
    }
}

impl fmt::Display for NextHopSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NextHopSet(")?;
        for (i, nh) in self.hops.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", i + 1, nh)?;
        }
        write!(f, ")")
    }
}
