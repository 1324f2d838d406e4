//! Next-hop type.
//!
//! A next-hop is one candidate forwarding path: the URI of the connecting
//! face (link/interface) plus an advertised route cost.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Scale applied to route costs before integer comparison.
///
/// Costs arrive as floats; all ordering and equality decisions use the
/// scaled-integer projection so that precision noise cannot make two
/// derivations of the same route disagree.
pub const COST_ADJUSTMENT_FACTOR: f64 = 1000.0;

/// One candidate forwarding path: connecting face plus route cost.
///
/// Immutable once constructed; comparisons never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextHop {
    connecting_face_uri: String,
    route_cost: f64,
}

impl NextHop {
    /// Creates a next-hop. Costs are clamped to be non-negative.
    pub fn new(connecting_face_uri: impl Into<String>, route_cost: f64) -> Self {
        Self {
            connecting_face_uri: connecting_face_uri.into(),
            route_cost: route_cost.max(0.0),
        }
    }

    /// Returns the URI of the connecting face.
    pub fn connecting_face_uri(&self) -> &str {
        &self.connecting_face_uri
    }

    /// Returns the raw route cost.
    pub fn route_cost(&self) -> f64 {
        self.route_cost
    }

    /// Returns the route cost scaled to an integer for stable comparison.
    pub fn route_cost_as_adjusted_integer(&self) -> u64 {
        (self.route_cost * COST_ADJUSTMENT_FACTOR).round() as u64
    }
}

impl PartialEq for NextHop {
    fn eq(&self, other: &Self) -> bool {
        self.connecting_face_uri == other.connecting_face_uri
            && self.route_cost_as_adjusted_integer() == other.route_cost_as_adjusted_integer()
    }
}

impl Eq for NextHop {}

impl Hash for NextHop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.connecting_face_uri.hash(state);
        self.route_cost_as_adjusted_integer().hash(state);
    }
}

impl Ord for NextHop {
    /// Total order: ascending adjusted cost, ties broken by face URI.
    fn cmp(&self, other: &Self) -> Ordering {
        self.route_cost_as_adjusted_integer()
            .cmp(&other.route_cost_as_adjusted_integer())
            .then_with(|| self.connecting_face_uri.cmp(&other.connecting_face_uri))
    }
}

impl PartialOrd for NextHop {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cost {})", self.connecting_face_uri, self.route_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nexthop_accessors() {
        let nh = NextHop::new("udp4://10.0.0.1:6363", 12.5);
        assert_eq!(nh.connecting_face_uri(), "udp4://10.0.0.1:6363");
        assert_eq!(nh.route_cost(), 12.5);
        assert_eq!(nh.route_cost_as_adjusted_integer(), 12_500);
    }

    #[test]
    fn test_negative_cost_clamped() {
        let nh = NextHop::new("udp4://10.0.0.1:6363", -3.0);
        assert_eq!(nh.route_cost(), 0.0);
    }

    #[test]
    fn test_equality_uses_adjusted_integer() {
        // Below the adjustment resolution the two costs are the same route.
        let a = NextHop::new("faceA", 10.0);
        let b = NextHop::new("faceA", 10.0 + 1e-7);
        assert_eq!(a, b);

        let c = NextHop::new("faceA", 10.001);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ordering_cost_then_face() {
        let cheap = NextHop::new("faceZ", 5.0);
        let dear = NextHop::new("faceA", 20.0);
        assert!(cheap < dear);

        // Equal cost: lexical face URI breaks the tie.
        let a = NextHop::new("faceA", 10.0);
        let b = NextHop::new("faceB", 10.0);
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        let nh = NextHop::new("udp4://10.0.0.1:6363", 15.0);
        assert_eq!(nh.to_string(), "udp4://10.0.0.1:6363 (cost 15)");
    }
}
