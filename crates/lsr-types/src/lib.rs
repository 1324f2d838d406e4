//! Common types for link-state routing over a named-data network.
//!
//! This crate provides type-safe representations of the primitives shared
//! between the sync dispatcher and the route programming layer:
//!
//! - [`Name`]: hierarchical, slash-separated names
//! - [`RouterName`]: identity of a participating router
//! - [`UpdateName`]: classification of sync update names by shape
//! - [`NextHop`]: one candidate forwarding path (face URI + route cost)
//! - [`NextHopSet`]: deduplicated, lowest-cost-preferred next hops for one
//!   destination

mod name;
mod nexthop;
mod nexthop_set;

pub use name::{
    Name, RouterName, UpdateCategory, UpdateName, IDENTITY_MARKER, KEY_MARKER, ROUTING_MARKER,
};
pub use nexthop::{NextHop, COST_ADJUSTMENT_FACTOR};
pub use nexthop_set::NextHopSet;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid router name: {0}")]
    InvalidRouterName(String),
}
