//! lsasyncd - Link-state advertisement synchronization daemon.
//!
//! The state-synchronization and route-aggregation core of a link-state
//! routing daemon for a named-data network. Every router announces its local
//! link costs and maintains, through a pub/sub dissemination layer, a
//! consistent view of topology and security state; advertisements are
//! condensed into per-destination next-hop sets for forwarding.
//!
//! # Architecture
//!
//! ```text
//! local change ──> [SyncUpdateDispatcher] ──publish──> [SyncSession]
//!                         ▲                                 │
//!                  SyncMessage (changed/removed)  <─────────┘  (peers)
//!                         │
//!            classify → dedup → fetch → validate → apply
//!                         │
//!                   [TopologyDb] ──> [RouteComputer] ──> [Rib]
//! ```
//!
//! The dispatcher runs on one cooperative loop; the route computer and RIB
//! rebuild are triggered after any batch that changed the topology.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod lsa;
pub mod rib;
pub mod topology;

pub use config::DaemonConfig;
pub use dispatcher::{AppliedUpdate, DispatchOutcome, SyncUpdateDispatcher};
pub use error::{LsrError, Result};
pub use lsa::{AdvertisedPrefix, LsaPayload};
pub use rib::{AdvertisedPrefixComputer, Rib, RouteComputer};
pub use topology::{LsaRecord, TopologyDb, TrustRecord};
