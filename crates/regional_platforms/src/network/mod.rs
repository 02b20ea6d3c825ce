//! Port over the host simulation's spatial network.
//!
//! The host owns the node/segment/lane/building buffers and mutates them in
//! place; everything here addresses them by integer id through the
//! [`NetworkAccess`] trait. The registry and builder depend only on this
//! trait, so tests run against an in-memory implementation.

pub mod port;
pub mod types;

pub use port::NetworkAccess;
pub use types::{
    BuildingFlags, BuildingId, BuildingKind, LaneId, NodeId, SegmentId, StopDirection,
};
