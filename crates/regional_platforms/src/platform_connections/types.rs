//! Data model for platform → outside-connection links.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BuildingId, LaneId, NodeId, SegmentId};
use crate::platform_key::PlatformKey;

// =============================================================================
// Links
// =============================================================================

/// The procedural network entities realizing one platform ↔ outside-connection
/// link. Zero means "not created".
///
/// A link is complete only if both node ids are non-zero; the segments are
/// best-effort and may legitimately stay zero.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode,
)]
pub struct ConnectionLink {
    /// Node spliced into the station building, at the platform's lane
    /// midpoint.
    pub station_node: NodeId,
    /// Node at the outside connection's stop position.
    pub outside_connection_node: NodeId,
    /// Directed segment outside connection → station (created for the
    /// `incoming` flag).
    pub segment_to_station: SegmentId,
    /// Directed segment station → outside connection (created for the
    /// `outgoing` flag).
    pub segment_to_outside_connection: SegmentId,
}

impl ConnectionLink {
    /// Both nodes exist. Segments are not required.
    pub fn is_complete(&self) -> bool {
        self.station_node != 0 && self.outside_connection_node != 0
    }
}

/// State of one registered outside-connection target.
///
/// An explicit variant rather than an optional link: "requested but not yet
/// built" and "absent from the registry" are different things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum LinkState {
    /// Target requested, awaiting (re)construction.
    Pending,
    /// Link realized in the network.
    Complete(ConnectionLink),
}

impl LinkState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LinkState::Pending)
    }

    /// The realized link, if any.
    pub fn link(&self) -> Option<&ConnectionLink> {
        match self {
            LinkState::Pending => None,
            LinkState::Complete(link) => Some(link),
        }
    }
}

/// One entry of the connection registry: an outside-connection building and
/// the state of its link. Entries keep insertion order for deterministic
/// iteration (UI display order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ConnectionTarget {
    pub outside_connection: BuildingId,
    pub state: LinkState,
}

// =============================================================================
// Stop points
// =============================================================================

/// One stop point a station serves, as supplied by the building-lines data
/// source: the boarding lane and the vehicle lane it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct StopPoint {
    pub platform_lane: LaneId,
    pub vehicle_lane: LaneId,
}

impl StopPoint {
    /// The platform key identifying this stop point, if both lane ids fit.
    pub fn key(self) -> Option<PlatformKey> {
        PlatformKey::pack(self.platform_lane, self.vehicle_lane)
    }
}
