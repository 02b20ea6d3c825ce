//! Identifier aliases and building descriptors shared with the host network.

/// Network node id. Zero is the sentinel for "not created".
pub type NodeId = u16;

/// Network segment id. Zero is the sentinel for "not created".
pub type SegmentId = u16;

/// Building id in the host's building buffer.
pub type BuildingId = u16;

/// Lane id in the host's lane buffer. Lane ids are 31-bit values; see
/// [`crate::platform_key::PlatformKey`].
pub type LaneId = u32;

/// Behavior descriptor of a building, as far as this subsystem cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingKind {
    /// A transport station whose behavior descriptor can allocate
    /// connection nodes and segments.
    TransportStation,
    /// Anything else. Links are never attached to these.
    Other,
}

/// Direction used when looking up an outside connection's stop position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDirection {
    Incoming,
    Outgoing,
}

/// The building flags this subsystem reads.
///
/// `incoming`/`outgoing` are independent bits on outside-connection
/// buildings; both may be set, producing one segment per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildingFlags {
    pub active: bool,
    pub incoming: bool,
    pub outgoing: bool,
}

impl BuildingFlags {
    /// True if at least one direction bit is set, i.e. the building can act
    /// as an outside connection at all.
    pub fn has_direction(self) -> bool {
        self.incoming || self.outgoing
    }

    /// Direction used for the stop-position lookup: `Incoming` only when the
    /// building is flagged incoming-only, otherwise `Outgoing`.
    ///
    /// This default is deliberately asymmetric with the per-bit segment
    /// creation checks in the builder; it matches the game's behavior.
    pub fn stop_direction(self) -> StopDirection {
        if self.incoming && !self.outgoing {
            StopDirection::Incoming
        } else {
            StopDirection::Outgoing
        }
    }
}
