//! The `NetworkAccess` trait: every host primitive the registry and builder
//! touch, and nothing else.

use bevy::prelude::*;

use super::types::{BuildingFlags, BuildingId, BuildingKind, LaneId, NodeId, SegmentId,
    StopDirection};

/// Injected port over the host's mutable network and building buffers.
///
/// All structural writes go through these methods. Implementations must treat
/// the zero id as a safe no-op wherever a node or segment id is consumed, so
/// callers can pass the "not created" sentinel without guarding.
pub trait NetworkAccess {
    /// Behavior descriptor kind of a building.
    fn building_kind(&self, building: BuildingId) -> BuildingKind;

    /// Current flags of a building.
    fn building_flags(&self, building: BuildingId) -> BuildingFlags;

    /// Point at parametric position `t` along a lane's curve.
    fn lane_position(&self, lane: LaneId, t: f32) -> Vec3;

    /// Stop position on an outside-connection building for the given
    /// direction.
    fn stop_position(&self, building: BuildingId, direction: StopDirection) -> Vec3;

    /// Allocate a connection node at `position` via the station's behavior
    /// descriptor. `None` when the host cannot allocate.
    fn allocate_node(&mut self, station: BuildingId, position: Vec3) -> Option<NodeId>;

    /// Flag a node disabled (its owning building is inactive).
    fn set_node_disabled(&mut self, node: NodeId);

    /// Refresh a node's derived state after a structural change.
    fn update_node(&mut self, node: NodeId);

    /// Prepend `node` to `building`'s linked list of attached nodes.
    fn attach_building_node(&mut self, building: BuildingId, node: NodeId);

    /// Allocate a directed segment from `start` to `end`. `None` when the
    /// host cannot allocate; callers tolerate this.
    fn allocate_segment(&mut self, start: NodeId, end: NodeId) -> Option<SegmentId>;

    /// Protect a segment from player demolition/modification.
    fn set_segment_untouchable(&mut self, segment: SegmentId);

    /// Refresh a segment's derived state after a structural change.
    fn update_segment(&mut self, segment: SegmentId);

    /// Release a node. Segments terminating at the node are released
    /// transitively by the host. Releasing id zero is a no-op.
    fn release_node(&mut self, node: NodeId);
}
