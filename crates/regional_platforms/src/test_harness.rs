//! # TestHost -- headless test harness
//!
//! An in-memory [`NetworkAccess`] implementation plus a thin wrapper around
//! `bevy::app::App` + [`RegionalPlatformsPlugin`] for running system-level
//! tests without the host game.

use bevy::prelude::*;

use crate::network::{
    BuildingFlags, BuildingId, BuildingKind, LaneId, NetworkAccess, NodeId, SegmentId,
    StopDirection,
};
use crate::platform_connections::{
    BuildingLines, NodeReleaseQueue, PlatformCommand, RegionalPlatforms, RegionalPlatformsPlugin,
    StationChanged, StopPoint,
};

// =============================================================================
// TestNetwork
// =============================================================================

/// In-memory network with scriptable buildings, monotonically increasing
/// entity ids (never reused), and logs of every host primitive invoked.
#[derive(Resource, Debug, Default)]
pub struct TestNetwork {
    buildings: Vec<(BuildingId, BuildingKind, BuildingFlags)>,
    next_node: NodeId,
    next_segment: SegmentId,
    node_alloc_budget: Option<u32>,
    fail_segment_allocs: bool,

    /// Live nodes with the position they were allocated at.
    pub nodes: Vec<(NodeId, Vec3)>,
    /// Live segments as `(id, start, end)`.
    pub segments: Vec<(SegmentId, NodeId, NodeId)>,
    /// Per building, attached nodes in list order (most recent splice first).
    pub attached: Vec<(BuildingId, Vec<NodeId>)>,
    pub disabled_nodes: Vec<NodeId>,
    pub untouchable_segments: Vec<SegmentId>,
    pub updated_nodes: Vec<NodeId>,
    pub updated_segments: Vec<SegmentId>,
    /// Every non-zero id passed to `release_node`, in call order.
    pub released_nodes: Vec<NodeId>,
}

impl TestNetwork {
    // -----------------------------------------------------------------------
    // Scenario setup
    // -----------------------------------------------------------------------

    pub fn add_station(&mut self, id: BuildingId, active: bool) -> &mut Self {
        self.buildings.push((
            id,
            BuildingKind::TransportStation,
            BuildingFlags {
                active,
                ..Default::default()
            },
        ));
        self
    }

    pub fn add_outside_connection(
        &mut self,
        id: BuildingId,
        incoming: bool,
        outgoing: bool,
    ) -> &mut Self {
        self.buildings.push((
            id,
            BuildingKind::Other,
            BuildingFlags {
                active: true,
                incoming,
                outgoing,
            },
        ));
        self
    }

    pub fn add_generic_building(&mut self, id: BuildingId) -> &mut Self {
        self.buildings
            .push((id, BuildingKind::Other, BuildingFlags::default()));
        self
    }

    /// Rewrite a building's flags, e.g. to invalidate an outside connection
    /// between calls.
    pub fn set_building_flags(&mut self, id: BuildingId, flags: BuildingFlags) {
        if let Some(entry) = self.buildings.iter_mut().find(|(b, _, _)| *b == id) {
            entry.2 = flags;
        }
    }

    /// Allow `successes` more node allocations, then fail every one after.
    pub fn fail_node_allocations_after(&mut self, successes: u32) {
        self.node_alloc_budget = Some(successes);
    }

    /// Fail every segment allocation from now on.
    pub fn fail_segment_allocations(&mut self) {
        self.fail_segment_allocs = true;
    }

    // -----------------------------------------------------------------------
    // Assertion helpers
    // -----------------------------------------------------------------------

    pub fn live_node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_position(&self, node: NodeId) -> Option<Vec3> {
        self.nodes
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, p)| *p)
    }

    pub fn segment_between(&self, start: NodeId, end: NodeId) -> Option<SegmentId> {
        self.segments
            .iter()
            .find(|(_, s, e)| *s == start && *e == end)
            .map(|(id, _, _)| *id)
    }

    /// Attached-node list of a building, most recent splice first.
    pub fn attached_list(&self, building: BuildingId) -> &[NodeId] {
        self.attached
            .iter()
            .find(|(b, _)| *b == building)
            .map(|(_, nodes)| nodes.as_slice())
            .unwrap_or(&[])
    }
}

impl NetworkAccess for TestNetwork {
    fn building_kind(&self, building: BuildingId) -> BuildingKind {
        self.buildings
            .iter()
            .find(|(b, _, _)| *b == building)
            .map(|(_, kind, _)| *kind)
            .unwrap_or(BuildingKind::Other)
    }

    fn building_flags(&self, building: BuildingId) -> BuildingFlags {
        self.buildings
            .iter()
            .find(|(b, _, _)| *b == building)
            .map(|(_, _, flags)| *flags)
            .unwrap_or_default()
    }

    fn lane_position(&self, lane: LaneId, t: f32) -> Vec3 {
        // Deterministic fake curve: x encodes the lane, y the parameter.
        Vec3::new(lane as f32, t, 0.0)
    }

    fn stop_position(&self, building: BuildingId, direction: StopDirection) -> Vec3 {
        let z = match direction {
            StopDirection::Incoming => -1.0,
            StopDirection::Outgoing => 1.0,
        };
        Vec3::new(f32::from(building), 0.0, z)
    }

    fn allocate_node(&mut self, _station: BuildingId, position: Vec3) -> Option<NodeId> {
        if let Some(budget) = self.node_alloc_budget.as_mut() {
            if *budget == 0 {
                return None;
            }
            *budget -= 1;
        }
        self.next_node += 1;
        self.nodes.push((self.next_node, position));
        Some(self.next_node)
    }

    fn set_node_disabled(&mut self, node: NodeId) {
        self.disabled_nodes.push(node);
    }

    fn update_node(&mut self, node: NodeId) {
        self.updated_nodes.push(node);
    }

    fn attach_building_node(&mut self, building: BuildingId, node: NodeId) {
        match self.attached.iter_mut().find(|(b, _)| *b == building) {
            Some((_, nodes)) => nodes.insert(0, node),
            None => self.attached.push((building, vec![node])),
        }
    }

    fn allocate_segment(&mut self, start: NodeId, end: NodeId) -> Option<SegmentId> {
        if self.fail_segment_allocs {
            return None;
        }
        self.next_segment += 1;
        self.segments.push((self.next_segment, start, end));
        Some(self.next_segment)
    }

    fn set_segment_untouchable(&mut self, segment: SegmentId) {
        self.untouchable_segments.push(segment);
    }

    fn update_segment(&mut self, segment: SegmentId) {
        self.updated_segments.push(segment);
    }

    fn release_node(&mut self, node: NodeId) {
        if node == 0 {
            return;
        }
        self.released_nodes.push(node);
        self.nodes.retain(|(n, _)| *n != node);
        // The host releases segments transitively with their endpoint nodes.
        self.segments.retain(|(_, s, e)| *s != node && *e != node);
        for (_, nodes) in &mut self.attached {
            nodes.retain(|&n| n != node);
        }
    }
}

// =============================================================================
// TestHost
// =============================================================================

/// A headless Bevy `App` wrapping [`RegionalPlatformsPlugin`] over a
/// [`TestNetwork`], for testing the event-driven systems and the mutation
/// window.
pub struct TestHost {
    pub app: App,
}

impl TestHost {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TestNetwork::default());
        app.add_plugins(RegionalPlatformsPlugin::<TestNetwork>::default());
        Self { app }
    }

    /// Run one fixed tick: commands → reconcile → mutation window.
    pub fn tick(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    pub fn send(&mut self, command: PlatformCommand) {
        let _ = self.app.world_mut().send_event(command);
    }

    pub fn station_changed(&mut self, station: BuildingId) {
        let _ = self.app.world_mut().send_event(StationChanged { station });
    }

    pub fn set_stop_points(&mut self, building: BuildingId, points: Vec<StopPoint>) {
        self.app
            .world_mut()
            .resource_mut::<BuildingLines>()
            .set_stop_points(building, points);
    }

    pub fn network(&self) -> &TestNetwork {
        self.app.world().resource::<TestNetwork>()
    }

    pub fn network_mut(&mut self) -> Mut<'_, TestNetwork> {
        self.app.world_mut().resource_mut::<TestNetwork>()
    }

    pub fn platforms(&self) -> &RegionalPlatforms {
        self.app.world().resource::<RegionalPlatforms>()
    }

    pub fn releases(&self) -> &NodeReleaseQueue {
        self.app.world().resource::<NodeReleaseQueue>()
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
