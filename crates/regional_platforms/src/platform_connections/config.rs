//! The connection registry for a single station platform.
//!
//! `PlatformConfig` owns the *relation* between one platform and its outside
//! connections, never the network entities themselves. Entity releases are
//! always deferred onto the [`NodeReleaseQueue`] and executed during the
//! host's authorized mutation window, never synchronously inside a call.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BuildingId, NetworkAccess, NodeId};
use crate::platform_key::PlatformKey;

use super::builder::build_link;
use super::release::NodeReleaseQueue;
use super::types::{ConnectionLink, ConnectionTarget, LinkState};

/// Per-platform registry of outside-connection targets.
///
/// Serialized with the external names used by the persisted configuration
/// element: the packed platform key as `platformLaneId` and the
/// order-preserving target map as `targetOutsideConnectionBuildings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PlatformConfig {
    /// Packed platform/vehicle lane key. `None` for a config that was
    /// persisted before a platform was assigned; such a config never builds
    /// links.
    #[serde(rename = "platformLaneId")]
    pub id: Option<PlatformKey>,

    /// Ordered, key-unique targets. Insertion order is the UI display order.
    #[serde(rename = "targetOutsideConnectionBuildings")]
    pub(crate) targets: Vec<ConnectionTarget>,
}

impl PlatformConfig {
    pub fn new(id: PlatformKey) -> Self {
        Self {
            id: Some(id),
            targets: Vec::new(),
        }
    }

    /// Registered targets in insertion order.
    pub fn targets(&self) -> &[ConnectionTarget] {
        &self.targets
    }

    /// State of one target, if registered.
    pub fn state(&self, outside_connection: BuildingId) -> Option<&LinkState> {
        self.targets
            .iter()
            .find(|t| t.outside_connection == outside_connection)
            .map(|t| &t.state)
    }

    fn target_index(&self, outside_connection: BuildingId) -> Option<usize> {
        self.targets
            .iter()
            .position(|t| t.outside_connection == outside_connection)
    }

    // -------------------------------------------------------------------------
    // Mutation contract
    // -------------------------------------------------------------------------

    /// Register `outside_connection` as a destination and build its link.
    ///
    /// Idempotent: a no-op if the target is already registered. When the
    /// builder cannot attach (wrong building kind, no direction flags, node
    /// allocation failure) the key is not inserted -- a silent no-op,
    /// observable only as an absent row in the UI.
    pub fn add_destination(
        &mut self,
        station: BuildingId,
        outside_connection: BuildingId,
        net: &mut dyn NetworkAccess,
    ) {
        if self.target_index(outside_connection).is_some() {
            return;
        }
        let Some(key) = self.id else {
            return;
        };
        if let Some(link) = build_link(station, key.vehicle_lane(), outside_connection, net) {
            self.targets.push(ConnectionTarget {
                outside_connection,
                state: LinkState::Complete(link),
            });
        }
    }

    /// Unregister a destination and schedule its nodes for release, each
    /// distinct id exactly once. Segments go transitively with their endpoint
    /// nodes. A no-op if the target is not registered.
    pub fn remove_destination(
        &mut self,
        outside_connection: BuildingId,
        releases: &mut NodeReleaseQueue,
    ) {
        let Some(index) = self.target_index(outside_connection) else {
            return;
        };
        let target = self.targets.remove(index);
        let mut nodes = Vec::new();
        if let Some(link) = target.state.link() {
            collect_link_nodes(&mut nodes, link);
        }
        releases.schedule(nodes);
    }

    /// Reconciliation pass, invoked when the owning station's geometry or
    /// state changed and cached node ids may be stale.
    ///
    /// Iterates a snapshot of the current keys, so removal during the pass is
    /// safe. Pending targets are (re)built and stored on success or dropped
    /// on failure; targets still holding a link are stale and are dropped,
    /// their nodes scheduled for release. Never leaves a partial entry.
    pub fn update_station_nodes(
        &mut self,
        station: BuildingId,
        net: &mut dyn NetworkAccess,
        releases: &mut NodeReleaseQueue,
    ) {
        let keys: Vec<BuildingId> = self.targets.iter().map(|t| t.outside_connection).collect();
        for key in keys {
            let Some(index) = self.target_index(key) else {
                continue;
            };
            match self.targets[index].state {
                LinkState::Pending => {
                    let built = match self.id {
                        Some(id) => build_link(station, id.vehicle_lane(), key, &mut *net),
                        None => None,
                    };
                    match built {
                        Some(link) => self.targets[index].state = LinkState::Complete(link),
                        None => {
                            // No longer a valid outside connection for this
                            // station; drop the target.
                            self.targets.remove(index);
                        }
                    }
                }
                LinkState::Complete(link) => {
                    let mut nodes = Vec::new();
                    collect_link_nodes(&mut nodes, &link);
                    self.targets.remove(index);
                    releases.schedule(nodes);
                }
            }
        }
    }

    /// Full teardown: schedule the de-duplicated union of every entry's
    /// non-zero node ids and clear every entry to [`LinkState::Pending`].
    ///
    /// `releases` is `None` once the host runtime has shut down; the call is
    /// then a pure no-op -- host state is never touched after shutdown.
    pub fn release_nodes(&mut self, releases: Option<&mut NodeReleaseQueue>) {
        let Some(releases) = releases else {
            return;
        };
        let mut nodes = Vec::new();
        for target in &self.targets {
            if let Some(link) = target.state.link() {
                collect_link_nodes(&mut nodes, link);
            }
        }
        for target in &mut self.targets {
            target.state = LinkState::Pending;
        }
        releases.schedule(nodes);
    }
}

/// Append a link's non-zero node ids, skipping duplicates already collected.
fn collect_link_nodes(nodes: &mut Vec<NodeId>, link: &ConnectionLink) {
    for node in [link.outside_connection_node, link.station_node] {
        if node != 0 && !nodes.contains(&node) {
            nodes.push(node);
        }
    }
}
