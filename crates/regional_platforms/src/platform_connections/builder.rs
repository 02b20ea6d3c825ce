//! Connection builder: synthesizes the nodes and segments tying a station
//! platform to an outside-connection building.

use crate::network::{BuildingId, BuildingKind, LaneId, NetworkAccess, NodeId};

use super::types::ConnectionLink;

/// Parametric position of the platform attachment point along the vehicle
/// lane's curve.
const PLATFORM_ATTACHMENT_T: f32 = 0.5;

/// Build the physical link between a station platform and an outside
/// connection.
///
/// Preconditions are checked here, not by the caller: the station building
/// must be a transport station and the outside connection must carry at least
/// one direction flag, otherwise `None` is returned with nothing allocated.
///
/// Allocates one node at the platform's lane midpoint and one at the outside
/// connection's stop position, then one directed segment per direction flag.
/// Segment failures are tolerated (the id stays zero); node failures are
/// compensated -- whichever node was allocated is released and `None` is
/// returned. A partial link is never returned.
pub fn build_link(
    station: BuildingId,
    vehicle_lane: LaneId,
    outside_connection: BuildingId,
    net: &mut dyn NetworkAccess,
) -> Option<ConnectionLink> {
    if net.building_kind(station) != BuildingKind::TransportStation {
        return None;
    }
    let connection_flags = net.building_flags(outside_connection);
    if !connection_flags.has_direction() {
        return None;
    }

    let station_active = net.building_flags(station).active;
    let mut link = ConnectionLink::default();

    let platform_position = net.lane_position(vehicle_lane, PLATFORM_ATTACHMENT_T);
    link.station_node = allocate_attached_node(net, station, station_active, platform_position);

    let stop_position =
        net.stop_position(outside_connection, connection_flags.stop_direction());
    link.outside_connection_node =
        allocate_attached_node(net, station, station_active, stop_position);

    if link.station_node == 0 || link.outside_connection_node == 0 {
        // Compensate: never leave an orphaned node behind. Zero ids are a
        // safe no-op for the host.
        net.release_node(link.station_node);
        net.release_node(link.outside_connection_node);
        return None;
    }

    // Both flags are independent bits; both may fire, checked incoming first.
    if connection_flags.incoming {
        if let Some(segment) = net.allocate_segment(link.outside_connection_node, link.station_node)
        {
            net.set_segment_untouchable(segment);
            net.update_segment(segment);
            link.segment_to_station = segment;
        }
    }
    if connection_flags.outgoing {
        if let Some(segment) = net.allocate_segment(link.station_node, link.outside_connection_node)
        {
            net.set_segment_untouchable(segment);
            net.update_segment(segment);
            link.segment_to_outside_connection = segment;
        }
    }

    Some(link)
}

/// Allocate a connection node via the station's behavior descriptor, mark it
/// disabled when the station is inactive, splice it into the station
/// building's attached-node list, and refresh it. Zero on failure.
fn allocate_attached_node(
    net: &mut dyn NetworkAccess,
    station: BuildingId,
    station_active: bool,
    position: bevy::math::Vec3,
) -> NodeId {
    let Some(node) = net.allocate_node(station, position) else {
        return 0;
    };
    if !station_active {
        net.set_node_disabled(node);
    }
    net.attach_building_node(station, node);
    net.update_node(node);
    node
}
