//! Systems driving the registry from events.

use bevy::prelude::*;

use crate::network::{BuildingId, NetworkAccess};
use crate::platform_key::PlatformKey;

use super::registry::{BuildingLines, RegionalPlatforms};
use super::release::NodeReleaseQueue;

// =============================================================================
// Events
// =============================================================================

/// A write request from the UI collaborator. The UI reads registry state for
/// display only; every mutation goes through these.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCommand {
    /// Link a platform of `station` to an outside-connection building.
    AddDestination {
        station: BuildingId,
        platform: PlatformKey,
        outside_connection: BuildingId,
    },
    /// Unlink a destination and release its nodes.
    RemoveDestination {
        station: BuildingId,
        platform: PlatformKey,
        outside_connection: BuildingId,
    },
    /// Drop every destination configured for one platform.
    ClearPlatform {
        station: BuildingId,
        platform: PlatformKey,
    },
}

/// A station's geometry or state changed (moved, relocated, lanes rebuilt);
/// its cached connection nodes are stale.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationChanged {
    pub station: BuildingId,
}

// =============================================================================
// Systems
// =============================================================================

/// Apply queued UI commands to the registry, in arrival order.
pub fn apply_platform_commands<N: NetworkAccess + Resource>(
    mut commands: EventReader<PlatformCommand>,
    mut platforms: ResMut<RegionalPlatforms>,
    mut net: ResMut<N>,
    mut releases: ResMut<NodeReleaseQueue>,
) {
    for command in commands.read() {
        match *command {
            PlatformCommand::AddDestination {
                station,
                platform,
                outside_connection,
            } => {
                platforms.ensure_config(station, platform).add_destination(
                    station,
                    outside_connection,
                    &mut *net,
                );
            }
            PlatformCommand::RemoveDestination {
                station,
                platform,
                outside_connection,
            } => {
                if let Some(config) = platforms.config_mut(station, platform) {
                    config.remove_destination(outside_connection, &mut releases);
                }
            }
            PlatformCommand::ClearPlatform { station, platform } => {
                platforms.remove_platform(station, platform, &mut releases);
            }
        }
    }
}

/// React to station changes with the self-healing reconciliation pass.
pub fn reconcile_station_platforms<N: NetworkAccess + Resource>(
    mut changes: EventReader<StationChanged>,
    lines: Res<BuildingLines>,
    mut platforms: ResMut<RegionalPlatforms>,
    mut net: ResMut<N>,
    mut releases: ResMut<NodeReleaseQueue>,
) {
    for change in changes.read() {
        platforms.reconcile_station(change.station, &lines, &mut *net, &mut releases);
    }
}
