//! Station-level registry of platform configs, and the read-only
//! building-lines data source feeding reconciliation.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::{BuildingId, NetworkAccess};
use crate::platform_key::PlatformKey;
use crate::Saveable;

use super::config::PlatformConfig;
use super::release::NodeReleaseQueue;
use super::types::StopPoint;

// =============================================================================
// RegionalPlatforms
// =============================================================================

/// All platform configs of one station building, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct StationPlatforms {
    pub station: BuildingId,
    pub platforms: Vec<PlatformConfig>,
}

/// The source of truth for regional platform connections: per station
/// building, the platform configs keyed by [`PlatformKey`]. Persisted via the
/// extension-map save pattern.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalPlatforms {
    stations: Vec<StationPlatforms>,
}

impl RegionalPlatforms {
    /// Stations with at least one config, in insertion order.
    pub fn stations(&self) -> &[StationPlatforms] {
        &self.stations
    }

    fn station_index(&self, station: BuildingId) -> Option<usize> {
        self.stations.iter().position(|s| s.station == station)
    }

    /// Configs of one station, empty if none.
    pub fn platforms(&self, station: BuildingId) -> &[PlatformConfig] {
        self.station_index(station)
            .map(|i| self.stations[i].platforms.as_slice())
            .unwrap_or(&[])
    }

    /// Look up one platform's config.
    pub fn config(&self, station: BuildingId, key: PlatformKey) -> Option<&PlatformConfig> {
        self.platforms(station)
            .iter()
            .find(|c| c.id == Some(key))
    }

    /// Look up one platform's config for mutation.
    pub fn config_mut(
        &mut self,
        station: BuildingId,
        key: PlatformKey,
    ) -> Option<&mut PlatformConfig> {
        let index = self.station_index(station)?;
        self.stations[index]
            .platforms
            .iter_mut()
            .find(|c| c.id == Some(key))
    }

    /// Get or insert the config for one platform of a station.
    pub fn ensure_config(&mut self, station: BuildingId, key: PlatformKey) -> &mut PlatformConfig {
        let station_index = match self.station_index(station) {
            Some(index) => index,
            None => {
                self.stations.push(StationPlatforms {
                    station,
                    platforms: Vec::new(),
                });
                self.stations.len() - 1
            }
        };
        let entry = &mut self.stations[station_index];
        let platform_index = match entry.platforms.iter().position(|c| c.id == Some(key)) {
            Some(index) => index,
            None => {
                entry.platforms.push(PlatformConfig::new(key));
                entry.platforms.len() - 1
            }
        };
        &mut entry.platforms[platform_index]
    }

    /// Tear down and drop one platform's config. Returns whether it existed.
    pub fn remove_platform(
        &mut self,
        station: BuildingId,
        key: PlatformKey,
        releases: &mut NodeReleaseQueue,
    ) -> bool {
        let Some(station_index) = self.station_index(station) else {
            return false;
        };
        let entry = &mut self.stations[station_index];
        let Some(platform_index) = entry.platforms.iter().position(|c| c.id == Some(key)) else {
            return false;
        };
        let mut config = entry.platforms.remove(platform_index);
        config.release_nodes(Some(releases));
        if entry.platforms.is_empty() {
            self.stations.remove(station_index);
        }
        true
    }

    /// Self-healing pass for one station after its geometry or state changed.
    ///
    /// Configs whose platform key is no longer among the station's stop
    /// points are torn down and dropped. The rest have their stale links
    /// cleared and rebuilt through the normal builder path; targets that can
    /// no longer be built are dropped along the way.
    pub fn reconcile_station(
        &mut self,
        station: BuildingId,
        lines: &BuildingLines,
        net: &mut dyn NetworkAccess,
        releases: &mut NodeReleaseQueue,
    ) {
        let Some(station_index) = self.station_index(station) else {
            return;
        };
        let served: Vec<PlatformKey> = lines
            .stop_points(station)
            .iter()
            .filter_map(|p| p.key())
            .collect();

        let entry = &mut self.stations[station_index];
        entry.platforms.retain_mut(|config| {
            let keep = config.id.is_some_and(|id| served.contains(&id));
            if !keep {
                config.release_nodes(Some(&mut *releases));
            }
            keep
        });
        for config in &mut entry.platforms {
            // Cached node ids are stale once the station changed: clear to
            // pending, then rebuild.
            config.release_nodes(Some(&mut *releases));
            config.update_station_nodes(station, net, releases);
        }
        if entry.platforms.is_empty() {
            self.stations.remove(station_index);
        }
    }

    /// Full teardown of every config, invoked when the owning configuration
    /// is destroyed. With the host already shut down (`None`), a pure no-op.
    pub fn release_all(&mut self, releases: Option<&mut NodeReleaseQueue>) {
        let Some(releases) = releases else {
            return;
        };
        for entry in &mut self.stations {
            for config in &mut entry.platforms {
                config.release_nodes(Some(&mut *releases));
            }
        }
    }
}

#[derive(Encode, Decode, Default)]
struct RegionalPlatformsSave {
    stations: Vec<StationPlatforms>,
}

impl Saveable for RegionalPlatforms {
    const SAVE_KEY: &'static str = "regional_platforms";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if self.stations.is_empty() {
            return None;
        }
        let save = RegionalPlatformsSave {
            stations: self.stations.clone(),
        };
        Some(bitcode::encode(&save))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let save: RegionalPlatformsSave = crate::decode_or_warn(Self::SAVE_KEY, bytes);
        Self {
            stations: save.stations,
        }
    }
}

// =============================================================================
// BuildingLines
// =============================================================================

/// Read-only data source: per building, the ordered stop points its platforms
/// serve. Populated by the host's transit-line bookkeeping; this subsystem
/// only reads it to decide which platform keys a station still has.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingLines {
    lines: Vec<(BuildingId, Vec<StopPoint>)>,
}

impl BuildingLines {
    /// Replace the stop points recorded for a building.
    pub fn set_stop_points(&mut self, building: BuildingId, points: Vec<StopPoint>) {
        match self.lines.iter_mut().find(|(b, _)| *b == building) {
            Some((_, existing)) => *existing = points,
            None => self.lines.push((building, points)),
        }
    }

    /// Stop points of a building, empty if unknown.
    pub fn stop_points(&self, building: BuildingId) -> &[StopPoint] {
        self.lines
            .iter()
            .find(|(b, _)| *b == building)
            .map(|(_, points)| points.as_slice())
            .unwrap_or(&[])
    }
}
