//! Regional platform connections for a city-building simulation.
//!
//! Extends the host game's transit-line manager with links between in-city
//! station platforms and off-map outside-connection buildings (highway, rail,
//! and harbor exits). Each link is realized by two procedural network nodes
//! and up to two directed segments. The nodes, segments, lanes, and buildings
//! themselves are owned by the host's network manager; this crate holds only
//! opaque 16-bit ids and is responsible for requesting release when a link is
//! removed or its platform is torn down.
//!
//! ## Structure
//! - [`network`] -- the port over the host's node/segment/building buffers.
//! - [`platform_key`] -- the packed platform-lane/vehicle-lane identifier.
//! - [`platform_connections`] -- the connection registry, link builder,
//!   deferred release queue, and the systems wiring them into the fixed tick.

use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod network;
pub mod platform_connections;
pub mod platform_key;

#[cfg(test)]
pub mod test_harness;

pub use platform_connections::RegionalPlatformsPlugin;

// ---------------------------------------------------------------------------
// Fixed-tick phases
// ---------------------------------------------------------------------------

/// Ordered phases for this plugin's systems in the `FixedUpdate` schedule.
///
/// Configured as a chain: `Commands` → `Reconcile` → `MutationWindow`.
/// Structural changes to the shared network (node releases) execute only in
/// `MutationWindow`, the single authorized point per tick, so they never
/// interleave with in-progress iteration over the network buffers.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformSet {
    /// Apply destination add/remove/clear requests from the UI collaborator.
    Commands,
    /// Self-healing pass after a station's geometry or state changed.
    Reconcile,
    /// Drain the deferred node-release queue into the host network.
    MutationWindow,
}

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for resources persisted via the host save file's extension map.
///
/// Each implementing resource provides its own serialization, so the host's
/// save system needs no knowledge of individual plugin types -- the plugin
/// registers itself in [`SaveableRegistry`] during `build()`.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique key for this resource in the save file's extension map.
    /// Must be stable across versions.
    const SAVE_KEY: &'static str;

    /// Serialize to bytes. Return `None` to skip saving (e.g. default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    /// Deserialize from bytes, returning the restored resource.
    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Decode bytes via `bitcode::decode`, logging a warning and returning
/// `Default` on failure so a corrupt extension entry never aborts a load.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

/// Type-erased save/load operations for a single registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>,
    pub load_fn: Box<dyn Fn(&mut World, &[u8]) + Send + Sync>,
}

/// Registry of saveable resources, populated during plugin setup. The host's
/// save system iterates it to persist/restore extension map entries.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Register a resource type that implements [`Saveable`]. A duplicate
    /// `SAVE_KEY` is ignored with a warning to avoid clobbering saved data.
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!("SaveableRegistry: duplicate key '{key}' -- ignoring second registration");
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                let value = T::load_from_bytes(bytes);
                world.insert_resource(value);
            }),
        });
    }

    /// Save all registered resources into an extension map.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Load registered resources from an extension map. Resources whose key
    /// is absent keep their current (default) value.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }
}
