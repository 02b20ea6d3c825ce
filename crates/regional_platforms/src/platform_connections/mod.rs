//! Regional platform connections: the registry tying station platforms to
//! outside-connection buildings, the builder that synthesizes the links, and
//! the deferred release machinery.
//!
//! ## Data model
//! - [`PlatformConfig`]: per-platform, ordered registry of outside-connection
//!   targets, each [`LinkState::Pending`] or [`LinkState::Complete`].
//! - [`ConnectionLink`]: the two nodes and up to two directed segments
//!   realizing a link, referenced by zero-sentinel ids.
//! - [`RegionalPlatforms`]: the station-level resource holding all configs,
//!   persisted through the extension-map save pattern.
//!
//! ## Control flow
//! External callers add/remove destinations or signal a station change; link
//! construction happens inline through [`build_link`], while every entity
//! release is deferred onto the [`NodeReleaseQueue`] and drained during the
//! authorized mutation window at the end of the fixed tick.

pub mod builder;
pub mod config;
pub mod registry;
pub mod release;
pub mod systems;
pub mod types;


pub use builder::build_link;
pub use config::PlatformConfig;
pub use registry::{BuildingLines, RegionalPlatforms, StationPlatforms};
pub use release::{flush_node_releases, NodeReleaseQueue};
pub use systems::{PlatformCommand, StationChanged};
pub use types::{ConnectionLink, ConnectionTarget, LinkState, StopPoint};

use bevy::prelude::*;
use std::marker::PhantomData;

use crate::network::NetworkAccess;
use crate::PlatformSet;

// =============================================================================
// Plugin
// =============================================================================

/// Plugin wiring the registry into the host's fixed tick.
///
/// Generic over the host's network resource `N`, which the host must insert
/// before the first tick; the same systems then run against the live network
/// in game and an in-memory one in tests.
pub struct RegionalPlatformsPlugin<N>(PhantomData<N>);

impl<N> Default for RegionalPlatformsPlugin<N> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<N: NetworkAccess + Resource> Plugin for RegionalPlatformsPlugin<N> {
    fn build(&self, app: &mut App) {
        app.init_resource::<RegionalPlatforms>()
            .init_resource::<BuildingLines>()
            .init_resource::<NodeReleaseQueue>()
            .add_event::<PlatformCommand>()
            .add_event::<StationChanged>()
            .configure_sets(
                FixedUpdate,
                (
                    PlatformSet::Commands,
                    PlatformSet::Reconcile,
                    PlatformSet::MutationWindow,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::apply_platform_commands::<N>.in_set(PlatformSet::Commands),
                    systems::reconcile_station_platforms::<N>.in_set(PlatformSet::Reconcile),
                    flush_node_releases::<N>.in_set(PlatformSet::MutationWindow),
                ),
            );

        // Register for save/load.
        app.init_resource::<crate::SaveableRegistry>();
        app.world_mut()
            .resource_mut::<crate::SaveableRegistry>()
            .register::<RegionalPlatforms>();
    }
}
