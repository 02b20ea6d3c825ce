//! The packed platform identifier.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::network::LaneId;

/// Mask for a 31-bit lane sub-identifier.
const LANE_MASK: u64 = 0x7FFF_FFFF;

/// Composite identifier of a station platform: a 62-bit value packing the
/// platform lane id (high 31 bits) and its parent vehicle lane id (low 31
/// bits). The packed value is the external persisted key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode,
    Decode,
)]
#[serde(transparent)]
pub struct PlatformKey(u64);

impl PlatformKey {
    /// Pack two lane ids into a key. `None` if either id does not fit in 31
    /// bits.
    pub fn pack(platform_lane: LaneId, vehicle_lane: LaneId) -> Option<Self> {
        if u64::from(platform_lane) > LANE_MASK || u64::from(vehicle_lane) > LANE_MASK {
            return None;
        }
        Some(Self((u64::from(platform_lane) << 31) | u64::from(vehicle_lane)))
    }

    /// The platform (boarding) lane id.
    pub fn platform_lane(self) -> LaneId {
        (self.0 >> 31) as LaneId
    }

    /// The vehicle lane id, whose curve carries the attachment point.
    pub fn vehicle_lane(self) -> LaneId {
        (self.0 & LANE_MASK) as LaneId
    }

    /// The packed 62-bit value as persisted.
    pub fn raw(self) -> u64 {
        self.0
    }
}
