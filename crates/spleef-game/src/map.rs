//! The map geometry a round plays on.

use serde::{Deserialize, Serialize};
use spleef_protocol::{BlockBounds, BlockPos};

/// Geometry supplied by the host once the map is built.
///
/// The round doesn't generate or load maps; it only needs to know where
/// the floor levels are, where players spawn, and where the lava starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpleefMap {
    /// Floor levels in any order. Each one is removed as a single unit.
    pub levels: Vec<BlockBounds>,
    /// Candidate spawn points for participants.
    pub participant_spawns: Vec<BlockPos>,
    pub spectator_spawn: BlockPos,
    /// y of the lava surface when the round opens.
    pub lava_height: i32,
}
