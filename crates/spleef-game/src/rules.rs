//! World rules applied for the lifetime of a round.

use serde::{Deserialize, Serialize};

/// Which default world behaviors stay enabled during a round.
///
/// Spleef turns nearly everything off: the only way out is lava or
/// death, and nobody should be dropping blocks or crafting tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub allow_crafting: bool,
    pub allow_portals: bool,
    pub allow_pvp: bool,
    pub block_drops: bool,
    pub fall_damage: bool,
    pub hunger: bool,
    pub unstable_tnt: bool,
}

impl GameRules {
    /// The spleef rule set.
    pub fn spleef(unstable_tnt: bool) -> Self {
        Self {
            allow_crafting: false,
            allow_portals: false,
            allow_pvp: false,
            block_drops: false,
            fall_damage: false,
            hunger: false,
            unstable_tnt,
        }
    }
}
