//! Round configuration.
//!
//! A [`SpleefConfig`] is built once before the round starts and never
//! changes afterwards. The host keeps it behind an `Arc` and every
//! component reads it through a shared reference.

use serde::{Deserialize, Serialize};
use spleef_protocol::ItemStack;
use spleef_tick::seconds;

use crate::ConfigError;

// ---------------------------------------------------------------------------
// SpleefConfig
// ---------------------------------------------------------------------------

/// Tunable parameters for one round.
///
/// Every field has a default, so `{}` is a valid config:
///
/// ```
/// use spleef_game::SpleefConfig;
///
/// let config = SpleefConfig::from_json("{}").unwrap();
/// assert_eq!(config.level_break_interval, 1200);
/// assert_eq!(config.tool.item, "minecraft:diamond_shovel");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpleefConfig {
    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub players: PlayerConfig,

    /// The digging tool every participant receives.
    #[serde(default)]
    pub tool: ToolConfig,

    /// Periodic projectile handout. Absent means no projectiles.
    #[serde(default)]
    pub projectile: Option<ProjectileConfig>,

    /// Rising lava. Absent means the lava stays where the map put it.
    #[serde(default)]
    pub lava_rise: Option<LavaRiseConfig>,

    /// Ticks between level drops.
    #[serde(default = "default_level_break_interval")]
    pub level_break_interval: u64,

    /// Ticks a dropped level takes to decay. Negative removes it at once.
    #[serde(default = "default_decay")]
    pub decay: i32,

    /// World time of day set when the round opens.
    #[serde(default = "default_time_of_day")]
    pub time_of_day: i64,

    /// Whether TNT primes itself when a player touches it.
    #[serde(default)]
    pub unstable_tnt: bool,
}

fn default_level_break_interval() -> u64 {
    seconds(60)
}

fn default_decay() -> i32 {
    -1
}

fn default_time_of_day() -> i64 {
    6000
}

impl Default for SpleefConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            players: PlayerConfig::default(),
            tool: ToolConfig::default(),
            projectile: None,
            lava_rise: None,
            level_break_interval: default_level_break_interval(),
            decay: default_decay(),
            time_of_day: default_time_of_day(),
            unstable_tnt: false,
        }
    }
}

impl SpleefConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the round relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let PlayerConfig { min, max } = self.players;
        if min == 0 || min > max {
            return Err(ConfigError::InvalidPlayers { min, max });
        }
        if self.level_break_interval == 0 {
            return Err(ConfigError::ZeroInterval("level_break_interval"));
        }
        if let Some(projectile) = &self.projectile {
            if projectile.restock_interval == 0 {
                return Err(ConfigError::ZeroInterval("projectile.restock_interval"));
            }
            if projectile.maximum == 0 {
                return Err(ConfigError::ZeroProjectileMaximum);
            }
        }
        if let Some(lava_rise) = &self.lava_rise {
            if lava_rise.ticks_per_level == 0 {
                return Err(ConfigError::ZeroInterval("lava_rise.ticks_per_level"));
            }
        }
        Ok(())
    }

    /// Ticks a dropped level should decay over, or `None` for instant removal.
    pub fn decay_ticks(&self) -> Option<u32> {
        u32::try_from(self.decay).ok()
    }

    /// The participant tool: unbreakable, Efficiency-enchanted, and only
    /// able to break the floor block.
    pub fn tool_stack(&self) -> ItemStack {
        ItemStack::of(self.tool.item.clone(), 1)
            .unbreakable()
            .enchant("minecraft:efficiency", self.tool.efficiency)
            .can_destroy(self.map.floor.clone())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// The parts of the map config the round reads. Geometry comes from the
/// host's [`SpleefMap`](crate::SpleefMap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Block the floor is made of; the only block the tool may break.
    #[serde(default = "default_floor")]
    pub floor: String,
}

fn default_floor() -> String {
    "minecraft:snow_block".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            floor: default_floor(),
        }
    }
}

/// Player-count bounds for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub min: usize,
    pub max: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { min: 1, max: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_tool_item")]
    pub item: String,
    #[serde(default = "default_efficiency")]
    pub efficiency: u8,
}

fn default_tool_item() -> String {
    "minecraft:diamond_shovel".to_string()
}

fn default_efficiency() -> u8 {
    2
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            item: default_tool_item(),
            efficiency: default_efficiency(),
        }
    }
}

/// Projectiles handed to participants over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Item id, e.g. `minecraft:snowball`.
    pub item: String,
    /// Ticks between handouts.
    pub restock_interval: u64,
    /// A participant holding this many gets nothing more.
    pub maximum: u32,
}

/// Lava that climbs toward the floor over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LavaRiseConfig {
    /// Ticks between one-block rises.
    pub ticks_per_level: u64,
    /// The lava never goes above this y.
    pub maximum_height: i32,
}
