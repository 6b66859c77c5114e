//! Identity and world types shared by the round and its host.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable identifier for a player.
///
/// A newtype over `u64` so it can't be confused with ticks or counts. The
/// same `PlayerId` survives disconnects and rejoins: the host hands the
/// round the same value every time the player comes back.
///
/// `#[serde(transparent)]` serializes `PlayerId(42)` as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A live, connected player as seen by the round.
///
/// Handles are only produced by a host lookup, so holding one means the
/// player was connected at the time of the lookup. They are owned values
/// (not borrows into the host) so the round can keep using the host
/// mutably while it holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHandle {
    /// Stable identity.
    pub id: PlayerId,
    /// Name shown in chat messages.
    pub name: String,
}

impl PlayerHandle {
    /// Creates a handle for a player.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

/// An integer block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// An inclusive axis-aligned box of blocks.
///
/// Floor levels are described as bounds: one level's blocks are every
/// position between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockBounds {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBounds {
    /// Creates bounds from two corners in any order.
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Lowest y covered by these bounds.
    pub fn bottom(&self) -> i32 {
        self.min.y
    }

    /// Returns `true` if `pos` lies inside the bounds.
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }
}

/// How a player interacts with the world.
///
/// Participants play in `Adventure` (they may only break blocks their tool
/// explicitly allows, and cannot place anything). Spectators fly through
/// the map without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Adventure,
    Spectator,
}

/// An enchantment applied to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantment {
    pub id: String,
    pub level: u8,
}

/// An item stack to give to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Namespaced item id, e.g. `minecraft:diamond_shovel`.
    pub item: String,
    pub count: u32,
    pub unbreakable: bool,
    pub enchantments: Vec<Enchantment>,
    /// Blocks this item is allowed to break in adventure mode.
    pub can_destroy: Vec<String>,
}

impl ItemStack {
    /// A plain stack of `count` items with no extra properties.
    pub fn of(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            unbreakable: false,
            enchantments: Vec::new(),
            can_destroy: Vec::new(),
        }
    }

    pub fn unbreakable(mut self) -> Self {
        self.unbreakable = true;
        self
    }

    pub fn enchant(mut self, id: impl Into<String>, level: u8) -> Self {
        self.enchantments.push(Enchantment {
            id: id.into(),
            level,
        });
        self
    }

    pub fn can_destroy(mut self, block: impl Into<String>) -> Self {
        self.can_destroy.push(block.into());
        self
    }
}

/// What hurt a player.
///
/// Only `Lava` matters to the round (it eliminates on contact); the other
/// variants exist so hosts can report damage faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    Lava,
    Fall,
    Fire,
    OutOfWorld,
    Explosion,
    Projectile,
    Player(PlayerId),
    Other(String),
}
