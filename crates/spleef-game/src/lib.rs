//! The active-round controller for spleef.
//!
//! Players stand on a tiered floor and dig it out from under each other;
//! anyone who touches lava or dies is out, and the last one connected wins.
//! This crate is that round, and nothing else: map loading, block physics,
//! chat transport and the tick loop itself belong to the host.
//!
//! # Key types
//!
//! - [`SpleefActive`]: the round state machine (`Running → Closing → Terminated`)
//! - [`GameEvent`]: lifecycle events the host delivers
//! - [`GameContext`]: the collaborator traits the host implements
//! - [`SpleefLevels`]: the floor's droppable layers
//! - [`SpawnLogic`]: resets and teleports players by [`Role`]
//! - [`check_win_result`]: the pure win evaluator
//! - [`SpleefConfig`]: the immutable round settings

mod active;
mod config;
mod context;
mod error;
mod event;
mod lava;
mod levels;
mod map;
mod projectile;
mod rules;
mod spawn;
mod win;

pub use active::{RoundPhase, SpleefActive};
pub use config::{
    LavaRiseConfig, MapConfig, PlayerConfig, ProjectileConfig, SpleefConfig, ToolConfig,
};
pub use context::{ArenaWorld, Broadcast, GameContext, Messenger, PlayerControl, SessionHost};
pub use error::ConfigError;
pub use event::{EventResult, GameEvent};
pub use lava::LavaRise;
pub use levels::SpleefLevels;
pub use map::SpleefMap;
pub use projectile::ProjectileRestock;
pub use rules::GameRules;
pub use spawn::{Role, SpawnLogic};
pub use win::{WinResult, check_win_result};
