//! # Spleef
//!
//! Host runtime for spleef rounds.
//!
//! The round controller in `spleef-game` is a plain state machine: it
//! reacts to events and talks to the world through traits. This crate is
//! the host around it. Each arena runs as one Tokio task that owns the
//! round, the player registry, the world clock and a world backend you
//! supply, and processes commands and ticks strictly one at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spleef::prelude::*;
//!
//! let (arena, task) = ArenaBuilder::new(config, map)
//!     .participant(PlayerHandle::new(PlayerId(1), "alice"), alice_tx)
//!     .participant(PlayerHandle::new(PlayerId(2), "bob"), bob_tx)
//!     .spawn(my_world)?;
//!
//! arena.damage(PlayerId(2), DamageSource::Lava, 4.0).await?;
//! let outcome = task.await?;
//! ```

mod arena;
mod builder;
mod error;
mod host;

pub use arena::{ArenaHandle, ArenaInfo, PlayerSender, RoundOutcome};
pub use builder::ArenaBuilder;
pub use error::{HostError, SpleefError};
pub use host::ArenaBackend;

/// Installs a `tracing` subscriber that honors `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everything needed to embed a spleef arena.
pub mod prelude {
    pub use crate::{
        ArenaBackend, ArenaBuilder, ArenaHandle, ArenaInfo, HostError, PlayerSender,
        RoundOutcome, SpleefError, init_tracing,
    };
    pub use spleef_game::{
        ArenaWorld, EventResult, GameRules, LavaRiseConfig, PlayerControl, ProjectileConfig,
        RoundPhase, SpleefConfig, SpleefMap, WinResult,
    };
    pub use spleef_protocol::{
        BlockBounds, BlockPos, DamageSource, GameMode, ItemStack, Outbound, PlayerHandle,
        PlayerId, Sound, Text,
    };
    pub use spleef_session::{JoinKind, SessionConfig};
    pub use spleef_tick::{ClockConfig, LagPolicy};
}
