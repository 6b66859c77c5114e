//! Lifecycle events delivered by the host.

use spleef_protocol::{DamageSource, PlayerHandle};

/// One lifecycle event for the round.
///
/// The host delivers these strictly one at a time on the simulation
/// thread. Within a tick, damage and death events arrive before `Tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The round is starting; place everyone already connected.
    Open,
    /// A player connected for the first time (or after their session expired).
    PlayerAdd(PlayerHandle),
    /// A player came back after a short disconnect.
    PlayerRejoin(PlayerHandle),
    /// The world clock advanced by one tick.
    Tick,
    PlayerDamage {
        player: PlayerHandle,
        source: DamageSource,
        amount: f32,
    },
    PlayerDeath {
        player: PlayerHandle,
        source: DamageSource,
    },
}

/// Whether the round consumed an event.
///
/// `Handled` tells the host to skip its default behavior: no damage is
/// applied and no death screen or respawn happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    Pass,
}
