//! `ArenaBuilder`: configures and starts one spleef arena.

use std::collections::HashMap;
use std::sync::Arc;

use spleef_game::{SpleefActive, SpleefConfig, SpleefMap};
use spleef_protocol::{PlayerHandle, PlayerId};
use spleef_session::{PlayerRegistry, SessionConfig};
use spleef_tick::{ClockConfig, WorldClock};
use tokio::task::JoinHandle;

use crate::arena::{self, ArenaHandle, PlayerSender, RoundOutcome};
use crate::{ArenaBackend, HostError, SpleefError};

/// Default capacity of the arena's command channel.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Builder for an arena running one round.
///
/// The participant list is formed here, before the round starts, and is
/// fixed from then on. Participants are registered as connected at the
/// start time so the round can place them when it opens.
///
/// # Example
///
/// ```rust,ignore
/// use spleef::prelude::*;
///
/// let (arena, task) = ArenaBuilder::new(config, map)
///     .clock_config(ClockConfig::with_rate(20))
///     .participant(alice, alice_tx)
///     .participant(bob, bob_tx)
///     .spawn(world)?;
/// ```
pub struct ArenaBuilder {
    config: SpleefConfig,
    map: SpleefMap,
    clock_config: ClockConfig,
    session_config: SessionConfig,
    start_time: u64,
    channel_size: usize,
    participants: Vec<(PlayerHandle, PlayerSender)>,
}

impl ArenaBuilder {
    pub fn new(config: SpleefConfig, map: SpleefMap) -> Self {
        Self {
            config,
            map,
            clock_config: ClockConfig::default(),
            session_config: SessionConfig::default(),
            start_time: 0,
            channel_size: DEFAULT_CHANNEL_SIZE,
            participants: Vec::new(),
        }
    }

    /// Sets the world clock's rate and lag policy.
    pub fn clock_config(mut self, config: ClockConfig) -> Self {
        self.clock_config = config;
        self
    }

    /// Sets the reconnect grace period.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// World time at open. The first tick runs at `start_time + 1`.
    pub fn start_time(mut self, time: u64) -> Self {
        self.start_time = time;
        self
    }

    /// Adds a participant with the channel their messages go to.
    pub fn participant(mut self, player: PlayerHandle, sender: PlayerSender) -> Self {
        self.participants.push((player, sender));
        self
    }

    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }

    /// Validates the setup and spawns the arena task on the current Tokio
    /// runtime.
    ///
    /// # Errors
    /// - [`SpleefError::Config`] if the config is invalid.
    /// - [`HostError::ParticipantCount`] if the participant count is
    ///   outside `players.min..=players.max`.
    /// - [`SpleefError::Session`] if a participant is listed twice.
    pub fn spawn<W: ArenaBackend>(
        self,
        world: W,
    ) -> Result<(ArenaHandle, JoinHandle<RoundOutcome>), SpleefError> {
        self.config.validate()?;

        let count = self.participants.len();
        let bounds = self.config.players;
        if !(bounds.min..=bounds.max).contains(&count) {
            return Err(HostError::ParticipantCount {
                count,
                min: bounds.min,
                max: bounds.max,
            }
            .into());
        }

        let mut registry = PlayerRegistry::new(self.session_config);
        let mut senders: HashMap<PlayerId, PlayerSender> = HashMap::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for (player, sender) in self.participants {
            let id = player.id;
            registry.connect(player, self.start_time)?;
            senders.insert(id, sender);
            ids.push(id);
        }

        let round = SpleefActive::new(&self.map, Arc::new(self.config), ids);
        let clock = WorldClock::new(self.clock_config, self.start_time);

        tracing::info!(
            participants = count,
            start_time = self.start_time,
            rate_hz = clock.rate_hz(),
            "spawning arena"
        );

        Ok(arena::spawn_arena(
            round,
            registry,
            senders,
            world,
            clock,
            self.channel_size,
        ))
    }
}
