//! Player placement: mode reset plus teleport, by role.

use rand::Rng;
use spleef_protocol::{BlockPos, GameMode, PlayerId};

use crate::{PlayerControl, SpleefMap};

/// Whether a player is competing or watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Participant,
    Spectator,
}

impl Role {
    pub fn game_mode(self) -> GameMode {
        match self {
            Self::Participant => GameMode::Adventure,
            Self::Spectator => GameMode::Spectator,
        }
    }
}

/// Resets players and puts them at the right spawn point for their role.
#[derive(Debug, Clone)]
pub struct SpawnLogic {
    participant_spawns: Vec<BlockPos>,
    spectator_spawn: BlockPos,
}

impl SpawnLogic {
    pub fn new(map: &SpleefMap) -> Self {
        Self {
            participant_spawns: map.participant_spawns.clone(),
            spectator_spawn: map.spectator_spawn,
        }
    }

    /// Clears the player's inventory, effects and health and sets the game
    /// mode for `role`. Always followed by [`spawn_player`](Self::spawn_player).
    pub fn reset_player<C>(&self, ctx: &mut C, player: PlayerId, role: Role)
    where
        C: PlayerControl + ?Sized,
    {
        ctx.reset_player(player, role.game_mode());
    }

    pub fn spawn_player<C>(&self, ctx: &mut C, player: PlayerId, role: Role)
    where
        C: PlayerControl + ?Sized,
    {
        ctx.teleport(player, self.spawn_pos(role));
    }

    /// Reset then spawn, the only supported way to place a player.
    pub fn place<C>(&self, ctx: &mut C, player: PlayerId, role: Role)
    where
        C: PlayerControl + ?Sized,
    {
        self.reset_player(ctx, player, role);
        self.spawn_player(ctx, player, role);
    }

    /// Participants get a random participant spawn; spectators (and
    /// participants on a map without participant spawns) get the
    /// spectator spawn.
    pub fn spawn_pos(&self, role: Role) -> BlockPos {
        match role {
            Role::Participant if !self.participant_spawns.is_empty() => {
                let idx = rand::rng().random_range(0..self.participant_spawns.len());
                self.participant_spawns[idx]
            }
            _ => self.spectator_spawn,
        }
    }
}
