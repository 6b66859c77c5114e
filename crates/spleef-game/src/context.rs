//! The collaborator traits a host implements to run a round.
//!
//! The round never owns the world, the connections or the chat pipe. It
//! reaches them through these traits, passed in by exclusive reference on
//! every event. Hosts usually implement all four on one context struct;
//! [`GameContext`] is the bundle the round asks for.

use spleef_protocol::{
    BlockBounds, BlockPos, GameMode, ItemStack, PlayerHandle, PlayerId, Sound, Text,
};

use crate::GameRules;

/// The game session the round runs inside.
pub trait SessionHost {
    /// Current world time in ticks. Monotonically increasing.
    fn time(&self) -> u64;

    /// Ends the session. Called once, when the closing countdown runs out.
    fn close(&mut self);

    /// Looks up a connected player. `None` is a normal answer: the player
    /// may be offline, and callers just skip them.
    fn player(&self, id: PlayerId) -> Option<PlayerHandle>;

    /// Everyone connected right now, participants and spectators alike.
    fn online_players(&self) -> Vec<PlayerHandle>;
}

/// Delivery of chat, action-bar text and sounds to one player.
pub trait Messenger {
    fn send_message(&mut self, player: PlayerId, text: &Text);
    fn send_action_bar(&mut self, player: PlayerId, text: &Text);
    fn play_sound(&mut self, player: PlayerId, sound: Sound);
}

/// Direct manipulation of a player entity.
pub trait PlayerControl {
    /// Clears inventory, effects and health, then sets the game mode.
    fn reset_player(&mut self, player: PlayerId, mode: GameMode);
    fn teleport(&mut self, player: PlayerId, pos: BlockPos);
    fn give_item(&mut self, player: PlayerId, stack: ItemStack);
    /// How many of `item` the player is carrying.
    fn item_count(&self, player: PlayerId, item: &str) -> u32;
}

/// The block world around the floor.
pub trait ArenaWorld {
    /// Removes every floor block inside `bounds` at once.
    fn remove_blocks(&mut self, bounds: BlockBounds);
    /// Starts the floor blocks inside `bounds` decaying over `ticks` ticks.
    fn decay_blocks(&mut self, bounds: BlockBounds, ticks: u32);
    fn set_lava_height(&mut self, y: i32);
    fn set_time_of_day(&mut self, time: i64);
    fn apply_rules(&mut self, rules: &GameRules);
}

/// Everything the round needs from its host.
pub trait GameContext: SessionHost + Messenger + PlayerControl + ArenaWorld {}

impl<T> GameContext for T where T: SessionHost + Messenger + PlayerControl + ArenaWorld + ?Sized {}

/// Sends to every connected player.
pub trait Broadcast: SessionHost + Messenger {
    fn broadcast_message(&mut self, text: &Text) {
        for player in self.online_players() {
            self.send_message(player.id, text);
        }
    }

    fn broadcast_action_bar(&mut self, text: &Text) {
        for player in self.online_players() {
            self.send_action_bar(player.id, text);
        }
    }

    fn broadcast_sound(&mut self, sound: Sound) {
        for player in self.online_players() {
            self.play_sound(player.id, sound);
        }
    }
}

impl<T> Broadcast for T where T: SessionHost + Messenger + ?Sized {}
