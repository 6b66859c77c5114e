//! The host side of the round's collaborator traits.
//!
//! [`HostState`] is what the round sees as its [`GameContext`]: the world
//! clock, the player registry and the outbound channels live here, and
//! block and player-entity work is forwarded to the embedder's backend.
//!
//! [`GameContext`]: spleef_game::GameContext

use std::collections::HashMap;

use spleef_game::{ArenaWorld, GameRules, Messenger, PlayerControl, SessionHost};
use spleef_protocol::{
    BlockBounds, BlockPos, GameMode, ItemStack, Outbound, PlayerHandle, PlayerId, Sound, Text,
};
use spleef_session::PlayerRegistry;

use crate::PlayerSender;

/// The world engine an arena runs against.
///
/// You implement [`PlayerControl`] and [`ArenaWorld`] for your world; the
/// arena handles sessions, messaging and time itself.
pub trait ArenaBackend: PlayerControl + ArenaWorld + Send + 'static {}

impl<T> ArenaBackend for T where T: PlayerControl + ArenaWorld + Send + 'static {}

/// Everything the arena task owns besides the round itself.
pub(crate) struct HostState<W: ArenaBackend> {
    pub(crate) time: u64,
    pub(crate) closed: bool,
    pub(crate) registry: PlayerRegistry,
    /// Per-player outbound channels, connected players only.
    pub(crate) senders: HashMap<PlayerId, PlayerSender>,
    pub(crate) world: W,
}

impl<W: ArenaBackend> HostState<W> {
    /// Sends to one player. Silently drops if they have no channel or the
    /// receiver is gone.
    fn send_to(&self, player: PlayerId, msg: Outbound) {
        if let Some(sender) = self.senders.get(&player) {
            let _ = sender.send(msg);
        }
    }
}

impl<W: ArenaBackend> SessionHost for HostState<W> {
    fn time(&self) -> u64 {
        self.time
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::info!(time = self.time, "session closed");
        }
    }

    fn player(&self, id: PlayerId) -> Option<PlayerHandle> {
        self.registry.connected(id).cloned()
    }

    fn online_players(&self) -> Vec<PlayerHandle> {
        self.registry.connected_players().cloned().collect()
    }
}

impl<W: ArenaBackend> Messenger for HostState<W> {
    fn send_message(&mut self, player: PlayerId, text: &Text) {
        self.send_to(player, Outbound::Chat(text.clone()));
    }

    fn send_action_bar(&mut self, player: PlayerId, text: &Text) {
        self.send_to(player, Outbound::ActionBar(text.clone()));
    }

    fn play_sound(&mut self, player: PlayerId, sound: Sound) {
        self.send_to(player, Outbound::Sound(sound));
    }
}

impl<W: ArenaBackend> PlayerControl for HostState<W> {
    fn reset_player(&mut self, player: PlayerId, mode: GameMode) {
        self.world.reset_player(player, mode);
    }

    fn teleport(&mut self, player: PlayerId, pos: BlockPos) {
        self.world.teleport(player, pos);
    }

    fn give_item(&mut self, player: PlayerId, stack: ItemStack) {
        self.world.give_item(player, stack);
    }

    fn item_count(&self, player: PlayerId, item: &str) -> u32 {
        self.world.item_count(player, item)
    }
}

impl<W: ArenaBackend> ArenaWorld for HostState<W> {
    fn remove_blocks(&mut self, bounds: BlockBounds) {
        self.world.remove_blocks(bounds);
    }

    fn decay_blocks(&mut self, bounds: BlockBounds, ticks: u32) {
        self.world.decay_blocks(bounds, ticks);
    }

    fn set_lava_height(&mut self, y: i32) {
        self.world.set_lava_height(y);
    }

    fn set_time_of_day(&mut self, time: i64) {
        self.world.set_time_of_day(time);
    }

    fn apply_rules(&mut self, rules: &GameRules) {
        self.world.apply_rules(rules);
    }
}
