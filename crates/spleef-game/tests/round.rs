//! Integration tests for the round controller using a recording context.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use spleef_game::{
    ArenaWorld, EventResult, GameEvent, GameRules, LavaRiseConfig, Messenger, PlayerControl,
    ProjectileConfig, RoundPhase, SessionHost, SpleefActive, SpleefConfig, SpleefLevels,
    SpleefMap, WinResult,
};
use spleef_protocol::{
    BlockBounds, BlockPos, DamageSource, GameMode, ItemStack, PlayerHandle, PlayerId, Sound, Text,
};

// =========================================================================
// Recording context
// =========================================================================

#[derive(Default)]
struct MockContext {
    time: u64,
    closed: Vec<u64>,
    online: BTreeMap<PlayerId, PlayerHandle>,
    chat: Vec<(PlayerId, String)>,
    action_bar: Vec<(u64, PlayerId, String)>,
    sounds: Vec<(PlayerId, Sound)>,
    modes: HashMap<PlayerId, GameMode>,
    teleports: Vec<(PlayerId, BlockPos)>,
    inventories: HashMap<PlayerId, Vec<ItemStack>>,
    removed: Vec<(u64, BlockBounds)>,
    decayed: Vec<(BlockBounds, u32)>,
    lava: Vec<(u64, i32)>,
    time_of_day: Option<i64>,
    rules: Option<GameRules>,
}

impl MockContext {
    fn with_online(ids: &[u64]) -> Self {
        let mut ctx = Self::default();
        for &id in ids {
            ctx.connect(id);
        }
        ctx
    }

    fn connect(&mut self, id: u64) -> PlayerHandle {
        let handle = handle(id);
        self.online.insert(handle.id, handle.clone());
        handle
    }

    fn disconnect(&mut self, id: u64) {
        self.online.remove(&PlayerId(id));
    }

    fn mode(&self, id: u64) -> Option<GameMode> {
        self.modes.get(&PlayerId(id)).copied()
    }

    fn holds(&self, id: u64, item: &str) -> bool {
        self.item_count(PlayerId(id), item) > 0
    }

    fn chat_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.chat.iter().map(|(_, s)| s.as_str()).collect();
        lines.dedup();
        lines
    }

    fn action_bar_times(&self) -> Vec<u64> {
        let mut times: Vec<u64> = self.action_bar.iter().map(|(t, _, _)| *t).collect();
        times.dedup();
        times
    }
}

impl SessionHost for MockContext {
    fn time(&self) -> u64 {
        self.time
    }

    fn close(&mut self) {
        self.closed.push(self.time);
    }

    fn player(&self, id: PlayerId) -> Option<PlayerHandle> {
        self.online.get(&id).cloned()
    }

    fn online_players(&self) -> Vec<PlayerHandle> {
        self.online.values().cloned().collect()
    }
}

impl Messenger for MockContext {
    fn send_message(&mut self, player: PlayerId, text: &Text) {
        self.chat.push((player, text.content.clone()));
    }

    fn send_action_bar(&mut self, player: PlayerId, text: &Text) {
        self.action_bar.push((self.time, player, text.content.clone()));
    }

    fn play_sound(&mut self, player: PlayerId, sound: Sound) {
        self.sounds.push((player, sound));
    }
}

impl PlayerControl for MockContext {
    fn reset_player(&mut self, player: PlayerId, mode: GameMode) {
        self.inventories.remove(&player);
        self.modes.insert(player, mode);
    }

    fn teleport(&mut self, player: PlayerId, pos: BlockPos) {
        self.teleports.push((player, pos));
    }

    fn give_item(&mut self, player: PlayerId, stack: ItemStack) {
        self.inventories.entry(player).or_default().push(stack);
    }

    fn item_count(&self, player: PlayerId, item: &str) -> u32 {
        self.inventories
            .get(&player)
            .map(|stacks| {
                stacks
                    .iter()
                    .filter(|s| s.item == item)
                    .map(|s| s.count)
                    .sum()
            })
            .unwrap_or(0)
    }
}

impl ArenaWorld for MockContext {
    fn remove_blocks(&mut self, bounds: BlockBounds) {
        self.removed.push((self.time, bounds));
    }

    fn decay_blocks(&mut self, bounds: BlockBounds, ticks: u32) {
        self.decayed.push((bounds, ticks));
    }

    fn set_lava_height(&mut self, y: i32) {
        self.lava.push((self.time, y));
    }

    fn set_time_of_day(&mut self, time: i64) {
        self.time_of_day = Some(time);
    }

    fn apply_rules(&mut self, rules: &GameRules) {
        self.rules = Some(*rules);
    }
}

// =========================================================================
// Helpers
// =========================================================================

const SPECTATOR_SPAWN: BlockPos = BlockPos::new(0, 80, 0);

fn handle(id: u64) -> PlayerHandle {
    PlayerHandle::new(PlayerId(id), format!("player{id}"))
}

fn level(y: i32) -> BlockBounds {
    BlockBounds::new(BlockPos::new(-8, y, -8), BlockPos::new(8, y, 8))
}

fn map(level_count: i32) -> SpleefMap {
    SpleefMap {
        // Deliberately out of order; the round drops bottom-up.
        levels: (0..level_count).rev().map(|i| level(10 + i * 10)).collect(),
        participant_spawns: vec![BlockPos::new(2, 61, 2), BlockPos::new(-2, 61, -2)],
        spectator_spawn: SPECTATOR_SPAWN,
        lava_height: 5,
    }
}

fn round(participants: &[u64], config: SpleefConfig) -> SpleefActive {
    SpleefActive::new(
        &map(3),
        Arc::new(config),
        participants.iter().copied().map(PlayerId),
    )
}

/// Ticks once at each world time in `times`.
fn tick_through(round: &mut SpleefActive, ctx: &mut MockContext, times: impl IntoIterator<Item = u64>) {
    for time in times {
        ctx.time = time;
        round.tick(ctx);
    }
}

// =========================================================================
// Open / join / rejoin
// =========================================================================

#[test]
fn test_open_places_connected_participants_only() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());

    round.open(&mut ctx);

    assert_eq!(ctx.mode(1), Some(GameMode::Adventure));
    assert_eq!(ctx.mode(2), Some(GameMode::Adventure));
    assert_eq!(ctx.mode(3), None, "offline participant is not placed");
    assert!(ctx.holds(1, "minecraft:diamond_shovel"));
    assert!(ctx.teleports.iter().all(|(_, pos)| pos.y == 61));
    assert_eq!(round.participants().len(), 3);
}

#[test]
fn test_open_applies_world_settings() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let config = SpleefConfig {
        time_of_day: 18000,
        unstable_tnt: true,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1, 2], config);

    round.open(&mut ctx);

    assert_eq!(ctx.time_of_day, Some(18000));
    let rules = ctx.rules.unwrap();
    assert!(rules.unstable_tnt);
    assert!(!rules.allow_pvp && !rules.fall_damage && !rules.hunger);
    assert!(!rules.allow_crafting && !rules.allow_portals && !rules.block_drops);
    assert!(ctx.lava.is_empty(), "lava untouched without lava_rise");
}

#[test]
fn test_add_non_participant_as_spectator() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    let visitor = ctx.connect(9);
    round.add_player(&mut ctx, &visitor);

    assert_eq!(ctx.mode(9), Some(GameMode::Spectator));
    assert!(!ctx.holds(9, "minecraft:diamond_shovel"));
    assert_eq!(ctx.teleports.last(), Some(&(PlayerId(9), SPECTATOR_SPAWN)));
    assert!(!round.is_participant(PlayerId(9)));
    assert_eq!(round.participants().len(), 2);
}

#[test]
fn test_late_participant_is_placed_on_join() {
    let mut ctx = MockContext::with_online(&[1]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);
    assert_eq!(ctx.mode(2), None);

    let late = ctx.connect(2);
    round.add_player(&mut ctx, &late);

    assert_eq!(ctx.mode(2), Some(GameMode::Adventure));
    assert!(ctx.holds(2, "minecraft:diamond_shovel"));
    assert_eq!(round.participants().len(), 2);
}

#[test]
fn test_participant_back_after_expiry_only_watches() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());
    round.open(&mut ctx);
    assert_eq!(ctx.mode(3), Some(GameMode::Adventure));

    // The host reports a fresh join once the old session has expired.
    ctx.disconnect(3);
    let back = ctx.connect(3);
    round.add_player(&mut ctx, &back);

    assert_eq!(ctx.mode(3), Some(GameMode::Spectator));
    assert!(!ctx.holds(3, "minecraft:diamond_shovel"));
    assert_eq!(ctx.teleports.last(), Some(&(PlayerId(3), SPECTATOR_SPAWN)));
    assert!(round.is_participant(PlayerId(3)));
}

#[test]
fn test_late_participant_is_placed_only_once() {
    let mut ctx = MockContext::with_online(&[1]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    let late = ctx.connect(2);
    round.add_player(&mut ctx, &late);
    assert_eq!(ctx.mode(2), Some(GameMode::Adventure));

    ctx.disconnect(2);
    let again = ctx.connect(2);
    round.add_player(&mut ctx, &again);
    assert_eq!(ctx.mode(2), Some(GameMode::Spectator));
}

#[test]
fn test_rejoin_always_spectates() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());
    round.open(&mut ctx);

    ctx.disconnect(2);
    let back = ctx.connect(2);
    round.rejoin_player(&mut ctx, &back);

    assert_eq!(ctx.mode(2), Some(GameMode::Spectator));
    assert!(!ctx.holds(2, "minecraft:diamond_shovel"));
}

// =========================================================================
// Eliminations
// =========================================================================

#[test]
fn test_lava_damage_eliminates() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());
    round.open(&mut ctx);

    let victim = handle(2);
    let result = round.on_player_damage(&mut ctx, &victim, &DamageSource::Lava, 4.0);

    assert_eq!(result, EventResult::Handled);
    assert!(!round.is_participant(PlayerId(2)));
    assert_eq!(round.participants().len(), 2);
    assert_eq!(ctx.mode(2), Some(GameMode::Spectator));
    assert_eq!(ctx.chat_lines(), vec!["player2 has been eliminated!"]);
    assert_eq!(ctx.chat.len(), 3, "every online player is told");
    assert!(ctx.sounds.iter().all(|(_, s)| *s == Sound::Elimination));
    assert_eq!(ctx.sounds.len(), 3);
}

#[test]
fn test_other_damage_is_absorbed() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    for source in [
        DamageSource::Fall,
        DamageSource::Player(PlayerId(1)),
        DamageSource::Projectile,
        DamageSource::Other("cactus".into()),
    ] {
        let result = round.on_player_damage(&mut ctx, &handle(2), &source, 1.0);
        assert_eq!(result, EventResult::Handled);
    }

    assert!(round.is_participant(PlayerId(2)));
    assert!(ctx.chat.is_empty());
}

#[test]
fn test_death_eliminates() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());
    round.open(&mut ctx);

    let result = round.on_player_death(&mut ctx, &handle(3), &DamageSource::OutOfWorld);

    assert_eq!(result, EventResult::Handled);
    assert!(!round.is_participant(PlayerId(3)));
    assert_eq!(ctx.mode(3), Some(GameMode::Spectator));
}

#[test]
fn test_eliminated_player_never_readded_by_rejoin_or_join() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let mut round = round(&[1, 2, 3], SpleefConfig::default());
    round.open(&mut ctx);

    round.on_player_death(&mut ctx, &handle(2), &DamageSource::Lava);
    ctx.disconnect(2);
    let back = ctx.connect(2);
    round.rejoin_player(&mut ctx, &back);
    round.add_player(&mut ctx, &back);

    assert!(!round.is_participant(PlayerId(2)));
    assert_eq!(round.participants().len(), 2);
    assert_eq!(ctx.mode(2), Some(GameMode::Spectator));
}

#[test]
fn test_spectator_in_lava_is_not_announced() {
    let mut ctx = MockContext::with_online(&[1, 2, 9]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    round.on_player_damage(&mut ctx, &handle(9), &DamageSource::Lava, 2.0);

    assert!(ctx.chat.is_empty());
    assert_eq!(ctx.mode(9), Some(GameMode::Spectator));
    assert_eq!(round.participants().len(), 2);
}

// =========================================================================
// Win evaluation and closing
// =========================================================================

#[test]
fn test_single_participant_round_never_decides() {
    for participants in [&[][..], &[1][..]] {
        let mut ctx = MockContext::with_online(&[1]);
        let mut round = round(participants, SpleefConfig::default());
        assert!(round.ignores_win_state());
        round.open(&mut ctx);

        tick_through(&mut round, &mut ctx, 0..5_000);
        ctx.disconnect(1);
        tick_through(&mut round, &mut ctx, 5_000..5_200);

        assert_eq!(round.phase(), RoundPhase::Running);
        assert!(ctx.closed.is_empty());
        assert!(ctx.chat.is_empty());
    }
}

#[test]
fn test_two_participants_do_not_ignore_win_state() {
    let round = round(&[1, 2], SpleefConfig::default());
    assert!(!round.ignores_win_state());
}

#[test]
fn test_last_connected_participant_wins() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 0..5);
    assert_eq!(round.phase(), RoundPhase::Running);

    ctx.disconnect(2);
    tick_through(&mut round, &mut ctx, [5]);

    assert_eq!(round.phase(), RoundPhase::Closing { close_time: 105 });
    assert_eq!(round.close_time(), Some(105));
    assert_eq!(round.result(), Some(&WinResult::Winner(handle(1))));
    assert_eq!(ctx.chat_lines(), vec!["player1 has won the game!"]);
    assert_eq!(ctx.sounds, vec![(PlayerId(1), Sound::Victory)]);
}

#[test]
fn test_nobody_left_is_win_without_player() {
    let mut ctx = MockContext::with_online(&[1, 2, 7]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    ctx.disconnect(1);
    ctx.disconnect(2);
    tick_through(&mut round, &mut ctx, [40]);

    assert_eq!(round.result(), Some(&WinResult::NoWinner));
    assert_eq!(ctx.chat_lines(), vec!["The game ended, but nobody won!"]);
    // The spectator still hears it.
    assert_eq!(ctx.sounds, vec![(PlayerId(7), Sound::Victory)]);
}

#[test]
fn test_session_closes_exactly_one_hundred_ticks_after_decision() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    ctx.disconnect(2);
    tick_through(&mut round, &mut ctx, [300]);
    assert_eq!(round.close_time(), Some(400));

    tick_through(&mut round, &mut ctx, 301..400);
    assert!(ctx.closed.is_empty(), "must not close early");
    assert_eq!(ctx.chat.len(), 1, "decision is announced once");

    tick_through(&mut round, &mut ctx, [400]);
    assert_eq!(ctx.closed, vec![400]);
    assert_eq!(round.phase(), RoundPhase::Terminated);

    tick_through(&mut round, &mut ctx, 401..500);
    assert_eq!(ctx.closed.len(), 1, "close is called once");
}

#[test]
fn test_closing_round_stops_dropping_levels() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let config = SpleefConfig {
        level_break_interval: 20,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1, 2], config);
    round.open(&mut ctx);

    ctx.disconnect(2);
    tick_through(&mut round, &mut ctx, 0..100);

    // Only the first-tick drop happened before the round was decided.
    assert_eq!(ctx.removed.len(), 1);
}

#[test]
fn test_four_players_three_lava_eliminations() {
    let mut ctx = MockContext::with_online(&[1, 2, 3, 4]);
    let mut round = round(&[1, 2, 3, 4], SpleefConfig::default());
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 0..100);
    round.on_player_damage(&mut ctx, &handle(1), &DamageSource::Lava, 4.0);
    tick_through(&mut round, &mut ctx, 100..250);
    round.on_player_damage(&mut ctx, &handle(2), &DamageSource::Lava, 4.0);
    tick_through(&mut round, &mut ctx, 250..400);
    assert_eq!(round.phase(), RoundPhase::Running);

    // Damage resolves before the tick's win check.
    ctx.time = 400;
    round.on_player_damage(&mut ctx, &handle(3), &DamageSource::Lava, 4.0);
    round.tick(&mut ctx);

    assert_eq!(round.result(), Some(&WinResult::Winner(handle(4))));
    assert_eq!(round.close_time(), Some(500));
    assert_eq!(round.participants().len(), 1);
    assert!(ctx.chat_lines().contains(&"player4 has won the game!"));
}

// =========================================================================
// Level drops and countdown
// =========================================================================

#[test]
fn test_levels_drop_on_first_tick_then_every_interval() {
    let mut ctx = MockContext::with_online(&[1]);
    let config = SpleefConfig {
        level_break_interval: 100,
        ..SpleefConfig::default()
    };
    let mut round = SpleefActive::new(&map(10), Arc::new(config), [PlayerId(1)]);
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 1_000..1_450);

    let times: Vec<u64> = ctx.removed.iter().map(|(t, _)| *t).collect();
    assert_eq!(times, vec![1_000, 1_100, 1_200, 1_300, 1_400]);
    assert_eq!(round.next_level_drop_time(), Some(1_500));
}

#[test]
fn test_huge_intervals_saturate_instead_of_overflowing() {
    let config = SpleefConfig::from_json(
        r#"{
            "level_break_interval": 18446744073709551615,
            "projectile": { "item": "minecraft:snowball", "restock_interval": 18446744073709551615, "maximum": 1 },
            "lava_rise": { "ticks_per_level": 18446744073709551615, "maximum_height": 9 }
        }"#,
    )
    .unwrap();
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], config);
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, [1, 2, u64::MAX - 1]);

    assert_eq!(round.next_level_drop_time(), Some(u64::MAX));
    assert_eq!(ctx.removed.len(), 1, "only the first-tick drop");
    assert_eq!(round.lava_height(), 5);
    assert_eq!(ctx.item_count(PlayerId(1), "minecraft:snowball"), 0);
}

#[test]
fn test_close_time_saturates_near_end_of_time() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);
    ctx.disconnect(2);

    tick_through(&mut round, &mut ctx, [u64::MAX - 10]);

    assert_eq!(round.close_time(), Some(u64::MAX));
}

#[test]
fn test_levels_drop_lowest_first() {
    let mut ctx = MockContext::with_online(&[1]);
    let config = SpleefConfig {
        level_break_interval: 10,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1], config);

    tick_through(&mut round, &mut ctx, 0..25);

    let bottoms: Vec<i32> = ctx.removed.iter().map(|(_, b)| b.bottom()).collect();
    assert_eq!(bottoms, vec![10, 20, 30]);
}

#[test]
fn test_exhausted_floor_is_a_noop() {
    let mut ctx = MockContext::with_online(&[1]);
    let config = SpleefConfig {
        level_break_interval: 5,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1], config);

    tick_through(&mut round, &mut ctx, 0..200);

    assert_eq!(ctx.removed.len(), 3);
    assert_eq!(round.levels().remaining(), 0);
    assert_eq!(round.next_level_drop_time(), Some(200));
}

#[test]
fn test_decay_hands_level_to_world() {
    let mut world = MockContext::default();
    let config = SpleefConfig {
        decay: 40,
        ..SpleefConfig::default()
    };
    let mut levels = SpleefLevels::new(&map(2));

    let dropped = levels.try_drop_level(&mut world, &config);

    assert_eq!(dropped, Some(level(10)));
    assert_eq!(world.decayed, vec![(level(10), 40)]);
    assert!(world.removed.is_empty());
    assert_eq!(levels.next_level(), Some(&level(20)));
    assert_eq!(levels.dropped(), 1);
}

#[test]
fn test_try_drop_level_with_no_levels_returns_none() {
    let mut world = MockContext::default();
    let mut levels = SpleefLevels::new(&map(0));
    assert_eq!(levels.try_drop_level(&mut world, &SpleefConfig::default()), None);
    assert!(world.removed.is_empty());
}

#[test]
fn test_countdown_fires_at_ten_and_final_three_seconds() {
    let mut ctx = MockContext::with_online(&[1]);
    let config = SpleefConfig {
        level_break_interval: 400,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1], config);

    tick_through(&mut round, &mut ctx, 0..=400);

    // Drop at 0, next at 400: 10s, 3s, 2s, 1s before.
    assert_eq!(ctx.action_bar_times(), vec![200, 340, 360, 380]);
    let texts: Vec<&str> = ctx.action_bar.iter().map(|(_, _, s)| s.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Level dropping in 10...",
            "Level dropping in 3...",
            "Level dropping in 2...",
            "Level dropping in 1...",
        ]
    );
}

#[test]
fn test_countdown_reaches_every_online_player() {
    let mut ctx = MockContext::with_online(&[1, 2, 9]);
    let config = SpleefConfig {
        level_break_interval: 60,
        ..SpleefConfig::default()
    };
    let mut round = round(&[1, 2], config);

    tick_through(&mut round, &mut ctx, 0..60);

    // Drop at 0, next at 60. "3s before" lands on the drop tick itself,
    // so only 2s and 1s are shown, to all three online players.
    assert_eq!(ctx.action_bar_times(), vec![20, 40]);
    assert_eq!(ctx.action_bar.len(), 2 * 3);
}

// =========================================================================
// Extensions
// =========================================================================

#[test]
fn test_lava_rises_until_maximum() {
    let mut ctx = MockContext::with_online(&[1]);
    let config = SpleefConfig {
        lava_rise: Some(LavaRiseConfig {
            ticks_per_level: 50,
            maximum_height: 7,
        }),
        ..SpleefConfig::default()
    };
    let mut round = round(&[1], config);
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 0..500);

    assert_eq!(ctx.lava, vec![(0, 5), (50, 6), (100, 7)]);
    assert_eq!(round.lava_height(), 7);
}

#[test]
fn test_projectiles_restock_up_to_maximum() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let config = SpleefConfig {
        projectile: Some(ProjectileConfig {
            item: "minecraft:snowball".into(),
            restock_interval: 20,
            maximum: 2,
        }),
        ..SpleefConfig::default()
    };
    let mut round = round(&[1, 2, 3], config);
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 0..25);
    assert_eq!(ctx.item_count(PlayerId(1), "minecraft:snowball"), 1);

    tick_through(&mut round, &mut ctx, 25..200);
    assert_eq!(ctx.item_count(PlayerId(1), "minecraft:snowball"), 2);
    assert_eq!(ctx.item_count(PlayerId(2), "minecraft:snowball"), 2);
    assert_eq!(ctx.item_count(PlayerId(3), "minecraft:snowball"), 0);
}

#[test]
fn test_projectiles_skip_eliminated_participants() {
    let mut ctx = MockContext::with_online(&[1, 2, 3]);
    let config = SpleefConfig {
        projectile: Some(ProjectileConfig {
            item: "minecraft:snowball".into(),
            restock_interval: 20,
            maximum: 5,
        }),
        ..SpleefConfig::default()
    };
    let mut round = round(&[1, 2, 3], config);
    round.open(&mut ctx);

    tick_through(&mut round, &mut ctx, 0..25);
    assert_eq!(ctx.item_count(PlayerId(2), "minecraft:snowball"), 1);

    let bob = handle(2);
    round.on_player_damage(&mut ctx, &bob, &DamageSource::Lava, 1.0);
    assert_eq!(ctx.item_count(PlayerId(2), "minecraft:snowball"), 0);

    tick_through(&mut round, &mut ctx, 25..85);
    assert_eq!(ctx.item_count(PlayerId(1), "minecraft:snowball"), 4);
    assert_eq!(ctx.item_count(PlayerId(2), "minecraft:snowball"), 0);
}

// =========================================================================
// Event dispatch
// =========================================================================

#[test]
fn test_handle_dispatches_events() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());

    assert_eq!(round.handle(&mut ctx, GameEvent::Open), EventResult::Handled);
    assert_eq!(ctx.mode(1), Some(GameMode::Adventure));

    let visitor = ctx.connect(5);
    round.handle(&mut ctx, GameEvent::PlayerAdd(visitor));
    assert_eq!(ctx.mode(5), Some(GameMode::Spectator));

    let result = round.handle(
        &mut ctx,
        GameEvent::PlayerDamage {
            player: handle(2),
            source: DamageSource::Lava,
            amount: 3.0,
        },
    );
    assert_eq!(result, EventResult::Handled);

    ctx.time = 10;
    round.handle(&mut ctx, GameEvent::Tick);
    assert_eq!(round.result(), Some(&WinResult::Winner(handle(1))));
    assert_eq!(round.close_time(), Some(110));
}

#[test]
fn test_events_after_termination_are_ignored() {
    let mut ctx = MockContext::with_online(&[1, 2]);
    let mut round = round(&[1, 2], SpleefConfig::default());
    round.open(&mut ctx);

    ctx.disconnect(2);
    tick_through(&mut round, &mut ctx, [0, 100]);
    assert_eq!(round.phase(), RoundPhase::Terminated);

    let chat_before = ctx.chat.len();
    round.on_player_death(&mut ctx, &handle(1), &DamageSource::Lava);
    let late = ctx.connect(8);
    round.add_player(&mut ctx, &late);

    assert_eq!(ctx.chat.len(), chat_before);
    assert_eq!(ctx.mode(8), None);
    assert!(round.is_participant(PlayerId(1)));
}
