//! The active-round state machine.
//!
//! One [`SpleefActive`] exists per round. It owns the participant set and
//! every round timer; the host owns everything else and is passed in as a
//! [`GameContext`] on each call. Calls are strictly serialized, so there is
//! no locking anywhere in here.

use std::collections::HashSet;
use std::sync::Arc;

use spleef_protocol::{DamageSource, Formatting, PlayerHandle, PlayerId, Sound, Text};
use spleef_tick::{TICKS_PER_SECOND, seconds};

use crate::{
    Broadcast, EventResult, GameContext, GameEvent, GameRules, LavaRise, ProjectileRestock,
    Role, SpawnLogic, SpleefConfig, SpleefLevels, SpleefMap, WinResult, check_win_result,
};

/// Seconds-before-drop at which the countdown is shown.
const COUNTDOWN_SECONDS: [u64; 4] = [10, 3, 2, 1];

/// Ticks between the decision and the session closing.
const CLOSE_DELAY: u64 = seconds(5);

// ---------------------------------------------------------------------------
// RoundPhase
// ---------------------------------------------------------------------------

/// Where the round is in its lifecycle.
///
/// ```text
/// Running → Closing { close_time } → Terminated
/// ```
///
/// There are no backward transitions. `close_time` is fixed when the
/// round enters `Closing` and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Levels drop on schedule and the win check runs every tick.
    Running,
    /// The round is decided; the session closes at `close_time`.
    Closing { close_time: u64 },
    /// The session has been closed. Further events are ignored.
    Terminated,
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Closing { close_time } => write!(f, "Closing(until {close_time})"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpleefActive
// ---------------------------------------------------------------------------

/// A running spleef round.
pub struct SpleefActive {
    config: Arc<SpleefConfig>,
    rules: GameRules,
    participants: HashSet<PlayerId>,
    /// Participants who have been given their place. Nobody gets it twice.
    placed: HashSet<PlayerId>,
    spawn_logic: SpawnLogic,
    levels: SpleefLevels,
    next_level_drop_time: Option<u64>,
    /// Fixed at creation: true when the round started with ≤ 1 participant.
    ignore_win_state: bool,
    phase: RoundPhase,
    result: Option<WinResult>,
    lava_height: i32,
    lava_rise: Option<LavaRise>,
    projectiles: Option<ProjectileRestock>,
}

impl SpleefActive {
    /// Builds a round for a pre-formed set of participants.
    pub fn new(
        map: &SpleefMap,
        config: Arc<SpleefConfig>,
        participants: impl IntoIterator<Item = PlayerId>,
    ) -> Self {
        let participants: HashSet<PlayerId> = participants.into_iter().collect();
        let ignore_win_state = participants.len() <= 1;

        Self {
            rules: GameRules::spleef(config.unstable_tnt),
            spawn_logic: SpawnLogic::new(map),
            levels: SpleefLevels::new(map),
            lava_height: map.lava_height,
            lava_rise: config
                .lava_rise
                .map(|rise| LavaRise::new(rise, map.lava_height)),
            projectiles: config.projectile.clone().map(ProjectileRestock::new),
            participants,
            placed: HashSet::new(),
            next_level_drop_time: None,
            ignore_win_state,
            phase: RoundPhase::Running,
            result: None,
            config,
        }
    }

    /// Dispatches one event to its handler.
    pub fn handle<C>(&mut self, ctx: &mut C, event: GameEvent) -> EventResult
    where
        C: GameContext + ?Sized,
    {
        match event {
            GameEvent::Open => {
                self.open(ctx);
                EventResult::Handled
            }
            GameEvent::PlayerAdd(player) => {
                self.add_player(ctx, &player);
                EventResult::Handled
            }
            GameEvent::PlayerRejoin(player) => {
                self.rejoin_player(ctx, &player);
                EventResult::Handled
            }
            GameEvent::Tick => {
                self.tick(ctx);
                EventResult::Handled
            }
            GameEvent::PlayerDamage {
                player,
                source,
                amount,
            } => self.on_player_damage(ctx, &player, &source, amount),
            GameEvent::PlayerDeath { player, source } => {
                self.on_player_death(ctx, &player, &source)
            }
        }
    }

    /// Sets up the world and places every participant already connected.
    /// Participants who aren't connected yet are placed when they join.
    pub fn open<C>(&mut self, ctx: &mut C)
    where
        C: GameContext + ?Sized,
    {
        ctx.apply_rules(&self.rules);
        ctx.set_time_of_day(self.config.time_of_day);
        if self.lava_rise.is_some() {
            ctx.set_lava_height(self.lava_height);
        }

        let online: Vec<PlayerId> = self
            .participants
            .iter()
            .copied()
            .filter(|&id| ctx.player(id).is_some())
            .collect();
        for &id in &online {
            self.spawn_participant(ctx, id);
        }

        tracing::info!(
            participants = self.participants.len(),
            placed = online.len(),
            ignore_win_state = self.ignore_win_state,
            "round opened"
        );
    }

    /// Places a newly connected player. A participant who wasn't online at
    /// open gets their place now; everyone else watches, including a
    /// participant whose earlier session expired. Participant membership
    /// is never changed here.
    pub fn add_player<C>(&mut self, ctx: &mut C, player: &PlayerHandle)
    where
        C: GameContext + ?Sized,
    {
        if self.phase == RoundPhase::Terminated {
            return;
        }
        if self.participants.contains(&player.id) && !self.placed.contains(&player.id) {
            self.spawn_participant(ctx, player.id);
        } else {
            self.spawn_spectator(ctx, player.id);
        }
    }

    /// A player coming back after a disconnect always watches, whatever
    /// they were before.
    pub fn rejoin_player<C>(&mut self, ctx: &mut C, player: &PlayerHandle)
    where
        C: GameContext + ?Sized,
    {
        if self.phase == RoundPhase::Terminated {
            return;
        }
        self.spawn_spectator(ctx, player.id);
    }

    /// Advances the round by one world tick.
    pub fn tick<C>(&mut self, ctx: &mut C)
    where
        C: GameContext + ?Sized,
    {
        let time = ctx.time();

        match self.phase {
            RoundPhase::Terminated => return,
            RoundPhase::Closing { close_time } => {
                if time >= close_time {
                    self.phase = RoundPhase::Terminated;
                    tracing::info!(time, "round closed");
                    ctx.close();
                }
                return;
            }
            RoundPhase::Running => {}
        }

        self.tick_level_drop(ctx, time);

        if let Some(lava_rise) = &mut self.lava_rise {
            if let Some(height) = lava_rise.tick(ctx, time) {
                self.lava_height = height;
            }
        }
        if let Some(projectiles) = &mut self.projectiles {
            projectiles.tick(ctx, &self.participants, time);
        }

        let result = self.check_win_result(ctx);
        if result.is_win() {
            self.broadcast_win(ctx, &result);
            let close_time = time.saturating_add(CLOSE_DELAY);
            self.phase = RoundPhase::Closing { close_time };
            tracing::info!(
                time,
                close_time,
                winner = ?result.winning_player().map(|p| p.id),
                "round decided"
            );
            self.result = Some(result);
        }
    }

    /// Lava eliminates on contact. Everything else is absorbed; the round
    /// always reports the damage handled so the host applies none of it.
    pub fn on_player_damage<C>(
        &mut self,
        ctx: &mut C,
        player: &PlayerHandle,
        source: &DamageSource,
        amount: f32,
    ) -> EventResult
    where
        C: GameContext + ?Sized,
    {
        tracing::trace!(player_id = %player.id, ?source, amount, "player damaged");
        if *source == DamageSource::Lava {
            self.eliminate_player(ctx, player);
        }
        EventResult::Handled
    }

    /// Death always eliminates and suppresses the host's respawn flow.
    pub fn on_player_death<C>(
        &mut self,
        ctx: &mut C,
        player: &PlayerHandle,
        source: &DamageSource,
    ) -> EventResult
    where
        C: GameContext + ?Sized,
    {
        tracing::debug!(player_id = %player.id, ?source, "player died");
        self.eliminate_player(ctx, player);
        EventResult::Handled
    }

    /// Runs the win evaluator against the host's live-player lookup.
    pub fn check_win_result<C>(&self, ctx: &C) -> WinResult
    where
        C: GameContext + ?Sized,
    {
        check_win_result(&self.participants, self.ignore_win_state, |id| {
            ctx.player(id)
        })
    }

    // -- accessors ---------------------------------------------------------

    pub fn participants(&self) -> &HashSet<PlayerId> {
        &self.participants
    }

    pub fn is_participant(&self, id: PlayerId) -> bool {
        self.participants.contains(&id)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn close_time(&self) -> Option<u64> {
        match self.phase {
            RoundPhase::Closing { close_time } => Some(close_time),
            _ => None,
        }
    }

    pub fn next_level_drop_time(&self) -> Option<u64> {
        self.next_level_drop_time
    }

    pub fn ignores_win_state(&self) -> bool {
        self.ignore_win_state
    }

    /// The decision, once the round has one.
    pub fn result(&self) -> Option<&WinResult> {
        self.result.as_ref()
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn levels(&self) -> &SpleefLevels {
        &self.levels
    }

    pub fn lava_height(&self) -> i32 {
        self.lava_height
    }

    pub fn config(&self) -> &SpleefConfig {
        &self.config
    }

    // -- internals ---------------------------------------------------------

    fn tick_level_drop<C>(&mut self, ctx: &mut C, time: u64)
    where
        C: GameContext + ?Sized,
    {
        match self.next_level_drop_time {
            Some(next) if time < next => {
                let ticks_to_drop = next - time;
                if ticks_to_drop % TICKS_PER_SECOND != 0 {
                    return;
                }
                let seconds_to_drop = ticks_to_drop / TICKS_PER_SECOND;
                if COUNTDOWN_SECONDS.contains(&seconds_to_drop) {
                    tracing::debug!(seconds_to_drop, "level drop countdown");
                    let message = Text::literal(format!("Level dropping in {seconds_to_drop}..."))
                        .formatted(&[Formatting::DarkPurple, Formatting::Bold]);
                    ctx.broadcast_action_bar(&message);
                }
            }
            _ => {
                self.levels.try_drop_level(ctx, &self.config);
                let interval = self.config.level_break_interval;
                self.next_level_drop_time = Some(time.saturating_add(interval));
            }
        }
    }

    fn broadcast_win<C>(&self, ctx: &mut C, result: &WinResult)
    where
        C: GameContext + ?Sized,
    {
        let message = match result.winning_player() {
            Some(player) => Text::literal(format!("{} has won the game!", player.name)),
            None => Text::literal("The game ended, but nobody won!"),
        }
        .formatted(&[Formatting::Gold]);

        ctx.broadcast_message(&message);
        ctx.broadcast_sound(Sound::Victory);
    }

    fn spawn_participant<C>(&mut self, ctx: &mut C, id: PlayerId)
    where
        C: GameContext + ?Sized,
    {
        self.placed.insert(id);
        self.spawn_logic.place(ctx, id, Role::Participant);
        ctx.give_item(id, self.config.tool_stack());
    }

    fn spawn_spectator<C>(&self, ctx: &mut C, id: PlayerId)
    where
        C: GameContext + ?Sized,
    {
        self.spawn_logic.place(ctx, id, Role::Spectator);
    }

    /// Announces the elimination, demotes the player to spectator and
    /// drops them from the participant set for good. Players who aren't
    /// participants are just put back at the spectator spawn.
    fn eliminate_player<C>(&mut self, ctx: &mut C, player: &PlayerHandle)
    where
        C: GameContext + ?Sized,
    {
        if self.phase == RoundPhase::Terminated {
            return;
        }
        if !self.participants.contains(&player.id) {
            self.spawn_spectator(ctx, player.id);
            return;
        }

        let message = Text::literal(format!("{} has been eliminated!", player.name))
            .formatted(&[Formatting::Red]);
        ctx.broadcast_message(&message);
        ctx.broadcast_sound(Sound::Elimination);

        self.spawn_spectator(ctx, player.id);
        self.participants.remove(&player.id);

        tracing::info!(
            player_id = %player.id,
            remaining = self.participants.len(),
            "player eliminated"
        );
    }
}
