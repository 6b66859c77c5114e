//! Arena actor: an isolated Tokio task that owns one spleef round.
//!
//! The outside world talks to the arena through an mpsc channel. Commands
//! and ticks are handled one at a time inside a single `select!` loop, so
//! a damage event is always fully resolved before the next tick's win
//! check runs.

use std::collections::HashMap;

use spleef_game::{EventResult, GameEvent, RoundPhase, SpleefActive, WinResult};
use spleef_protocol::{DamageSource, Outbound, PlayerHandle, PlayerId};
use spleef_session::{JoinKind, PlayerRegistry};
use spleef_tick::WorldClock;
use tokio::sync::{mpsc, oneshot};

use crate::host::{ArenaBackend, HostState};
use crate::HostError;

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

/// Commands sent to an arena actor.
///
/// Variants with a `oneshot::Sender` expect a reply; the caller awaits it.
pub(crate) enum ArenaCommand {
    Connect {
        player: PlayerHandle,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<JoinKind, HostError>>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), HostError>>,
    },
    Damage {
        player_id: PlayerId,
        source: DamageSource,
        amount: f32,
        reply: oneshot::Sender<EventResult>,
    },
    Death {
        player_id: PlayerId,
        source: DamageSource,
        reply: oneshot::Sender<EventResult>,
    },
    GetInfo {
        reply: oneshot::Sender<ArenaInfo>,
    },
    Shutdown,
}

/// A snapshot of the arena's state.
#[derive(Debug, Clone)]
pub struct ArenaInfo {
    pub phase: RoundPhase,
    /// Current world time.
    pub time: u64,
    /// Remaining participants, in id order.
    pub participants: Vec<PlayerId>,
    /// Players connected right now, participants or not.
    pub connected: usize,
    /// Sessions still tracked, connected or within their grace period.
    pub sessions: usize,
    pub levels_remaining: usize,
}

/// What the arena task returns when it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// The decision, if the round reached one.
    pub result: Option<WinResult>,
    /// World time when the task stopped.
    pub final_time: u64,
    /// `true` if the round closed the session itself, `false` on shutdown.
    pub closed: bool,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<&PlayerHandle> {
        self.result.as_ref().and_then(WinResult::winning_player)
    }
}

/// Handle to a running arena. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ArenaHandle {
    sender: mpsc::Sender<ArenaCommand>,
}

impl ArenaHandle {
    /// Connects a player. New players are added to the round (as
    /// spectators unless they are pending participants); players back
    /// within the grace period rejoin as spectators.
    pub async fn connect(
        &self,
        player: PlayerHandle,
        sender: PlayerSender,
    ) -> Result<JoinKind, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ArenaCommand::Connect {
            player,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| HostError::Unavailable)?
    }

    /// Marks a player disconnected. The round sees them as gone from the
    /// next win check on.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ArenaCommand::Disconnect {
            player_id,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| HostError::Unavailable)?
    }

    /// Reports damage to a connected player. `Pass` means the player isn't
    /// connected here and the caller should apply its default handling.
    pub async fn damage(
        &self,
        player_id: PlayerId,
        source: DamageSource,
        amount: f32,
    ) -> Result<EventResult, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ArenaCommand::Damage {
            player_id,
            source,
            amount,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| HostError::Unavailable)
    }

    pub async fn death(
        &self,
        player_id: PlayerId,
        source: DamageSource,
    ) -> Result<EventResult, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ArenaCommand::Death {
            player_id,
            source,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| HostError::Unavailable)
    }

    pub async fn info(&self) -> Result<ArenaInfo, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ArenaCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| HostError::Unavailable)
    }

    /// Stops the arena without waiting for the round to finish.
    pub async fn shutdown(&self) -> Result<(), HostError> {
        self.send(ArenaCommand::Shutdown).await
    }

    async fn send(&self, cmd: ArenaCommand) -> Result<(), HostError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| HostError::Unavailable)
    }
}

/// The internal arena state. Runs inside a Tokio task.
struct ArenaActor<W: ArenaBackend> {
    round: SpleefActive,
    host: HostState<W>,
    clock: WorldClock,
    receiver: mpsc::Receiver<ArenaCommand>,
}

impl<W: ArenaBackend> ArenaActor<W> {
    async fn run(mut self) -> RoundOutcome {
        tracing::info!(time = self.host.time, "arena actor started");
        self.round.open(&mut self.host);

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(ArenaCommand::Shutdown) | None => {
                        tracing::info!(time = self.host.time, "arena shutting down");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                },
                tick = self.clock.next_tick() => {
                    if tick.late {
                        tracing::debug!(tick = tick.number, dropped = tick.dropped, "late world tick");
                    }
                    self.tick(tick.world_time);
                    self.clock.finish_tick();
                    if self.host.closed {
                        break;
                    }
                }
            }
        }

        tracing::info!(time = self.host.time, phase = %self.round.phase(), "arena actor stopped");

        RoundOutcome {
            result: self.round.result().cloned(),
            final_time: self.host.time,
            closed: self.host.closed,
        }
    }

    fn tick(&mut self, world_time: u64) {
        self.host.time = world_time;
        if !self.host.registry.expire_stale(world_time).is_empty() {
            self.host.registry.cleanup();
        }
        self.round.tick(&mut self.host);
    }

    fn handle_command(&mut self, cmd: ArenaCommand) {
        match cmd {
            ArenaCommand::Connect {
                player,
                sender,
                reply,
            } => {
                let _ = reply.send(self.handle_connect(player, sender));
            }
            ArenaCommand::Disconnect { player_id, reply } => {
                let _ = reply.send(self.handle_disconnect(player_id));
            }
            ArenaCommand::Damage {
                player_id,
                source,
                amount,
                reply,
            } => {
                let result = match self.host.registry.connected(player_id).cloned() {
                    Some(player) => self.round.handle(
                        &mut self.host,
                        GameEvent::PlayerDamage {
                            player,
                            source,
                            amount,
                        },
                    ),
                    None => {
                        let state = self.host.registry.get(player_id).map(|s| s.state);
                        tracing::debug!(%player_id, ?state, "damage for unconnected player");
                        EventResult::Pass
                    }
                };
                let _ = reply.send(result);
            }
            ArenaCommand::Death {
                player_id,
                source,
                reply,
            } => {
                let result = match self.host.registry.connected(player_id).cloned() {
                    Some(player) => self
                        .round
                        .handle(&mut self.host, GameEvent::PlayerDeath { player, source }),
                    None => {
                        let state = self.host.registry.get(player_id).map(|s| s.state);
                        tracing::debug!(%player_id, ?state, "death for unconnected player");
                        EventResult::Pass
                    }
                };
                let _ = reply.send(result);
            }
            ArenaCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            // Handled by the run loop.
            ArenaCommand::Shutdown => {}
        }
    }

    fn handle_connect(
        &mut self,
        player: PlayerHandle,
        sender: PlayerSender,
    ) -> Result<JoinKind, HostError> {
        let kind = self.host.registry.connect(player.clone(), self.host.time)?;
        self.host.senders.insert(player.id, sender);

        let event = match kind {
            JoinKind::New => GameEvent::PlayerAdd(player),
            JoinKind::Rejoin => GameEvent::PlayerRejoin(player),
        };
        self.round.handle(&mut self.host, event);
        Ok(kind)
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) -> Result<(), HostError> {
        self.host.registry.disconnect(player_id, self.host.time)?;
        self.host.senders.remove(&player_id);
        Ok(())
    }

    fn info(&self) -> ArenaInfo {
        let mut participants: Vec<PlayerId> = self.round.participants().iter().copied().collect();
        participants.sort();
        ArenaInfo {
            phase: self.round.phase(),
            time: self.host.time,
            participants,
            connected: self.host.registry.connected_count(),
            sessions: self.host.registry.len(),
            levels_remaining: self.round.levels().remaining(),
        }
    }
}

/// Spawns the arena task. The round opens as soon as the task starts.
pub(crate) fn spawn_arena<W: ArenaBackend>(
    round: SpleefActive,
    registry: PlayerRegistry,
    senders: HashMap<PlayerId, PlayerSender>,
    world: W,
    clock: WorldClock,
    channel_size: usize,
) -> (ArenaHandle, tokio::task::JoinHandle<RoundOutcome>) {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = ArenaActor {
        round,
        host: HostState {
            time: clock.world_time(),
            closed: false,
            registry,
            senders,
            world,
        },
        clock,
        receiver: rx,
    };

    let task = tokio::spawn(actor.run());
    (ArenaHandle { sender: tx }, task)
}
