//! The player registry: every player an arena has seen, and whether they
//! are connected right now.
//!
//! # Concurrency note
//!
//! `PlayerRegistry` is a plain map with no locking. It is owned by the
//! arena actor task and only touched from there, strictly one event at a
//! time.

use std::collections::BTreeMap;

use spleef_protocol::{PlayerHandle, PlayerId};

use crate::{JoinKind, Session, SessionConfig, SessionError, SessionState};

/// Tracks player connections for one arena.
///
/// ```text
/// connect() ──→ [Connected] ──disconnect()──→ [Disconnected]
///                    ↑                             │
///                    └────── connect() (rejoin) ───┤
///                                                  ▼ expire_stale()
///                                             [Expired] ──→ cleanup()
/// ```
///
/// Keyed by a `BTreeMap` so broadcasts walk players in a stable order.
pub struct PlayerRegistry {
    sessions: BTreeMap<PlayerId, Session>,
    config: SessionConfig,
}

impl PlayerRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: BTreeMap::new(),
            config,
        }
    }

    /// Records a player connecting at world tick `now`.
    ///
    /// Returns [`JoinKind::Rejoin`] if they disconnected within the grace
    /// period, [`JoinKind::New`] otherwise. The stored display name is
    /// refreshed either way.
    ///
    /// # Errors
    /// [`SessionError::AlreadyConnected`] if the player is connected already.
    pub fn connect(
        &mut self,
        handle: PlayerHandle,
        now: u64,
    ) -> Result<JoinKind, SessionError> {
        let player_id = handle.id;
        let grace = self.config.reconnect_grace_ticks;

        let kind = match self.sessions.get(&player_id) {
            Some(existing) if existing.is_connected() => {
                return Err(SessionError::AlreadyConnected(player_id));
            }
            Some(existing) if existing.can_rejoin(now, grace) => JoinKind::Rejoin,
            _ => JoinKind::New,
        };

        self.sessions.insert(
            player_id,
            Session {
                handle,
                state: SessionState::Connected,
            },
        );

        match kind {
            JoinKind::New => tracing::info!(%player_id, now, "player connected"),
            JoinKind::Rejoin => tracing::info!(%player_id, now, "player rejoined"),
        }
        Ok(kind)
    }

    /// Marks a player disconnected at world tick `now`.
    ///
    /// # Errors
    /// [`SessionError::NotConnected`] if there is no live connection.
    pub fn disconnect(
        &mut self,
        player_id: PlayerId,
        now: u64,
    ) -> Result<(), SessionError> {
        match self.sessions.get_mut(&player_id) {
            Some(session) if session.is_connected() => {
                session.state = SessionState::Disconnected { since: now };
                tracing::info!(%player_id, now, "player disconnected");
                Ok(())
            }
            _ => Err(SessionError::NotConnected(player_id)),
        }
    }

    /// Expires every disconnected session whose grace period has elapsed
    /// at `now`. Returns the ids that expired.
    pub fn expire_stale(&mut self, now: u64) -> Vec<PlayerId> {
        let grace = self.config.reconnect_grace_ticks;
        let mut expired = Vec::new();

        for (player_id, session) in &mut self.sessions {
            if let SessionState::Disconnected { since } = session.state {
                if now.saturating_sub(since) > grace {
                    session.state = SessionState::Expired;
                    tracing::info!(%player_id, "session expired");
                    expired.push(*player_id);
                }
            }
        }

        expired
    }

    /// Drops expired sessions. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| !matches!(s.state, SessionState::Expired));
        before - self.sessions.len()
    }

    /// The handle of a connected player, or `None` if they are not
    /// connected (never seen, disconnected, or expired).
    pub fn connected(&self, player_id: PlayerId) -> Option<&PlayerHandle> {
        self.sessions
            .get(&player_id)
            .filter(|s| s.is_connected())
            .map(|s| &s.handle)
    }

    pub fn is_connected(&self, player_id: PlayerId) -> bool {
        self.connected(player_id).is_some()
    }

    /// Connected players in id order.
    pub fn connected_players(&self) -> impl Iterator<Item = &PlayerHandle> {
        self.sessions
            .values()
            .filter(|s| s.is_connected())
            .map(|s| &s.handle)
    }

    pub fn connected_count(&self) -> usize {
        self.connected_players().count()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    /// Total tracked sessions, in any state.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
