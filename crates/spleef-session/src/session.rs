//! Session types: one record per player the arena has seen.
//!
//! A session tracks:
//! - WHO the player is (`PlayerHandle`)
//! - WHETHER they are connected right now
//! - WHEN they disconnected, in world ticks, so a later connect can be
//!   classified as a rejoin or a fresh join

use spleef_protocol::PlayerHandle;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How many world ticks a disconnected player has to come back and
    /// count as rejoining. After that the session expires and a later
    /// connect is a fresh join.
    ///
    /// Default: 600 ticks (30 seconds). 0 disables rejoin entirely.
    pub reconnect_grace_ticks: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_ticks: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The connection state of a session.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(grace elapsed)──→ Expired
///       ↑                            │
///       └──────────(rejoin)──────────┘
/// ```
///
/// Ticks are absolute world time as supplied by the host, never wall-clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    /// Disconnected at world tick `since`.
    Disconnected { since: u64 },
    /// Grace period elapsed; removed on the next cleanup.
    Expired,
}

/// How a successful connect should be reported to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// First time in this arena, or their old session expired.
    New,
    /// Came back within the grace period.
    Rejoin,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single player's record in the arena.
#[derive(Debug, Clone)]
pub struct Session {
    pub handle: PlayerHandle,
    pub state: SessionState,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Whether a connect at `now` would count as a rejoin.
    pub(crate) fn can_rejoin(&self, now: u64, grace: u64) -> bool {
        match self.state {
            SessionState::Disconnected { since } => {
                grace > 0 && now.saturating_sub(since) <= grace
            }
            _ => false,
        }
    }
}
