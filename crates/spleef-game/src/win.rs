//! The win evaluator.

use spleef_protocol::{PlayerHandle, PlayerId};

/// Outcome of a win check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinResult {
    /// Two or more participants are still connected.
    Undecided,
    /// Exactly one participant is left connected.
    Winner(PlayerHandle),
    /// Nobody is left; the round ends without a winner.
    NoWinner,
}

impl WinResult {
    /// `true` for both `Winner` and `NoWinner`.
    pub fn is_win(&self) -> bool {
        !matches!(self, Self::Undecided)
    }

    pub fn winning_player(&self) -> Option<&PlayerHandle> {
        match self {
            Self::Winner(player) => Some(player),
            _ => None,
        }
    }
}

/// Decides the round from the participant set and a liveness lookup.
///
/// `lookup` answers whether a participant currently has a connected
/// entity. `ignore_win_state` forces [`WinResult::Undecided`]; rounds that
/// started with one participant or fewer run forever for testing.
pub fn check_win_result<'a, I, F>(
    participants: I,
    ignore_win_state: bool,
    mut lookup: F,
) -> WinResult
where
    I: IntoIterator<Item = &'a PlayerId>,
    F: FnMut(PlayerId) -> Option<PlayerHandle>,
{
    if ignore_win_state {
        return WinResult::Undecided;
    }

    let mut winning_player = None;
    for id in participants {
        if let Some(player) = lookup(*id) {
            if winning_player.is_some() {
                return WinResult::Undecided;
            }
            winning_player = Some(player);
        }
    }

    match winning_player {
        Some(player) => WinResult::Winner(player),
        None => WinResult::NoWinner,
    }
}
