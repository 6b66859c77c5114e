//! Error types for the session layer.

use spleef_protocol::PlayerId;

/// Errors that can occur while tracking connections.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player already has a live connection in this arena.
    #[error("player {0} is already connected")]
    AlreadyConnected(PlayerId),

    /// The player has no live connection to drop.
    #[error("player {0} is not connected")]
    NotConnected(PlayerId),
}
