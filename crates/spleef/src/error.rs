//! Unified error type for the spleef host.

use spleef_game::ConfigError;
use spleef_session::SessionError;

/// Errors from talking to a running arena.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The arena task has stopped (closed, shut down, or panicked).
    #[error("arena is unavailable")]
    Unavailable,

    /// The registry rejected a connect or disconnect.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The pre-formed participant list doesn't fit the config's bounds.
    #[error("{count} participants outside allowed range {min}..={max}")]
    ParticipantCount { count: usize, min: usize, max: usize },
}

/// Top-level error wrapping every crate-specific error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum SpleefError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Host(#[from] HostError),
}
