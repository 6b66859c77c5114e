//! Error types for the game layer.
//!
//! The round itself never fails: missing players are skipped and an empty
//! floor makes a drop a no-op. The only errors are a config that doesn't
//! parse or doesn't make sense, caught before a round is built.

/// Errors raised while loading or validating a [`SpleefConfig`](crate::SpleefConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON didn't match the config schema.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Player bounds are unusable (`min` is zero or above `max`).
    #[error("invalid player bounds: min {min}, max {max}")]
    InvalidPlayers { min: usize, max: usize },

    /// An interval that drives a repeating timer was zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    /// A projectile restock cap of zero would never hand anything out.
    #[error("projectile maximum must be greater than zero")]
    ZeroProjectileMaximum,
}
