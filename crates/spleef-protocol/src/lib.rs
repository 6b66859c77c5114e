//! Shared value types for spleef.
//!
//! This crate defines the small vocabulary that the round controller and
//! the host runtime agree on:
//!
//! - **Identity** ([`PlayerId`], [`PlayerHandle`]): who a player is, stable
//!   across reconnects.
//! - **World** ([`BlockPos`], [`BlockBounds`], [`GameMode`], [`ItemStack`],
//!   [`DamageSource`]): the slice of world state the game reads or writes.
//! - **Messages** ([`Text`], [`Formatting`], [`Sound`], [`Outbound`]): what
//!   gets delivered to a player's client.
//!
//! # Architecture
//!
//! ```text
//! Host runtime (spleef) → Round controller (spleef-game) → Protocol (this crate)
//! ```
//!
//! Nothing here knows about ticks, rounds, or connections. These are plain
//! data types with serde derives so hosts can forward them however they like.

mod text;
mod types;

pub use text::{Formatting, Outbound, Sound, Text};
pub use types::{
    BlockBounds, BlockPos, DamageSource, Enchantment, GameMode, ItemStack,
    PlayerHandle, PlayerId,
};
