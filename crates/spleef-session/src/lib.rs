//! Player connection tracking for spleef arenas.
//!
//! The round controller only ever asks one question about a player: "is
//! there a connected entity for this id right now?" This crate answers it.
//! It also tells the host whether a connecting player is new to the arena
//! or coming back after a disconnect, which decides between the round's
//! add and rejoin events.
//!
//! # How it fits in the stack
//!
//! ```text
//! Host runtime (above)  ← asks the registry who is connected
//!     ↕
//! Session layer (this crate)  ← connection state per PlayerId, by world tick
//!     ↕
//! Protocol layer (below)  ← PlayerId, PlayerHandle
//! ```

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::PlayerRegistry;
pub use session::{JoinKind, Session, SessionConfig, SessionState};
