//! Player session management for gamerbot.
//!
//! A session is the association between a player's nick and the one game
//! they are currently playing. The [`SessionRegistry`] owns every game
//! instance; callers borrow them for the duration of a single message.
//!
//! # How it fits in the stack
//!
//! ```text
//! Dispatcher (above)  ← asks "is this nick playing?" and forwards turns
//!     ↕
//! Session Layer (this crate)  ← one game per nick, exclusively owned
//!     ↕
//! Games (below)  ← the Game trait and its implementations
//! ```

mod error;
mod registry;

pub use error::SessionError;
pub use registry::SessionRegistry;
