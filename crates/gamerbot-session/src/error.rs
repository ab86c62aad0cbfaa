//! Error types for the session layer.

use gamerbot_protocol::Nick;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player already has an active game.
    /// A player can only play one game at a time.
    #[error("{0} is already playing {1}")]
    AlreadyPlaying(Nick, String),

    /// No active session exists for the given player.
    #[error("{0} is not playing a game")]
    NotPlaying(Nick),
}
