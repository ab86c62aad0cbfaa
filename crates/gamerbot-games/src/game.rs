//! The `Game` trait: the extension point for new games.
//!
//! A game is a small state machine owned by one player. The dispatcher
//! calls these methods at the right time and delivers whatever replies
//! they return; a game never talks to the network itself.

use gamerbot_protocol::{Nick, Reply};

/// The trait every game variant implements.
///
/// The lifecycle is:
///
/// ```text
/// (no session) ──start──→ Active ──play──→ Active
///                            │               │
///                       stop / win / lose ───┘
///                            ▼
///                          Idle
/// ```
///
/// `play` is only ever called while [`is_active`](Game::is_active) is
/// `true`. That is guaranteed by the session registry, not checked here.
pub trait Game: Send + 'static {
    /// Short stable name, used in the catalog and in status replies.
    fn id(&self) -> &str;

    /// Returns `true` from `start` until `stop` or a terminal outcome.
    fn is_active(&self) -> bool;

    /// Sets up a fresh round and returns the opening instructions.
    ///
    /// The caller makes sure the player has no other active game.
    fn start(&mut self, player: &Nick) -> Vec<Reply>;

    /// Ends the round and releases its state.
    ///
    /// Calling this on an inactive game does nothing.
    fn stop(&mut self, player: &Nick) -> Vec<Reply>;

    /// Consumes one turn of input from the player.
    ///
    /// `args` is the whole command line as tokens, command word included.
    /// Invalid input must leave the game state untouched and explain the
    /// problem in the returned replies.
    fn play(&mut self, player: &Nick, args: &[String]) -> Vec<Reply>;
}
