//! The session registry: which player is playing which game.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself. It uses a plain
//! `HashMap` and is owned by the dispatcher, which runs on the bot's single
//! message loop. Every message is fully handled before the next one is
//! read, so no two turns for the same player can interleave.

use std::collections::HashMap;

use gamerbot_games::Game;
use gamerbot_protocol::{Nick, Reply};

use crate::SessionError;

/// Owns every player's game instance.
///
/// ## Lifecycle
///
/// ```text
/// start() ──→ [active] ──play()──→ [active]
///                │                     │
///             stop()             win / lose
///                ▼                     ▼
///            (removed)   [inactive] ──release_inactive()──→ (removed)
/// ```
///
/// A player has at most one entry, and at most one *active* game.
#[derive(Default)]
pub struct SessionRegistry {
    /// Game instances keyed by the owning player's nick.
    sessions: HashMap<Nick, Box<dyn Game>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff `nick` has an entry and its game is active.
    pub fn has_active(&self, nick: &Nick) -> bool {
        self.sessions.get(nick).is_some_and(|game| game.is_active())
    }

    /// Looks up the game entry for `nick`, active or not.
    pub fn get(&self, nick: &Nick) -> Option<&(dyn Game + 'static)> {
        self.sessions.get(nick).map(|game| game.as_ref())
    }

    pub fn get_mut(&mut self, nick: &Nick) -> Option<&mut (dyn Game + 'static)> {
        self.sessions.get_mut(nick).map(|game| game.as_mut())
    }

    /// Inserts or replaces the entry for `nick`, returning the old one.
    ///
    /// This never checks for a live session. Use [`start`](Self::start)
    /// unless replacing a running game is really intended.
    pub fn set(
        &mut self,
        nick: Nick,
        game: Box<dyn Game>,
    ) -> Option<Box<dyn Game>> {
        self.sessions.insert(nick, game)
    }

    /// Registers `game` for `nick` and starts it.
    ///
    /// Returns the game's opening replies.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyPlaying`] if `nick` already has an
    /// active game. The running game is left untouched.
    pub fn start(
        &mut self,
        nick: &Nick,
        game: Box<dyn Game>,
    ) -> Result<Vec<Reply>, SessionError> {
        if let Some(current) = self.get(nick).filter(|g| g.is_active()) {
            return Err(SessionError::AlreadyPlaying(
                nick.clone(),
                current.id().to_string(),
            ));
        }

        let game_id = game.id().to_string();
        self.set(nick.clone(), game);
        let replies = match self.get_mut(nick) {
            Some(game) => game.start(nick),
            None => Vec::new(),
        };

        tracing::info!(%nick, game = %game_id, "session started");
        Ok(replies)
    }

    /// Forwards one turn of input to the player's active game.
    ///
    /// If the turn ends the game (win or loss), the entry is released.
    ///
    /// # Errors
    /// Returns [`SessionError::NotPlaying`] if `nick` has no active game.
    pub fn play(
        &mut self,
        nick: &Nick,
        args: &[String],
    ) -> Result<Vec<Reply>, SessionError> {
        let game = match self.sessions.get_mut(nick) {
            Some(game) if game.is_active() => game,
            _ => return Err(SessionError::NotPlaying(nick.clone())),
        };

        let replies = game.play(nick, args);
        if self.release_inactive(nick) {
            tracing::info!(%nick, "session finished");
        }
        Ok(replies)
    }

    /// Stops the player's active game and removes the entry.
    ///
    /// # Errors
    /// Returns [`SessionError::NotPlaying`] if `nick` has no active game.
    pub fn stop(&mut self, nick: &Nick) -> Result<Vec<Reply>, SessionError> {
        if !self.has_active(nick) {
            return Err(SessionError::NotPlaying(nick.clone()));
        }

        let replies = match self.sessions.remove(nick) {
            Some(mut game) => game.stop(nick),
            None => Vec::new(),
        };
        tracing::info!(%nick, "session stopped");
        Ok(replies)
    }

    /// Removes the entry for `nick` if its game is no longer active.
    ///
    /// Returns `true` if an entry was removed.
    pub fn release_inactive(&mut self, nick: &Nick) -> bool {
        let inactive = self.get(nick).is_some_and(|game| !game.is_active());
        if inactive {
            self.sessions.remove(nick);
        }
        inactive
    }

    /// Removes the entry for `nick` unconditionally.
    pub fn remove(&mut self, nick: &Nick) -> Option<Box<dyn Game>> {
        self.sessions.remove(nick)
    }

    /// Drops every entry whose game is inactive. Returns how many went.
    pub fn cleanup_inactive(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, game| game.is_active());
        before - self.sessions.len()
    }

    /// Returns the number of entries (active or not).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
