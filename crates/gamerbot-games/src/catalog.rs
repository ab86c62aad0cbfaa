//! Game catalog: the static list of games players can start.

use std::fmt;
use std::sync::Arc;

use crate::{CatalogError, Game, GuessingGame, guess::GUESS_ID};

/// Builds a fresh, idle game instance.
pub type GameFactory = Arc<dyn Fn() -> Box<dyn Game> + Send + Sync>;

/// Maps game ids to factories, in registration order.
///
/// The catalog is fixed once the bot starts. It is cheap to clone; the
/// factories are shared.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: Vec<(String, GameFactory)>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog the bot ships with: just the guessing game.
    pub fn standard() -> Self {
        let factory: GameFactory =
            Arc::new(|| Box::new(GuessingGame::new()) as Box<dyn Game>);
        Self {
            entries: vec![(GUESS_ID.to_string(), factory)],
        }
    }

    /// Adds a game under `id`.
    ///
    /// # Errors
    /// - [`CatalogError::InvalidId`] if `id` is empty or contains whitespace
    /// - [`CatalogError::DuplicateGame`] if `id` is already taken
    pub fn register<F, G>(&mut self, id: &str, factory: F) -> Result<(), CatalogError>
    where
        F: Fn() -> G + Send + Sync + 'static,
        G: Game,
    {
        if id.is_empty() || id.contains(char::is_whitespace) {
            return Err(CatalogError::InvalidId(id.to_string()));
        }
        if self.contains(id) {
            return Err(CatalogError::DuplicateGame(id.to_string()));
        }

        let factory: GameFactory =
            Arc::new(move || Box::new(factory()) as Box<dyn Game>);
        self.entries.push((id.to_string(), factory));
        tracing::debug!(game = id, "game registered");
        Ok(())
    }

    /// Builds a new instance of the game registered under `id`.
    ///
    /// Lookup is exact: `GUESS` does not find `guess`.
    pub fn create(&self, id: &str) -> Option<Box<dyn Game>> {
        self.entries
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, factory)| factory())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == id)
    }

    /// Game ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// The line shown for the `games` command, e.g. `Available games: guess.`
    pub fn listing(&self) -> String {
        let ids: Vec<&str> = self.ids().collect();
        format!("Available games: {}.", ids.join(", "))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
