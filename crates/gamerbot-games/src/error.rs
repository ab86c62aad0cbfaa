//! Error types for the game layer.

/// Errors that can occur while building a game catalog.
///
/// Playing a game never fails with an error: bad input is answered with a
/// reply to the player instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A game with this id is already registered.
    #[error("game {0:?} is already registered")]
    DuplicateGame(String),

    /// The id can't be typed as a single command argument.
    #[error("invalid game id {0:?}: must be a non-empty word")]
    InvalidId(String),
}
