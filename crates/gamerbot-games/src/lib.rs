//! Games for gamerbot.
//!
//! Every game is a per-player state machine behind the [`Game`] trait. The
//! [`Catalog`] maps game ids to factories so the dispatcher can start a
//! fresh instance by name.
//!
//! # Key types
//!
//! - [`Game`] — the trait game authors implement
//! - [`Catalog`] — the fixed list of games players can start
//! - [`GuessingGame`] — guess a number between 1 and 100 in six tries
//! - [`GuessConfig`] — rules of the guessing game

mod catalog;
mod config;
mod error;
mod game;
mod guess;

pub use catalog::{Catalog, GameFactory};
pub use config::GuessConfig;
pub use error::CatalogError;
pub use game::Game;
pub use guess::{GUESS_ID, GuessingGame};
