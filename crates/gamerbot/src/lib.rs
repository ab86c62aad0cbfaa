//! # gamerbot
//!
//! An IRC bot that hosts small per-player text games.
//!
//! Players talk to the bot in a channel (`.play guess`) or directly
//! (`play guess`). The [`Dispatcher`] parses each message, answers the
//! built-in commands, and forwards everything else to the sender's running
//! game. Games are state machines behind the [`Game`] trait, created from
//! a fixed [`Catalog`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamerbot::prelude::*;
//!
//! # async fn run() -> Result<(), GamerbotError> {
//! let bot = Bot::builder()
//!     .config(BotConfig::default())
//!     .catalog(Catalog::standard())
//!     .build()?;
//! bot.connect_and_run(std::future::pending::<()>()).await
//! # }
//! ```

mod bot;
pub mod command;
mod config;
mod dispatcher;
mod error;
pub mod logging;
mod sasl;

pub use bot::{Bot, BotBuilder};
pub use config::{BotConfig, parse_channel_list};
pub use dispatcher::Dispatcher;
pub use error::GamerbotError;

pub use gamerbot_games::{Catalog, Game, GuessConfig, GuessingGame};
pub use gamerbot_protocol::{InboundMessage, Nick, Reply};

/// Everything needed to configure and run a bot, or to write a game.
pub mod prelude {
    pub use crate::{Bot, BotBuilder, BotConfig, Dispatcher, GamerbotError};
    pub use gamerbot_games::{Catalog, Game, GuessingGame};
    pub use gamerbot_protocol::{InboundMessage, Nick, Reply};
    pub use gamerbot_transport::{Connection, TcpConnection, WebSocketConnection};
}
