//! Command dispatcher: turns one inbound chat message into replies.
//!
//! The flow for each message is:
//!   1. Decide who the answer goes to (the channel, or the sender when the
//!      message was said to the bot directly)
//!   2. Parse the text into a canonical command and arguments
//!   3. Route: built-in commands first, then the sender's running game
//!
//! Every message is handled behind a panic boundary. A game that panics
//! loses its session; the bot keeps running.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use gamerbot_games::Catalog;
use gamerbot_protocol::{InboundMessage, Nick, Reply};
use gamerbot_session::{SessionError, SessionRegistry};

use crate::command::ParsedCommand;

const HELP_TEXT: &str = "If you want to play a game, say '.play <game>'.";
const WHICH_GAME_TEXT: &str = "What game do you want to play? '.play <game>'.";
const TRY_HELP_TEXT: &str = "Try '.help' instead.";
const NOT_PLAYING_TEXT: &str =
    "You're not playing a game. Start one by saying '.play <game>'.";
const ALREADY_PLAYING_TEXT: &str =
    "You're already playing a game. Please stop your current game first.";
const WHAT_GAME_TEXT: &str = "I need to know what game you want to play.";
const SEE_GAMES_TEXT: &str = "Use the 'games' command to see what I have.";
const NOTHING_TO_STOP_TEXT: &str = "You're not playing a game right now.";
const CONFIRM_STOP_TEXT: &str =
    "Are you sure you want to stop the game? Say '.stop y'.";
const STOPPED_TEXT: &str = "I was just beginning to have fun...";

/// Routes chat messages to built-in commands and running games.
///
/// Owns the session registry. It is driven by a single message loop, so
/// it needs no locking.
pub struct Dispatcher {
    nick: Nick,
    catalog: Catalog,
    sessions: SessionRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher for a bot called `nick` offering `catalog`.
    pub fn new(nick: impl Into<Nick>, catalog: Catalog) -> Self {
        Self {
            nick: nick.into(),
            catalog,
            sessions: SessionRegistry::new(),
        }
    }

    /// The bot's current nick.
    pub fn nick(&self) -> &Nick {
        &self.nick
    }

    /// Updates the bot's nick, e.g. after a nick collision.
    pub fn set_nick(&mut self, nick: impl Into<Nick>) {
        self.nick = nick.into();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handles one message and returns the replies to send, in order.
    ///
    /// Never panics: a panic raised while handling the message is logged,
    /// the sender's session is discarded and no replies are produced.
    pub fn handle_inbound_message(&mut self, msg: &InboundMessage) -> Vec<Reply> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(msg))) {
            Ok(replies) => replies,
            Err(payload) => {
                tracing::error!(
                    sender = %msg.sender,
                    to = %msg.target,
                    text = %msg.text,
                    reason = panic_reason(payload.as_ref()),
                    "panic while handling message, session discarded"
                );
                self.sessions.remove(&msg.sender);
                Vec::new()
            }
        }
    }

    /// Where answers to `msg` go: the channel it was said in, or the
    /// sender for a direct message.
    fn reply_target(&self, msg: &InboundMessage) -> String {
        if msg.target == self.nick.as_str() {
            msg.sender.to_string()
        } else {
            msg.target.clone()
        }
    }

    fn dispatch(&mut self, msg: &InboundMessage) -> Vec<Reply> {
        let Some(parsed) = ParsedCommand::parse(&msg.text, msg.is_channel()) else {
            return Vec::new();
        };
        let recipient = self.reply_target(msg);
        let sender = &msg.sender;

        tracing::debug!(
            %sender,
            %recipient,
            command = %parsed.command,
            args = ?parsed.args,
            "handling command"
        );

        match parsed.command.as_str() {
            ".help" => vec![Reply::privmsg(recipient, HELP_TEXT)],
            ".yea" | ".yes" => vec![Reply::privmsg(recipient, WHICH_GAME_TEXT)],
            ".games" => vec![Reply::privmsg(recipient, self.catalog.listing())],
            ".playing" => {
                let text = match self.sessions.get(sender).filter(|g| g.is_active()) {
                    Some(game) => format!("You're playing {}.", game.id()),
                    None => NOT_PLAYING_TEXT.to_string(),
                };
                vec![Reply::privmsg(recipient, text)]
            }
            ".play" => self.start_game(sender, &parsed.args),
            ".stop" => self.stop_game(sender, &parsed.args),
            command if command.starts_with(".hello") => vec![Reply::privmsg(
                recipient,
                format!("Hi {sender}! Want to play a game?"),
            )],
            _ => match self.sessions.play(sender, &parsed.tokens()) {
                Ok(replies) => replies,
                Err(_) => vec![Reply::notice(recipient, TRY_HELP_TEXT)],
            },
        }
    }

    /// `.play <game>`: starts a game for `sender`.
    fn start_game(&mut self, sender: &Nick, args: &[String]) -> Vec<Reply> {
        if self.sessions.has_active(sender) {
            return vec![Reply::notice(sender.as_str(), ALREADY_PLAYING_TEXT)];
        }

        let [game_id] = args else {
            return vec![
                Reply::notice(sender.as_str(), WHAT_GAME_TEXT),
                Reply::notice(sender.as_str(), SEE_GAMES_TEXT),
            ];
        };

        let Some(game) = self.catalog.create(game_id) else {
            tracing::debug!(%sender, game = %game_id, "unknown game requested");
            return vec![Reply::notice(sender.as_str(), SEE_GAMES_TEXT)];
        };

        match self.sessions.start(sender, game) {
            Ok(replies) => {
                tracing::info!(%sender, game = %game_id, "started game");
                replies
            }
            Err(SessionError::AlreadyPlaying(..)) => {
                vec![Reply::notice(sender.as_str(), ALREADY_PLAYING_TEXT)]
            }
            Err(e) => {
                tracing::warn!(%sender, error = %e, "could not start game");
                Vec::new()
            }
        }
    }

    /// `.stop [y|yes]`: stops `sender`'s game once confirmed.
    fn stop_game(&mut self, sender: &Nick, args: &[String]) -> Vec<Reply> {
        if !self.sessions.has_active(sender) {
            return vec![Reply::notice(sender.as_str(), NOTHING_TO_STOP_TEXT)];
        }

        let Some(answer) = args.first() else {
            return vec![Reply::notice(sender.as_str(), CONFIRM_STOP_TEXT)];
        };

        match answer.to_lowercase().as_str() {
            "y" | "yes" => {
                let mut replies = self.sessions.stop(sender).unwrap_or_default();
                replies.push(Reply::notice(sender.as_str(), STOPPED_TEXT));
                replies
            }
            _ => {
                tracing::debug!(%sender, %answer, "stop not confirmed");
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("nick", &self.nick)
            .field("catalog", &self.catalog)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
