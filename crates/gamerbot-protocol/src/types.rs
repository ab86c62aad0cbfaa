//! Core protocol types: identities, raw lines, and the chat messages the
//! dispatcher consumes and produces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

/// Character that marks a target as a channel rather than a nick.
pub const CHANNEL_PREFIX: char = '#';

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A user's nickname on the chat network.
///
/// Nicks are compared exactly as received. No case folding is applied, so
/// `Alice` and `alice` own separate sessions.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Nick(String);

impl Nick {
    /// Creates a nick from anything string-like.
    pub fn new(nick: impl Into<String>) -> Self {
        Self(nick.into())
    }

    /// Returns the nick as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Nick {
    fn from(nick: &str) -> Self {
        Self::new(nick)
    }
}

impl From<String> for Nick {
    fn from(nick: String) -> Self {
        Self(nick)
    }
}

impl PartialEq<str> for Nick {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Returns `true` if `target` names a channel.
pub fn is_channel(target: &str) -> bool {
    target.starts_with(CHANNEL_PREFIX)
}

// ---------------------------------------------------------------------------
// Message — one protocol line
// ---------------------------------------------------------------------------

/// A single protocol line, split into its parts.
///
/// ```text
/// :alice!a@host PRIVMSG #games :.play guess
///  └── prefix ─┘ └ cmd ┘ └───── params ─────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Origin of the message (`nick!user@host` or a server name).
    pub prefix: Option<String>,
    /// The command word or three-digit numeric, as sent.
    pub command: String,
    /// Middle parameters followed by the trailing one, if any.
    pub params: Vec<String>,
}

impl Message {
    /// Creates an outgoing message with no prefix.
    pub fn new<I, S>(command: &str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: None,
            command: command.to_string(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn nick(nick: &Nick) -> Self {
        Self::new(command::NICK, [nick.as_str()])
    }

    /// `USER` registration line; ident and real name both use the nick.
    pub fn user(nick: &Nick) -> Self {
        Self::new(command::USER, [nick.as_str(), "0", "*", nick.as_str()])
    }

    pub fn join(channel: &str) -> Self {
        Self::new(command::JOIN, [channel])
    }

    pub fn part(channel: &str, reason: &str) -> Self {
        Self::new(command::PART, [channel, reason])
    }

    pub fn quit(reason: &str) -> Self {
        Self::new(command::QUIT, [reason])
    }

    pub fn pong(token: &str) -> Self {
        Self::new(command::PONG, [token])
    }

    /// `CAP REQ` asking for one capability.
    pub fn cap_req(capability: &str) -> Self {
        Self::new(command::CAP, ["REQ", capability])
    }

    /// `CAP END`: capability negotiation is over, registration may finish.
    pub fn cap_end() -> Self {
        Self::new(command::CAP, ["END"])
    }

    pub fn authenticate(arg: &str) -> Self {
        Self::new(command::AUTHENTICATE, [arg])
    }

    /// Returns the nick part of the prefix (`alice` in `alice!a@host`).
    ///
    /// Server prefixes contain a dot and no `!`; those yield `None`.
    pub fn source_nick(&self) -> Option<Nick> {
        let prefix = self.prefix.as_deref()?;
        match prefix.split_once('!') {
            Some((nick, _)) if !nick.is_empty() => Some(Nick::new(nick)),
            Some(_) => None,
            None if prefix.contains('.') || prefix.is_empty() => None,
            None => Some(Nick::new(prefix)),
        }
    }

    /// Returns parameter `idx`, if present.
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }
}

/// Command words and numerics the bot understands.
pub mod command {
    pub const NICK: &str = "NICK";
    pub const USER: &str = "USER";
    pub const JOIN: &str = "JOIN";
    pub const PART: &str = "PART";
    pub const QUIT: &str = "QUIT";
    pub const PING: &str = "PING";
    pub const PONG: &str = "PONG";
    pub const PRIVMSG: &str = "PRIVMSG";
    pub const NOTICE: &str = "NOTICE";
    pub const ERROR: &str = "ERROR";
    pub const CAP: &str = "CAP";
    pub const AUTHENTICATE: &str = "AUTHENTICATE";
    /// RPL_WELCOME: registration completed.
    pub const RPL_WELCOME: &str = "001";
    /// ERR_NICKNAMEINUSE.
    pub const ERR_NICKNAMEINUSE: &str = "433";
    pub const RPL_LOGGEDIN: &str = "900";
    pub const ERR_NICKLOCKED: &str = "902";
    pub const RPL_SASLSUCCESS: &str = "903";
    pub const ERR_SASLFAIL: &str = "904";
    pub const ERR_SASLTOOLONG: &str = "905";
    pub const ERR_SASLABORTED: &str = "906";
    pub const ERR_SASLALREADY: &str = "907";
    pub const RPL_SASLMECHS: &str = "908";
}

// ---------------------------------------------------------------------------
// InboundMessage — what the dispatcher sees
// ---------------------------------------------------------------------------

/// A chat message addressed to a channel or directly to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Channel name (`#games`) or the bot's own nick for direct messages.
    pub target: String,
    /// Who sent the message.
    pub sender: Nick,
    /// The text after the target, exactly as received.
    pub text: String,
}

impl InboundMessage {
    pub fn new(
        target: impl Into<String>,
        sender: impl Into<Nick>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Builds an inbound message from a `PRIVMSG` line.
    ///
    /// # Errors
    /// - [`ProtocolError::MissingSender`] if the prefix carries no nick
    /// - [`ProtocolError::MissingParams`] if the target or text is absent
    pub fn from_privmsg(msg: &Message) -> Result<Self, ProtocolError> {
        let sender = msg
            .source_nick()
            .ok_or_else(|| ProtocolError::MissingSender(msg.command.clone()))?;

        match msg.params.as_slice() {
            [target, text, ..] => Ok(Self {
                target: target.clone(),
                sender,
                text: text.clone(),
            }),
            params => Err(ProtocolError::MissingParams {
                command: msg.command.clone(),
                expected: 2,
                got: params.len(),
            }),
        }
    }

    /// Returns `true` if the message was said in a channel.
    pub fn is_channel(&self) -> bool {
        is_channel(&self.target)
    }
}

// ---------------------------------------------------------------------------
// Reply — what the dispatcher produces
// ---------------------------------------------------------------------------

/// An outbound chat message.
///
/// Game and dispatcher code returns replies instead of writing to the
/// connection; the bot loop turns them into protocol lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A regular message, shown in the channel or query window.
    Privmsg { target: String, text: String },
    /// A notice. Clients render these apart from conversation and bots
    /// must never answer them.
    Notice { target: String, text: String },
}

impl Reply {
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Privmsg {
            target: target.into(),
            text: text.into(),
        }
    }

    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Notice {
            target: target.into(),
            text: text.into(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Privmsg { target, .. } | Self::Notice { target, .. } => target,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Privmsg { text, .. } | Self::Notice { text, .. } => text,
        }
    }

    /// Converts the reply into a protocol line.
    pub fn to_message(&self) -> Message {
        match self {
            Self::Privmsg { target, text } => {
                Message::new(command::PRIVMSG, [target.as_str(), text.as_str()])
            }
            Self::Notice { target, text } => {
                Message::new(command::NOTICE, [target.as_str(), text.as_str()])
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Privmsg { target, text } => write!(f, "-> {target}: {text}"),
            Self::Notice { target, text } => write!(f, "-> -{target}- {text}"),
        }
    }
}
