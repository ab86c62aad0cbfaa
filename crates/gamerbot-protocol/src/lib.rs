//! Wire protocol for gamerbot.
//!
//! This crate defines the "language" the bot speaks with a chat server:
//!
//! - **Types** ([`Message`], [`InboundMessage`], [`Reply`], [`Nick`]) —
//!   raw protocol lines and the chat-level messages built from them.
//! - **Codec** ([`Codec`] trait, [`IrcCodec`]) — how messages are
//!   converted to and from text lines.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (text lines) and the
//! dispatcher (commands). It knows nothing about connections or games.
//!
//! ```text
//! Transport (lines) → Protocol (Message) → Dispatcher (InboundMessage → Reply)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, IrcCodec};
pub use error::ProtocolError;
pub use types::{
    CHANNEL_PREFIX, InboundMessage, Message, Nick, Reply, command, is_channel,
};
