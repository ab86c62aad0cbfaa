//! Codec trait and the IRC line codec.
//!
//! A codec converts between [`Message`] values and the text lines the
//! transport layer moves. The transport strips and adds line terminators,
//! so codecs never see `\r\n`.

use crate::{Message, ProtocolError};

/// Converts protocol messages to lines and back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into a single line without terminator.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if the message cannot be
    /// represented on one line.
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError>;

    /// Parses one line into a message.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyLine`] or
    /// [`ProtocolError::MissingCommand`] for lines that carry no command.
    fn decode(&self, line: &str) -> Result<Message, ProtocolError>;
}

// ---------------------------------------------------------------------------
// IrcCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for RFC 1459 style lines.
///
/// Message tags (`@key=value ...`) are accepted on input and discarded.
///
/// ```rust
/// use gamerbot_protocol::{Codec, IrcCodec, Message};
///
/// let codec = IrcCodec;
/// let msg = codec.decode(":alice!a@host PRIVMSG #games :.play guess").unwrap();
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.params, vec!["#games", ".play guess"]);
///
/// let line = codec.encode(&Message::new("PRIVMSG", ["alice", "hi there"])).unwrap();
/// assert_eq!(line, "PRIVMSG alice :hi there");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IrcCodec;

impl Codec for IrcCodec {
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError> {
        if msg.command.is_empty() || msg.command.contains(' ') {
            return Err(ProtocolError::InvalidMessage(format!(
                "bad command {:?}",
                msg.command
            )));
        }

        let mut line = String::new();
        if let Some(prefix) = &msg.prefix {
            line.push(':');
            line.push_str(prefix);
            line.push(' ');
        }
        line.push_str(&msg.command);

        let last = msg.params.len().saturating_sub(1);
        for (idx, param) in msg.params.iter().enumerate() {
            if param.contains(['\r', '\n', '\0']) {
                return Err(ProtocolError::InvalidMessage(format!(
                    "parameter {idx} of {} contains a line break",
                    msg.command
                )));
            }
            let needs_trailing =
                param.is_empty() || param.contains(' ') || param.starts_with(':');
            line.push(' ');
            if needs_trailing {
                if idx != last {
                    return Err(ProtocolError::InvalidMessage(format!(
                        "only the last parameter of {} may contain spaces",
                        msg.command
                    )));
                }
                line.push(':');
            }
            line.push_str(param);
        }

        Ok(line)
    }

    fn decode(&self, line: &str) -> Result<Message, ProtocolError> {
        let mut rest = line.trim_end_matches(['\r', '\n']);
        if rest.trim().is_empty() {
            return Err(ProtocolError::EmptyLine);
        }

        if let Some(tagged) = rest.strip_prefix('@') {
            rest = tagged.split_once(' ').map_or("", |(_, r)| r);
        }
        rest = rest.trim_start_matches(' ');

        let mut prefix = None;
        if let Some(prefixed) = rest.strip_prefix(':') {
            let (p, r) = prefixed.split_once(' ').unwrap_or((prefixed, ""));
            prefix = Some(p.to_string());
            rest = r.trim_start_matches(' ');
        }

        let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() {
            return Err(ProtocolError::MissingCommand(line.to_string()));
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            let (param, r) = rest.split_once(' ').unwrap_or((rest, ""));
            params.push(param.to_string());
            rest = r;
        }

        Ok(Message {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }
}
