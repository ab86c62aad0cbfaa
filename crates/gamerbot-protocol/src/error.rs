//! Error types for the protocol layer.
//!
//! Each crate in gamerbot defines its own error enum. A `ProtocolError`
//! always means a line could not be turned into a [`Message`](crate::Message)
//! or back, never a network or game problem.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The line had nothing in it after trimming.
    #[error("empty line")]
    EmptyLine,

    /// The line has a prefix or tags but no command.
    #[error("missing command in line: {0}")]
    MissingCommand(String),

    /// A message carried fewer parameters than its command requires.
    #[error("{command} needs {expected} parameters, got {got}")]
    MissingParams {
        command: String,
        expected: usize,
        got: usize,
    },

    /// A message that must come from a user had no nick in its prefix.
    #[error("{0} has no sender prefix")]
    MissingSender(String),

    /// The message cannot be put on the wire as-is, for example because a
    /// parameter contains a line break.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
