//! Unified error type for gamerbot.

use gamerbot_games::CatalogError;
use gamerbot_protocol::ProtocolError;
use gamerbot_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GamerbotError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (malformed line, missing params).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A catalog error (duplicate or invalid game id).
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
