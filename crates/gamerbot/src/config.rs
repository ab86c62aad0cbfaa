//! Bot configuration.
//!
//! A [`BotConfig`] can come from defaults, a JSON file, or both: every
//! field is optional in the file and falls back to its default. Command
//! line flags are applied on top by the binary.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use gamerbot_protocol::{CHANNEL_PREFIX, Nick};
use serde::Deserialize;

use crate::GamerbotError;

/// Connection and identity settings for the bot.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Host name or address of the IRC server.
    pub server: String,
    pub port: u16,
    /// Nick to register with. `^` is appended on a collision.
    pub nick: Nick,
    /// Channels joined after registration. Entries without a leading `#`
    /// are skipped.
    pub channels: Vec<String>,
    /// When set, connect over WebSocket at this path instead of raw TCP.
    pub websocket_path: Option<String>,
    /// Wrap the connection in TLS (`wss://` for WebSocket).
    pub tls: bool,
    /// Accept any server certificate.
    pub insecure: bool,
    /// Log in with SASL PLAIN before registering. Implies `tls`.
    pub sasl: bool,
    /// SASL login, when it differs from the nick.
    pub sasl_user: Option<String>,
    pub sasl_pass: Option<String>,
    /// How long to wait between sending `QUIT` and closing the socket.
    pub quit_delay_ms: u64,
    /// Log at debug level.
    pub debug: bool,
    /// Also log every raw protocol line.
    pub debug2: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".to_string(),
            port: 6667,
            nick: Nick::new("gamerbot"),
            channels: vec!["#games".to_string()],
            websocket_path: None,
            tls: false,
            insecure: false,
            sasl: false,
            sasl_user: None,
            sasl_pass: None,
            quit_delay_ms: 1000,
            debug: false,
            debug2: false,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("nick", &self.nick)
            .field("channels", &self.channels)
            .field("websocket_path", &self.websocket_path)
            .field("tls", &self.tls)
            .field("insecure", &self.insecure)
            .field("sasl", &self.sasl)
            .field("sasl_user", &self.sasl_user)
            .field("sasl_pass", &self.sasl_pass.as_ref().map(|_| "<redacted>"))
            .field("quit_delay_ms", &self.quit_delay_ms)
            .field("debug", &self.debug)
            .field("debug2", &self.debug2)
            .finish()
    }
}

impl BotConfig {
    /// Reads a config from a JSON file.
    ///
    /// # Errors
    /// [`GamerbotError::Io`] if the file can't be read,
    /// [`GamerbotError::Config`] if it isn't valid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GamerbotError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, GamerbotError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| GamerbotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values a file or flag could get wrong.
    pub fn validate(&self) -> Result<(), GamerbotError> {
        if self.server.is_empty() {
            return Err(GamerbotError::Config("server must not be empty".into()));
        }
        if self.port == 0 {
            return Err(GamerbotError::Config("port must not be 0".into()));
        }
        let nick = self.nick.as_str();
        if nick.is_empty() || nick.contains(char::is_whitespace) {
            return Err(GamerbotError::Config(format!("invalid nick {nick:?}")));
        }
        if self.sasl && self.sasl_pass.as_deref().unwrap_or_default().is_empty() {
            return Err(GamerbotError::Config("sasl needs a password".into()));
        }
        if self.sasl_user.as_deref().is_some_and(|u| u.contains('\0')) {
            return Err(GamerbotError::Config("sasl user must not contain NUL".into()));
        }
        Ok(())
    }

    /// `server:port`, as used for a TCP connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Whether the connection is wrapped in TLS. SASL always is.
    pub fn use_tls(&self) -> bool {
        self.tls || self.sasl
    }

    /// The SASL login: `sasl_user` if set, the configured nick otherwise.
    pub fn sasl_login(&self) -> &str {
        self.sasl_user
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(self.nick.as_str())
    }

    /// The WebSocket URL, if a WebSocket path is configured.
    pub fn websocket_url(&self) -> Option<String> {
        let path = self.websocket_path.as_deref()?;
        let slash = if path.starts_with('/') { "" } else { "/" };
        let scheme = if self.use_tls() { "wss" } else { "ws" };
        Some(format!("{scheme}://{}:{}{slash}{path}", self.server, self.port))
    }

    /// Channels that will actually be joined.
    pub fn joinable_channels(&self) -> impl Iterator<Item = &str> {
        self.channels
            .iter()
            .map(String::as_str)
            .filter(|c| c.starts_with(CHANNEL_PREFIX))
    }

    pub fn quit_delay(&self) -> Duration {
        Duration::from_millis(self.quit_delay_ms)
    }
}

/// Splits a comma separated channel list such as `#games,#lobby`.
pub fn parse_channel_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
