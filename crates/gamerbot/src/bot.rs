//! `Bot` builder and connection loop.
//!
//! This is the entry point for running gamerbot. It ties the layers
//! together: transport → protocol → dispatcher → session → games.
//!
//! The loop reads one line at a time and fully handles it before reading
//! the next, so every player's turns are applied in arrival order.

use std::future::Future;

use gamerbot_games::Catalog;
use gamerbot_protocol::{
    Codec, InboundMessage, IrcCodec, Message, Nick, ProtocolError, Reply, command,
};
use gamerbot_transport::{
    Connection, TcpConnection, TransportError, WebSocketConnection, client_config,
};

use crate::sasl::{self, SaslState};
use crate::{BotConfig, Dispatcher, GamerbotError};

const PART_REASON: &str = "Bye, bye";
const QUIT_REASON: &str = "Bye everyone!";
const TRY_HELP_TEXT: &str = "Try '.help' instead.";
/// Appended to the nick when the server says it is taken.
const NICK_COLLISION_SUFFIX: char = '^';

/// Builder for configuring a [`Bot`].
///
/// # Example
///
/// ```rust,ignore
/// use gamerbot::prelude::*;
///
/// let bot = Bot::builder()
///     .config(BotConfig::default())
///     .catalog(Catalog::standard())
///     .build()?;
/// bot.connect_and_run(tokio::signal::ctrl_c()).await
/// ```
#[derive(Debug, Default)]
pub struct BotBuilder {
    config: BotConfig,
    catalog: Option<Catalog>,
}

impl BotBuilder {
    /// Creates a builder with the default config and the standard catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the games players can start.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validates the config and builds the bot.
    pub fn build(self) -> Result<Bot, GamerbotError> {
        self.config.validate()?;

        for channel in &self.config.channels {
            if !gamerbot_protocol::is_channel(channel) {
                tracing::warn!(%channel, "not a channel name, it will not be joined");
            }
        }

        let catalog = self.catalog.unwrap_or_else(Catalog::standard);
        let dispatcher = Dispatcher::new(self.config.nick.clone(), catalog);
        Ok(Bot {
            config: self.config,
            dispatcher,
            codec: IrcCodec,
            sasl: SaslState::Idle,
        })
    }
}

/// Whether the loop keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// A configured bot, ready to connect.
#[derive(Debug)]
pub struct Bot {
    config: BotConfig,
    dispatcher: Dispatcher,
    codec: IrcCodec,
    sasl: SaslState,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::new()
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The nick the bot currently goes by.
    pub fn nick(&self) -> &Nick {
        self.dispatcher.nick()
    }

    /// Connects over WebSocket when a path is configured, TCP otherwise,
    /// wrapping either in TLS when asked to. Then runs until `shutdown`
    /// resolves or the server hangs up.
    pub async fn connect_and_run<F>(self, shutdown: F) -> Result<(), GamerbotError>
    where
        F: Future,
    {
        let tls = if self.config.use_tls() {
            Some(client_config(self.config.insecure)?)
        } else {
            None
        };

        match (self.config.websocket_url(), tls) {
            (Some(url), Some(tls)) => {
                let conn = WebSocketConnection::connect_tls(&url, tls).await?;
                self.run(conn, shutdown).await
            }
            (Some(url), None) => {
                let conn = WebSocketConnection::connect(&url).await?;
                self.run(conn, shutdown).await
            }
            (None, Some(tls)) => {
                let conn =
                    TcpConnection::connect_tls(&self.config.address(), &self.config.server, tls)
                        .await?;
                self.run(conn, shutdown).await
            }
            (None, None) => {
                let conn = TcpConnection::connect(&self.config.address()).await?;
                self.run(conn, shutdown).await
            }
        }
    }

    /// Registers with the server and handles lines until `shutdown`
    /// resolves, the server closes the connection, or it sends `ERROR`.
    ///
    /// With SASL enabled the `sasl` capability is requested ahead of `NICK`
    /// and `USER`; registration completes once the login outcome is known.
    ///
    /// On shutdown the bot leaves its channels and quits before closing.
    pub async fn run<C, F>(mut self, conn: C, shutdown: F) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
        F: Future,
    {
        let conn_id = conn.id();
        tracing::info!(%conn_id, nick = %self.nick(), "registering with server");

        if self.config.sasl {
            self.send(&conn, &Message::cap_req(sasl::CAPABILITY)).await?;
            self.sasl = SaslState::Requested;
        }
        self.send(&conn, &Message::nick(self.nick())).await?;
        self.send(&conn, &Message::user(self.nick())).await?;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(%conn_id, "shutting down");
                    self.quit(&conn).await;
                    return Ok(());
                }
                line = conn.recv_line() => {
                    let Some(line) = line? else {
                        tracing::info!(%conn_id, "server closed the connection");
                        return Ok(());
                    };
                    if self.handle_line(&conn, &line).await? == Flow::Stop {
                        if let Err(e) = conn.close().await {
                            tracing::debug!(error = %e, "close failed");
                        }
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn handle_line<C>(&mut self, conn: &C, line: &str) -> Result<Flow, GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        tracing::trace!(%line, "recv");

        let msg = match self.codec.decode(line) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, %line, "ignoring malformed line");
                return Ok(Flow::Continue);
            }
        };

        match msg.command.as_str() {
            command::PING => {
                let token = msg.param(0).unwrap_or_default();
                self.send(conn, &Message::pong(token)).await?;
            }
            command::RPL_WELCOME => self.on_welcome(conn, &msg).await?,
            command::ERR_NICKNAMEINUSE => self.on_nick_in_use(conn).await?,
            command::NICK => self.on_nick_change(&msg),
            command::PRIVMSG => self.on_privmsg(conn, &msg).await?,
            command::CAP => self.on_cap(conn, &msg).await?,
            command::AUTHENTICATE => self.on_authenticate(conn, &msg).await?,
            command::RPL_LOGGEDIN => {
                let account = msg.param(2).unwrap_or_default();
                tracing::info!(%account, "logged in");
            }
            command::RPL_SASLSUCCESS => {
                tracing::info!("SASL authentication succeeded");
                self.end_sasl(conn).await?;
            }
            command::ERR_SASLALREADY => {
                tracing::info!("already authenticated");
                self.end_sasl(conn).await?;
            }
            command::ERR_NICKLOCKED
            | command::ERR_SASLFAIL
            | command::ERR_SASLTOOLONG
            | command::ERR_SASLABORTED => {
                let reason = msg.params.last().map(String::as_str).unwrap_or_default();
                tracing::error!(numeric = %msg.command, %reason, "SASL authentication failed");
                self.end_sasl(conn).await?;
            }
            command::ERROR => {
                let reason = msg.param(0).unwrap_or_default();
                if reason.starts_with("Closing Link") {
                    tracing::info!(%reason, "server closed the link");
                } else {
                    tracing::error!(%reason, "server sent an error");
                }
                return Ok(Flow::Stop);
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    /// `CAP ACK` starts the PLAIN exchange; `CAP NAK` gives up on SASL.
    async fn on_cap<C>(&mut self, conn: &C, msg: &Message) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        if self.sasl != SaslState::Requested {
            return Ok(());
        }
        let offers_sasl = msg
            .param(2)
            .is_some_and(|caps| caps.split_whitespace().any(|c| c == sasl::CAPABILITY));

        match msg.param(1) {
            Some("ACK") if offers_sasl => {
                self.send(conn, &Message::authenticate(sasl::MECHANISM)).await?;
                self.sasl = SaslState::Authenticating;
            }
            Some("NAK") if offers_sasl => {
                tracing::error!("server refused the sasl capability");
                self.end_sasl(conn).await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// The server's `AUTHENTICATE +` asks for the credentials.
    async fn on_authenticate<C>(&mut self, conn: &C, msg: &Message) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        if self.sasl != SaslState::Authenticating || msg.param(0) != Some("+") {
            return Ok(());
        }
        let login = self.config.sasl_login();
        let password = self.config.sasl_pass.as_deref().unwrap_or_default();
        tracing::debug!(%login, "sending SASL credentials");

        let payload = sasl::plain_payload(login, password);
        for arg in sasl::authenticate_args(&payload) {
            self.send(conn, &Message::authenticate(arg)).await?;
        }
        self.sasl = SaslState::Sent;
        Ok(())
    }

    /// Ends capability negotiation once, whatever the SASL outcome.
    async fn end_sasl<C>(&mut self, conn: &C) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        if !self.sasl.in_progress() {
            return Ok(());
        }
        self.sasl = SaslState::Idle;
        self.send(conn, &Message::cap_end()).await
    }

    /// Registration finished: adopt the nick the server confirmed and join.
    async fn on_welcome<C>(&mut self, conn: &C, msg: &Message) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        self.sasl = SaslState::Idle;
        if let Some(nick) = msg.param(0).filter(|n| !n.is_empty()) {
            if nick != self.nick().as_str() {
                self.dispatcher.set_nick(nick);
            }
        }
        tracing::info!(nick = %self.nick(), "connected");

        for channel in self.config.joinable_channels() {
            tracing::info!(%channel, "joining");
            self.send(conn, &Message::join(channel)).await?;
        }
        Ok(())
    }

    async fn on_nick_in_use<C>(&mut self, conn: &C) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        let nick = Nick::new(format!("{}{NICK_COLLISION_SUFFIX}", self.nick()));
        tracing::warn!(taken = %self.nick(), %nick, "nick in use, trying another");
        self.dispatcher.set_nick(nick.clone());
        self.send(conn, &Message::nick(&nick)).await
    }

    /// Follows server-side renames of the bot itself.
    fn on_nick_change(&mut self, msg: &Message) {
        let renamed_self = msg.source_nick().is_some_and(|n| n == *self.nick());
        if let (true, Some(nick)) = (renamed_self, msg.param(0)) {
            tracing::info!(from = %self.nick(), to = %nick, "nick changed");
            self.dispatcher.set_nick(nick);
        }
    }

    async fn on_privmsg<C>(&mut self, conn: &C, msg: &Message) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        match InboundMessage::from_privmsg(msg) {
            Ok(inbound) => {
                let replies = self.dispatcher.handle_inbound_message(&inbound);
                for reply in &replies {
                    self.send_reply(conn, reply).await?;
                }
            }
            Err(ProtocolError::MissingParams { .. }) => {
                if let Some(sender) = msg.source_nick() {
                    self.send_reply(conn, &Reply::notice(sender.as_str(), TRY_HELP_TEXT))
                        .await?;
                }
            }
            Err(e) => tracing::debug!(error = %e, "ignoring PRIVMSG"),
        }
        Ok(())
    }

    async fn send<C>(&self, conn: &C, msg: &Message) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        let line = self.codec.encode(msg)?;
        if msg.command == command::AUTHENTICATE {
            tracing::trace!("send AUTHENTICATE <redacted>");
        } else {
            tracing::trace!(%line, "send");
        }
        conn.send_line(&line).await?;
        Ok(())
    }

    /// Sends a reply. A reply that can't be encoded is logged and dropped.
    async fn send_reply<C>(&self, conn: &C, reply: &Reply) -> Result<(), GamerbotError>
    where
        C: Connection<Error = TransportError>,
    {
        match self.send(conn, &reply.to_message()).await {
            Err(GamerbotError::Protocol(e)) => {
                tracing::warn!(to = reply.target(), error = %e, "dropping reply");
                Ok(())
            }
            other => other,
        }
    }

    /// Leaves every channel, quits, waits for the server to flush, closes.
    async fn quit<C>(&self, conn: &C)
    where
        C: Connection<Error = TransportError>,
    {
        for channel in self.config.joinable_channels() {
            if let Err(e) = self.send(conn, &Message::part(channel, PART_REASON)).await {
                tracing::debug!(%channel, error = %e, "part failed");
            }
        }
        if let Err(e) = self.send(conn, &Message::quit(QUIT_REASON)).await {
            tracing::debug!(error = %e, "quit failed");
        }

        tokio::time::sleep(self.config.quit_delay()).await;

        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "close failed");
        }
    }
}
