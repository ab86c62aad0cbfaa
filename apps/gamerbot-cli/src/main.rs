//! Binary entrypoint for gamerbot.
//!
//! Connects to an IRC server, joins the configured channels and serves
//! games until interrupted (Ctrl-C or SIGTERM), then leaves politely.

use std::path::PathBuf;

use clap::Parser;
use gamerbot::prelude::*;
use gamerbot::{logging, parse_channel_list};

#[derive(Parser, Debug)]
#[command(name = "gamerbot")]
#[command(about = "An IRC bot that hosts small text games")]
#[command(version)]
struct Cli {
    /// JSON config file. Flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// IRC server
    #[arg(short, long)]
    server: Option<String>,

    /// IRC port
    #[arg(short, long)]
    port: Option<u16>,

    /// IRC nick
    #[arg(short, long)]
    nick: Option<String>,

    /// Comma separated list of channels to join
    #[arg(short, long)]
    channels: Option<String>,

    /// Connect over WebSocket at this path (e.g. /irc) instead of plain TCP
    #[arg(long = "ws", value_name = "PATH")]
    websocket_path: Option<String>,

    /// Use TLS
    #[arg(long)]
    tls: bool,

    /// Ignore TLS cert errors
    #[arg(long)]
    insecure: bool,

    /// Use SASL authentication, forces TLS
    #[arg(long)]
    sasl: bool,

    /// SASL username if different from nick
    #[arg(long = "sasluser", value_name = "USER")]
    sasl_user: Option<String>,

    /// SASL password
    #[arg(long = "saslpass", value_name = "PASS")]
    sasl_pass: Option<String>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Enable extra debug output, including every protocol line
    #[arg(long)]
    debug2: bool,
}

impl Cli {
    /// Loads the config file, if any, and applies the flags on top.
    fn into_config(self) -> Result<BotConfig, GamerbotError> {
        let mut config = match &self.config {
            Some(path) => BotConfig::from_json_file(path)?,
            None => BotConfig::default(),
        };

        if let Some(server) = self.server {
            config.server = server;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(nick) = self.nick {
            config.nick = Nick::new(nick);
        }
        if let Some(channels) = self.channels {
            config.channels = parse_channel_list(&channels);
        }
        if self.websocket_path.is_some() {
            config.websocket_path = self.websocket_path;
        }
        config.tls |= self.tls;
        config.insecure |= self.insecure;
        config.sasl |= self.sasl;
        if self.sasl_user.is_some() {
            config.sasl_user = self.sasl_user;
        }
        if self.sasl_pass.is_some() {
            config.sasl_pass = self.sasl_pass;
        }
        config.debug |= self.debug || self.debug2;
        config.debug2 |= self.debug2;

        config.validate()?;
        Ok(config)
    }
}

/// Resolves on the first Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init(config.debug, config.debug2);
    logging::install_panic_hook();

    tracing::info!(
        server = %config.address(),
        nick = %config.nick,
        channels = ?config.channels,
        websocket = config.websocket_path.is_some(),
        tls = config.use_tls(),
        sasl = config.sasl,
        "starting gamerbot v{}",
        env!("CARGO_PKG_VERSION")
    );

    let bot = Bot::builder()
        .config(config)
        .catalog(Catalog::standard())
        .build()?;
    bot.connect_and_run(shutdown_signal()).await?;

    tracing::info!("disconnected");
    Ok(())
}
