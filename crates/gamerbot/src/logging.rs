//! Log output setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::dispatcher::panic_reason;

/// Crates whose level follows the debug flags. Everything else logs at info.
const BOT_CRATES: &[&str] = &[
    "gamerbot",
    "gamerbot_transport",
    "gamerbot_protocol",
    "gamerbot_session",
    "gamerbot_games",
];

/// The filter used when `RUST_LOG` is not set.
///
/// `debug2` turns on raw line tracing and implies `debug`.
pub fn default_directives(debug: bool, debug2: bool) -> String {
    let level = if debug2 {
        "trace"
    } else if debug {
        "debug"
    } else {
        "info"
    };

    let mut directives = String::from("info");
    for krate in BOT_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the flags.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(debug: bool, debug2: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(debug, debug2).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Sends panic reports to the log instead of straight to stderr.
///
/// Game panics are recovered by the dispatcher, so a report is an error
/// line in the log stream rather than the end of the process.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let reason = panic_reason(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");

        tracing::error!(%reason, %location, %thread, "panicked");
    }));
}
