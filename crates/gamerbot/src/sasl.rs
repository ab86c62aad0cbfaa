//! SASL PLAIN helpers for capability negotiation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// The capability requested before registration.
pub(crate) const CAPABILITY: &str = "sasl";
pub(crate) const MECHANISM: &str = "PLAIN";

/// Longest `AUTHENTICATE` argument a server accepts in one line.
const CHUNK_LEN: usize = 400;

/// Where the bot is in the SASL exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaslState {
    /// SASL is not in use or has finished, successfully or not.
    Idle,
    /// `CAP REQ` sent, waiting for `ACK` or `NAK`.
    Requested,
    /// `AUTHENTICATE PLAIN` sent, waiting for the server's `+`.
    Authenticating,
    /// Credentials sent, waiting for the outcome numeric.
    Sent,
}

impl SaslState {
    /// True until the outcome is known and `CAP END` has gone out.
    pub(crate) fn in_progress(self) -> bool {
        self != Self::Idle
    }
}

/// Base64 of `login \0 login \0 password`, the authorization identity
/// being the same as the login.
pub(crate) fn plain_payload(login: &str, password: &str) -> String {
    STANDARD.encode(format!("{login}\0{login}\0{password}"))
}

/// Splits an encoded payload into `AUTHENTICATE` arguments.
///
/// A payload that fills its last chunk exactly is followed by `+` so the
/// server knows nothing more is coming.
pub(crate) fn authenticate_args(payload: &str) -> Vec<&str> {
    let mut args: Vec<&str> = payload
        .as_bytes()
        .chunks(CHUNK_LEN)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();
    if payload.len() % CHUNK_LEN == 0 {
        args.push("+");
    }
    args
}
