//! The number guessing game.

use gamerbot_protocol::{Nick, Reply};
use rand::Rng;

use crate::{Game, GuessConfig};

/// Catalog id of the guessing game.
pub const GUESS_ID: &str = "guess";

/// Guesses may be typed with the command prefix (`.42`) because the
/// dispatcher forwards unknown commands in canonical form.
const COMMAND_PREFIX: char = '.';

/// State of one running round.
#[derive(Debug, Clone, Copy)]
struct Round {
    secret: i64,
    tries_left: u32,
}

/// Guess a secret number within a limited number of tries.
#[derive(Debug, Clone)]
pub struct GuessingGame {
    config: GuessConfig,
    round: Option<Round>,
    /// When set, every round uses this secret instead of a random one.
    fixed_secret: Option<i64>,
}

impl GuessingGame {
    /// Creates an idle game with the default rules (1–100, six tries).
    pub fn new() -> Self {
        Self::with_config(GuessConfig::default())
    }

    pub fn with_config(config: GuessConfig) -> Self {
        Self {
            config,
            round: None,
            fixed_secret: None,
        }
    }

    /// Creates a game whose rounds always use `secret`.
    ///
    /// Meant for tests and demos where the outcome must be predictable.
    pub fn with_secret(secret: i64) -> Self {
        Self {
            fixed_secret: Some(secret),
            ..Self::new()
        }
    }

    /// The number to guess, while a round is running.
    pub fn secret(&self) -> Option<i64> {
        self.round.map(|r| r.secret)
    }

    /// Tries left in the running round, or 0 when idle.
    pub fn tries_left(&self) -> u32 {
        self.round.map_or(0, |r| r.tries_left)
    }

    fn draw_secret(&self) -> i64 {
        self.fixed_secret.unwrap_or_else(|| {
            rand::rng().random_range(self.config.min..=self.config.max)
        })
    }

    /// Parses a guess, accepting one leading command prefix.
    fn parse_guess(&self, arg: &str) -> Option<i64> {
        let arg = arg.strip_prefix(COMMAND_PREFIX).unwrap_or(arg);
        arg.parse::<i64>()
            .ok()
            .filter(|n| self.config.in_range(*n))
    }
}

impl Default for GuessingGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GuessingGame {
    fn id(&self) -> &str {
        GUESS_ID
    }

    fn is_active(&self) -> bool {
        self.round.is_some()
    }

    fn start(&mut self, player: &Nick) -> Vec<Reply> {
        let round = Round {
            secret: self.draw_secret(),
            tries_left: self.config.max_tries,
        };
        self.round = Some(round);
        tracing::debug!(%player, tries = round.tries_left, "guessing round started");

        vec![Reply::privmsg(
            player.as_str(),
            format!(
                "Guess a number between {}-{}, you have {} tries",
                self.config.min, self.config.max, self.config.max_tries
            ),
        )]
    }

    fn stop(&mut self, player: &Nick) -> Vec<Reply> {
        if self.round.take().is_some() {
            tracing::debug!(%player, "guessing round stopped");
        }
        Vec::new()
    }

    fn play(&mut self, player: &Nick, args: &[String]) -> Vec<Reply> {
        if self.round.is_none() {
            return Vec::new();
        }

        let [arg] = args else {
            return vec![Reply::privmsg(
                player.as_str(),
                "Just give me your guess please.",
            )];
        };

        let Some(guess) = self.parse_guess(arg) else {
            return vec![Reply::privmsg(
                player.as_str(),
                format!(
                    "That's not a number between {} and {} now is it...",
                    self.config.min, self.config.max
                ),
            )];
        };

        let Some(round) = self.round.as_mut() else {
            return Vec::new();
        };
        let secret = round.secret;
        round.tries_left = round.tries_left.saturating_sub(1);
        let tries_left = round.tries_left;

        if tries_left == 0 {
            let reply = Reply::privmsg(
                player.as_str(),
                format!(
                    "You ran out of tries. The number was {secret}. You were {} off.",
                    guess - secret
                ),
            );
            self.stop(player);
            return vec![reply];
        }

        if guess == secret {
            self.stop(player);
            return vec![Reply::privmsg(
                player.as_str(),
                format!(
                    "You got it! The number was {secret}! You guessed the number in {} tries.",
                    self.config.max_tries - tries_left
                ),
            )];
        }

        let direction = if guess > secret { "high" } else { "low" };
        vec![Reply::privmsg(
            player.as_str(),
            format!("{guess} is too {direction}, you have {tries_left} tries left"),
        )]
    }
}
