//! Game configuration.

/// Settings for the number guessing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessConfig {
    /// Guesses allowed per round.
    pub max_tries: u32,

    /// Smallest number that can be drawn or guessed.
    pub min: i64,

    /// Largest number that can be drawn or guessed.
    pub max: i64,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            max_tries: 6,
            min: 1,
            max: 100,
        }
    }
}

impl GuessConfig {
    /// Returns `true` if `n` is a valid guess.
    pub fn in_range(&self, n: i64) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_config_default() {
        let config = GuessConfig::default();
        assert_eq!(config.max_tries, 6);
        assert_eq!(config.min, 1);
        assert_eq!(config.max, 100);
    }

    #[test]
    fn test_guess_config_in_range_is_inclusive() {
        let config = GuessConfig::default();
        assert!(config.in_range(1));
        assert!(config.in_range(100));
        assert!(!config.in_range(0));
        assert!(!config.in_range(101));
    }
}
