//! Command line parsing: turning message text into a command and arguments.

/// Character that marks a word as a bot command.
pub const COMMAND_PREFIX: char = '.';

/// The canonical command used for empty input.
pub const HELP_COMMAND: &str = ".help";

/// A message's text, split into a canonical command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased, always starts with [`COMMAND_PREFIX`].
    pub command: String,
    /// The remaining words, in order. May contain empty strings.
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Parses `text` said to `target`.
    ///
    /// Returns `None` when the message must be ignored: in a channel the
    /// bot only answers words that start with the command prefix, while
    /// direct messages need no prefix.
    pub fn parse(text: &str, in_channel: bool) -> Option<Self> {
        let mut tokens = split_words(text).into_iter();
        // `split_words` always yields at least one token.
        let first = tokens.next().unwrap_or_default();

        if in_channel && !first.starts_with(COMMAND_PREFIX) {
            return None;
        }

        Some(Self {
            command: canonicalize(&first),
            args: tokens.collect(),
        })
    }

    /// The command followed by its arguments, as handed to a game turn.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(self.command.clone());
        tokens.extend(self.args.iter().cloned());
        tokens
    }
}

/// Splits on every single space. Runs of spaces produce empty words; no
/// quoting or escaping is recognised.
pub fn split_words(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_string).collect()
}

/// Lower-cases a command word and makes sure it carries the prefix.
/// An empty word becomes [`HELP_COMMAND`].
pub fn canonicalize(word: &str) -> String {
    let word = word.to_lowercase();
    if word.is_empty() {
        HELP_COMMAND.to_string()
    } else if word.starts_with(COMMAND_PREFIX) {
        word
    } else {
        format!("{COMMAND_PREFIX}{word}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_keeps_empty_tokens() {
        assert_eq!(split_words("play  guess"), vec!["play", "", "guess"]);
        assert_eq!(split_words(""), vec![""]);
        assert_eq!(split_words(".stop "), vec![".stop", ""]);
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("PLAY"), ".play");
        assert_eq!(canonicalize(".Games"), ".games");
        assert_eq!(canonicalize(""), ".help");
        assert_eq!(canonicalize("42"), ".42");
    }

    #[test]
    fn test_parse_direct_message_without_prefix() {
        let parsed = ParsedCommand::parse("play guess", false).unwrap();
        assert_eq!(parsed.command, ".play");
        assert_eq!(parsed.args, vec!["guess"]);
    }

    #[test]
    fn test_parse_channel_message_without_prefix_is_ignored() {
        assert_eq!(ParsedCommand::parse("hello", true), None);
        assert_eq!(ParsedCommand::parse("", true), None);
        assert_eq!(ParsedCommand::parse(" .play guess", true), None);
    }

    #[test]
    fn test_parse_channel_message_with_prefix() {
        let parsed = ParsedCommand::parse(".PLAY guess", true).unwrap();
        assert_eq!(parsed.command, ".play");
        assert_eq!(parsed.args, vec!["guess"]);
    }

    #[test]
    fn test_parse_empty_direct_message_is_help() {
        let parsed = ParsedCommand::parse("", false).unwrap();
        assert_eq!(parsed.command, ".help");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_parse_extra_argument_is_kept() {
        let parsed = ParsedCommand::parse("play guess extra", false).unwrap();
        assert_eq!(parsed.args, vec!["guess", "extra"]);
    }

    #[test]
    fn test_parse_args_keep_their_case() {
        let parsed = ParsedCommand::parse(".play GUESS", false).unwrap();
        assert_eq!(parsed.args, vec!["GUESS"]);
    }

    #[test]
    fn test_tokens_puts_command_first() {
        let parsed = ParsedCommand::parse("42", false).unwrap();
        assert_eq!(parsed.tokens(), vec![".42"]);
    }
}
