//! Integration tests for command dispatch, sessions, and the guessing game.

use gamerbot::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

const BOT: &str = "gamerbot";

/// A catalog whose guessing game always picks 50.
fn fixed_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register("guess", || GuessingGame::with_secret(50))
        .expect("register guess");
    catalog
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(BOT, fixed_catalog())
}

/// Sends `text` to the bot directly from `sender`.
fn direct(d: &mut Dispatcher, sender: &str, text: &str) -> Vec<Reply> {
    d.handle_inbound_message(&InboundMessage::new(BOT, sender, text))
}

/// Says `text` in `#games` as `sender`.
fn channel(d: &mut Dispatcher, sender: &str, text: &str) -> Vec<Reply> {
    d.handle_inbound_message(&InboundMessage::new("#games", sender, text))
}

fn texts(replies: &[Reply]) -> Vec<&str> {
    replies.iter().map(Reply::text).collect()
}

/// A game whose every turn panics.
struct Exploding {
    active: bool,
}

impl Game for Exploding {
    fn id(&self) -> &str {
        "boom"
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn start(&mut self, player: &Nick) -> Vec<Reply> {
        self.active = true;
        vec![Reply::privmsg(player.as_str(), "ready")]
    }
    fn stop(&mut self, _player: &Nick) -> Vec<Reply> {
        self.active = false;
        Vec::new()
    }
    fn play(&mut self, _player: &Nick, _args: &[String]) -> Vec<Reply> {
        panic!("game state corrupted");
    }
}

// =========================================================================
// Addressing
// =========================================================================

#[test]
fn test_channel_message_without_prefix_is_ignored() {
    let mut d = dispatcher();

    assert!(channel(&mut d, "alice", "hello").is_empty());
    assert!(channel(&mut d, "alice", "play guess").is_empty());
    assert!(!d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_direct_message_without_prefix_is_handled() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", "games");

    assert_eq!(replies, vec![Reply::privmsg("alice", "Available games: guess.")]);
}

#[test]
fn test_channel_reply_goes_to_channel() {
    let mut d = dispatcher();

    let replies = channel(&mut d, "alice", ".games");

    assert_eq!(replies, vec![Reply::privmsg("#games", "Available games: guess.")]);
}

#[test]
fn test_empty_direct_message_gets_help() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", "");

    assert_eq!(
        replies,
        vec![Reply::privmsg(
            "alice",
            "If you want to play a game, say '.play <game>'."
        )]
    );
}

#[test]
fn test_commands_are_case_insensitive() {
    let mut d = dispatcher();

    let replies = channel(&mut d, "alice", ".GAMES");

    assert_eq!(texts(&replies), vec!["Available games: guess."]);
}

// =========================================================================
// Built-in commands
// =========================================================================

#[test]
fn test_hello_matches_by_prefix() {
    let mut d = dispatcher();

    for text in [".hello", ".hellooo", "Hello", ".hello there"] {
        let replies = direct(&mut d, "alice", text);
        assert_eq!(
            replies,
            vec![Reply::privmsg("alice", "Hi alice! Want to play a game?")],
            "for {text:?}"
        );
    }
}

#[test]
fn test_yea_and_yes_ask_for_a_game() {
    let mut d = dispatcher();

    for text in [".yea", "yes"] {
        assert_eq!(
            texts(&direct(&mut d, "alice", text)),
            vec!["What game do you want to play? '.play <game>'."]
        );
    }
}

#[test]
fn test_playing_before_play_reports_not_playing() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", ".playing");

    assert_eq!(
        replies,
        vec![Reply::privmsg(
            "alice",
            "You're not playing a game. Start one by saying '.play <game>'."
        )]
    );
}

#[test]
fn test_playing_names_the_running_game() {
    let mut d = dispatcher();
    direct(&mut d, "alice", ".play guess");

    let replies = channel(&mut d, "alice", ".playing");

    assert_eq!(replies, vec![Reply::privmsg("#games", "You're playing guess.")]);
}

#[test]
fn test_unknown_command_without_session_suggests_help() {
    let mut d = dispatcher();

    let replies = channel(&mut d, "alice", ".dance");

    assert_eq!(replies, vec![Reply::notice("#games", "Try '.help' instead.")]);
}

// =========================================================================
// Start-Game
// =========================================================================

#[test]
fn test_play_guess_starts_session() {
    let mut d = dispatcher();

    let replies = channel(&mut d, "alice", ".play guess");

    assert_eq!(
        replies,
        vec![Reply::privmsg(
            "alice",
            "Guess a number between 1-100, you have 6 tries"
        )]
    );
    assert!(d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_play_while_playing_is_rejected_and_keeps_game() {
    let mut d = dispatcher();
    direct(&mut d, "alice", ".play guess");
    direct(&mut d, "alice", "60");

    let replies = direct(&mut d, "alice", ".play guess");

    assert_eq!(
        replies,
        vec![Reply::notice(
            "alice",
            "You're already playing a game. Please stop your current game first."
        )]
    );
    // The running round kept its state: one try used.
    let replies = direct(&mut d, "alice", "50");
    assert_eq!(
        texts(&replies),
        vec!["You got it! The number was 50! You guessed the number in 2 tries."]
    );
}

#[test]
fn test_play_without_game_name_sends_two_notices() {
    let mut d = dispatcher();

    let replies = channel(&mut d, "alice", ".play");

    assert_eq!(
        replies,
        vec![
            Reply::notice("alice", "I need to know what game you want to play."),
            Reply::notice("alice", "Use the 'games' command to see what I have."),
        ]
    );
    assert!(!d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_play_with_two_names_is_rejected() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", "play guess guess");

    assert_eq!(replies.len(), 2);
    assert!(!d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_play_unknown_game_points_to_games() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", "play chess");

    assert_eq!(
        replies,
        vec![Reply::notice("alice", "Use the 'games' command to see what I have.")]
    );
    assert!(d.sessions().is_empty());
}

#[test]
fn test_play_game_name_is_case_sensitive() {
    let mut d = dispatcher();

    direct(&mut d, "alice", "play GUESS");

    assert!(!d.sessions().has_active(&Nick::new("alice")));
}

// =========================================================================
// Stop-Game
// =========================================================================

#[test]
fn test_stop_without_session() {
    let mut d = dispatcher();

    let replies = direct(&mut d, "alice", ".stop y");

    assert_eq!(
        replies,
        vec![Reply::notice("alice", "You're not playing a game right now.")]
    );
}

#[test]
fn test_stop_asks_for_confirmation() {
    let mut d = dispatcher();
    direct(&mut d, "alice", ".play guess");

    let replies = direct(&mut d, "alice", ".stop");

    assert_eq!(
        replies,
        vec![Reply::notice(
            "alice",
            "Are you sure you want to stop the game? Say '.stop y'."
        )]
    );
    assert!(d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_stop_confirmed_ends_session() {
    for answer in ["y", "yes", "Y", "YES"] {
        let mut d = dispatcher();
        direct(&mut d, "alice", ".play guess");

        let replies = channel(&mut d, "alice", &format!(".stop {answer}"));

        assert_eq!(
            replies,
            vec![Reply::notice("alice", "I was just beginning to have fun...")],
            "for {answer:?}"
        );
        assert!(!d.sessions().has_active(&Nick::new("alice")));
    }
}

#[test]
fn test_stop_with_other_answer_is_silent() {
    let mut d = dispatcher();
    direct(&mut d, "alice", ".play guess");

    assert!(direct(&mut d, "alice", ".stop nah").is_empty());
    assert!(direct(&mut d, "alice", ".stop ").is_empty());
    assert!(d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_play_again_after_stop() {
    let mut d = dispatcher();
    direct(&mut d, "alice", ".play guess");
    direct(&mut d, "alice", ".stop y");

    let replies = direct(&mut d, "alice", ".play guess");

    assert_eq!(
        texts(&replies),
        vec!["Guess a number between 1-100, you have 6 tries"]
    );
}

// =========================================================================
// Playing the guessing game through the dispatcher
// =========================================================================

#[test]
fn test_full_game_win_in_channel() {
    let mut d = dispatcher();
    channel(&mut d, "alice", ".play guess");

    let high = channel(&mut d, "alice", ".75");
    let low = channel(&mut d, "alice", ".25");
    let win = channel(&mut d, "alice", ".50");

    // Game replies always go to the player, not the channel.
    assert_eq!(
        high,
        vec![Reply::privmsg("alice", "75 is too high, you have 5 tries left")]
    );
    assert_eq!(
        low,
        vec![Reply::privmsg("alice", "25 is too low, you have 4 tries left")]
    );
    assert_eq!(
        win,
        vec![Reply::privmsg(
            "alice",
            "You got it! The number was 50! You guessed the number in 3 tries."
        )]
    );
    assert!(!d.sessions().has_active(&Nick::new("alice")));
}

#[test]
fn test_full_game_loss_reports_signed_distance() {
    let mut d = dispatcher();
    direct(&mut d, "alice", "play guess");
    for guess in ["10", "20", "30", "40", "90"] {
        direct(&mut d, "alice", guess);
    }

    let replies = direct(&mut d, "alice", "53");

    assert_eq!(
        texts(&replies),
        vec!["You ran out of tries. The number was 50. You were 3 off."]
    );
    assert!(!d.sessions().has_active(&Nick::new("alice")));
    assert_eq!(
        texts(&direct(&mut d, "alice", "53")),
        vec!["Try '.help' instead."]
    );
}

#[test]
fn test_invalid_guesses_do_not_use_tries() {
    let mut d = dispatcher();
    direct(&mut d, "alice", "play guess");

    let out_of_range = direct(&mut d, "alice", "101");
    let not_a_number = direct(&mut d, "alice", "banana");
    let too_many = direct(&mut d, "alice", "1 2");
    let next = direct(&mut d, "alice", "99");

    assert_eq!(
        texts(&out_of_range),
        vec!["That's not a number between 1 and 100 now is it..."]
    );
    assert_eq!(
        texts(&not_a_number),
        vec!["That's not a number between 1 and 100 now is it..."]
    );
    assert_eq!(texts(&too_many), vec!["Just give me your guess please."]);
    assert_eq!(texts(&next), vec!["99 is too high, you have 5 tries left"]);
}

#[test]
fn test_players_are_independent() {
    let mut d = dispatcher();
    direct(&mut d, "alice", "play guess");

    let bob = direct(&mut d, "bob", "50");
    let alice = direct(&mut d, "alice", "50");

    assert_eq!(texts(&bob), vec!["Try '.help' instead."]);
    assert!(texts(&alice)[0].starts_with("You got it!"));
}

#[test]
fn test_built_in_commands_are_not_forwarded_to_game() {
    let mut d = dispatcher();
    direct(&mut d, "alice", "play guess");

    direct(&mut d, "alice", "help");
    direct(&mut d, "alice", "games");
    let replies = direct(&mut d, "alice", "10");

    assert_eq!(texts(&replies), vec!["10 is too low, you have 5 tries left"]);
}

#[test]
fn test_standard_catalog_game_plays_to_completion() {
    let mut d = Dispatcher::new(BOT, Catalog::standard());
    direct(&mut d, "alice", "play guess");

    let mut outcome = None;
    for guess in 1..=6 {
        let replies = direct(&mut d, "alice", &guess.to_string());
        if !d.sessions().has_active(&Nick::new("alice")) {
            outcome = Some(texts(&replies)[0].to_string());
            break;
        }
    }

    // Either a lucky win or a loss after six tries; both end the session.
    let outcome = outcome.expect("game should end within six guesses");
    assert!(
        outcome.starts_with("You got it!") || outcome.starts_with("You ran out of tries."),
        "unexpected outcome {outcome:?}"
    );
}

// =========================================================================
// Nick changes and failure isolation
// =========================================================================

#[test]
fn test_direct_messages_follow_nick_change() {
    let mut d = dispatcher();
    d.set_nick("gamerbot^");

    let replies = d.handle_inbound_message(&InboundMessage::new("gamerbot^", "alice", "games"));

    assert_eq!(replies, vec![Reply::privmsg("alice", "Available games: guess.")]);
}

#[test]
fn test_panicking_game_loses_session_and_bot_survives() {
    let mut catalog = fixed_catalog();
    catalog
        .register("boom", || Exploding { active: false })
        .expect("register boom");
    let mut d = Dispatcher::new(BOT, catalog);
    direct(&mut d, "alice", "play boom");
    direct(&mut d, "bob", "play guess");

    let replies = direct(&mut d, "alice", "anything");

    assert!(replies.is_empty());
    assert!(!d.sessions().has_active(&Nick::new("alice")));
    // Other players and later messages are unaffected.
    assert!(d.sessions().has_active(&Nick::new("bob")));
    assert_eq!(
        texts(&direct(&mut d, "bob", "50"))[0],
        "You got it! The number was 50! You guessed the number in 1 tries."
    );
    assert_eq!(
        texts(&direct(&mut d, "alice", "play guess")),
        vec!["Guess a number between 1-100, you have 6 tries"]
    );
}
