//! Free-text parsing of coach messages.
//!
//! Keywords are matched on whole words after lowercasing and turning
//! punctuation into spaces, so "Two-Point!" and "two point" are the same call.

use crate::engine::check_number;
use crate::error::{GameError, Result};
use crate::models::{Action, PlayType, TimeOption};

const TIME_PHRASES: &[(&str, TimeOption)] = &[
    ("run out the clock", TimeOption::RunOutClock),
    ("run out clock", TimeOption::RunOutClock),
    ("chew the clock", TimeOption::Chew),
    ("chew clock", TimeOption::Chew),
    ("chew", TimeOption::Chew),
    ("hurry up", TimeOption::Hurry),
    ("hurry", TimeOption::Hurry),
];

fn normalize(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    let words: Vec<&str> = spaced.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

fn has_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&normalize(phrase))
}

impl TimeOption {
    /// Pick the time option out of a message, `Normal` when none is named
    pub fn from_text(text: &str) -> TimeOption {
        let normalized = normalize(text);
        TIME_PHRASES
            .iter()
            .find(|(phrase, _)| has_phrase(&normalized, phrase))
            .map(|(_, option)| *option)
            .unwrap_or_default()
    }
}

/// Find the single play legal for `action` named in `text`
pub fn parse_play(text: &str, action: Action) -> Result<PlayType> {
    let mut normalized = normalize(text);
    // "run out the clock" must not read as a run
    for (phrase, _) in TIME_PHRASES {
        normalized = normalized.replace(&normalize(phrase), " ");
    }

    let found: Vec<PlayType> = PlayType::ALL
        .into_iter()
        .filter(|play| play.action() == action)
        .filter(|play| play.keywords().iter().any(|kw| has_phrase(&normalized, kw)))
        .collect();

    match found.as_slice() {
        [] => Err(GameError::UnknownPlay(action)),
        [play] => Ok(*play),
        _ => Err(GameError::AmbiguousPlay(found)),
    }
}

/// First integer in `text`, validated against the legal call range
pub fn parse_number(text: &str) -> Result<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Err(GameError::MissingNumber);
    }
    let number = digits.parse::<u32>().map_err(|_| GameError::NumberOutOfRange(u32::MAX))?;
    check_number(number)
}

/// `Some(true)` for heads, `Some(false)` for tails
pub fn parse_coin_call(text: &str) -> Option<bool> {
    let normalized = normalize(text);
    match (has_phrase(&normalized, "heads"), has_phrase(&normalized, "tails")) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

/// `Some(true)` to defer, `Some(false)` to receive
pub fn parse_defer(text: &str) -> Option<bool> {
    let normalized = normalize(text);
    match (has_phrase(&normalized, "defer"), has_phrase(&normalized, "receive")) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}
