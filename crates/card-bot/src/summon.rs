//! Summon token extraction

#[cfg(test)]
#[path = "summon_tests.rs"]
mod summon_tests;

use once_cell::sync::Lazy;
use regex::Regex;

static SUMMON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

/// At most this many tokens are looked up per event, in appearance order.
pub const SUMMON_LIMIT: usize = 5;

/// All unique tokens found enclosed by `{{ }}` in order of appearance,
/// with surrounding whitespace stripped, blanks dropped, and
/// case-insensitive repeats collapsed. Capped at [`SUMMON_LIMIT`].
pub fn parse_summons(text: &str) -> Vec<String> {
    let mut summons = Vec::new();
    for capture in SUMMON_REGEX.captures_iter(text) {
        let token = capture[1].trim().to_lowercase();
        if token.is_empty() || summons.contains(&token) {
            continue;
        }
        summons.push(token);
        if summons.len() == SUMMON_LIMIT {
            break;
        }
    }
    summons
}
