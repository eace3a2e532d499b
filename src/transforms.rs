//! Conversions from scenario wording to numbers.
//!
//! Scenarios say "three sample library items" or "no library items"; these
//! helpers turn such captures into integers so step definitions can work with
//! counts directly.

use thiserror::Error;

const NUMBER_WORDS: [&str; 11] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// Error returned when a capture is neither a known word nor a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The text is not a cardinal number.
    #[error("'{text}' is not a count")]
    NotACount {
        /// The rejected capture.
        text: String,
    },
}

/// Convert a cardinal capture into an integer.
///
/// Accepts `zero` through `ten`, `no` (meaning zero), and signed decimal
/// integers.
///
/// # Errors
///
/// Returns [`TransformError::NotACount`] for any other text.
///
/// # Examples
///
/// ```
/// use shelfcheck::transforms::capture_integer;
///
/// assert_eq!(capture_integer("three"), Ok(3));
/// assert_eq!(capture_integer("no"), Ok(0));
/// assert_eq!(capture_integer("-4"), Ok(-4));
/// assert!(capture_integer("several").is_err());
/// ```
pub fn capture_integer(text: &str) -> Result<i64, TransformError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("no") {
        return Ok(0);
    }
    if let Some(index) = word_index(&NUMBER_WORDS, trimmed) {
        return Ok(index);
    }
    trimmed.parse().map_err(|_| TransformError::NotACount {
        text: text.to_owned(),
    })
}

fn word_index(words: &[&str], text: &str) -> Option<i64> {
    words
        .iter()
        .position(|word| word.eq_ignore_ascii_case(text))
        .and_then(|index| i64::try_from(index).ok())
}
