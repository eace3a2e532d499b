//! Typed wrappers for BDD step parameters.
//!
//! Scenarios write counts as words ("no", "three") or digits; `Count` accepts
//! both so step functions receive a plain `usize`.

use shelfcheck::transforms::{TransformError, capture_integer};
use std::{fmt, str::FromStr};

/// Non-negative count captured from scenario text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(usize);

impl Count {
    /// The captured value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl FromStr for Count {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = capture_integer(s)?;
        usize::try_from(value)
            .map(Self)
            .map_err(|_| TransformError::NotACount { text: s.to_owned() })
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("no", 0)]
    #[case("three", 3)]
    #[case("12", 12)]
    fn counts_parse_from_words_and_digits(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(text.parse::<Count>().map(Count::get), Ok(expected));
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        assert!("-1".parse::<Count>().is_err());
    }
}
