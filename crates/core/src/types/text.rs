//! Length-bounded text fields.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`ShortText`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The input has more characters than allowed.
    #[error("must be at most {max} characters (got {actual})")]
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
        /// Length of the rejected input in characters.
        actual: usize,
    },
}

/// A free-form string of at most [`ShortText::MAX_CHARS`] characters.
///
/// Length is counted in Unicode scalar values, not bytes, so `"café"` is
/// four characters long. Empty strings are accepted.
///
/// ```
/// use pantry_core::ShortText;
///
/// assert!(ShortText::parse("Milk").is_ok());
/// assert!(ShortText::parse(&"x".repeat(101)).is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShortText(String);

impl ShortText {
    /// Maximum number of characters.
    pub const MAX_CHARS: usize = 100;

    /// Parse a `ShortText` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::TooLong`] if the input exceeds
    /// [`ShortText::MAX_CHARS`] characters.
    pub fn parse(s: &str) -> Result<Self, TextError> {
        let actual = s.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(TextError::TooLong {
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Consumes the `ShortText` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
