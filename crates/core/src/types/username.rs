//! Login name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Nothing left after trimming.
    #[error("username cannot be empty")]
    Empty,
    /// Longer than [`Username::MAX_LENGTH`] characters.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains whitespace or a control character.
    #[error("username cannot contain {0:?}")]
    InvalidCharacter(char),
}

/// A unique login name.
///
/// Leading and trailing whitespace is dropped; the rest is kept verbatim, so
/// comparisons are case-sensitive (`Admin` and `admin` are different users).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from user input.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameError`] if the trimmed input is empty, too long, or
    /// contains whitespace/control characters.
    pub fn parse(input: &str) -> Result<Self, UsernameError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(c) = s.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(UsernameError::InvalidCharacter(c));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_but_keeps_case() {
        let name = Username::parse("  Admin ").unwrap();
        assert_eq!(name.as_str(), "Admin");
        assert_ne!(name, Username::parse("admin").unwrap());
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        assert_eq!(Username::parse(" \t "), Err(UsernameError::Empty));
        assert_eq!(
            Username::parse("jo smith"),
            Err(UsernameError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_parse_length_is_counted_in_chars() {
        assert!(Username::parse(&"é".repeat(Username::MAX_LENGTH)).is_ok());
        assert_eq!(
            Username::parse(&"x".repeat(Username::MAX_LENGTH + 1)),
            Err(UsernameError::TooLong {
                max: Username::MAX_LENGTH
            })
        );
    }
}
