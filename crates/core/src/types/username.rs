//! Username type.
//!
//! Usernames are the unique key of the user table, appear in URLs and
//! logs, and therefore have a deliberately narrow alphabet.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9_-]`.
    #[error("username may only contain lowercase letters, digits, '_' and '-'")]
    InvalidCharacter,
}

/// A validated username.
///
/// ## Constraints
///
/// - Length: 3-32 characters
/// - Alphabet: lowercase ASCII letters, digits, `_`, `-`
///
/// Uppercase input is lowered before validation so that `Alice` and
/// `alice` name the same account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum username length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum username length.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string, lowercasing it first.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is outside the length bounds or
    /// contains a character outside `[a-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let normalized = s.trim().to_lowercase();

        if normalized.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if normalized.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
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
    fn test_parse_valid() {
        assert!(Username::parse("admin").is_ok());
        assert!(Username::parse("demo-shopper").is_ok());
        assert!(Username::parse("user_42").is_ok());
    }

    #[test]
    fn test_parse_lowercases() {
        let u = Username::parse("Alice").unwrap();
        assert_eq!(u.as_str(), "alice");
    }

    #[test]
    fn test_parse_trims() {
        let u = Username::parse("  carol  ").unwrap();
        assert_eq!(u.as_str(), "carol");
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Username::parse(&"a".repeat(33)),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        assert!(matches!(
            Username::parse("bob smith"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("bob@home"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("../admin"),
            Err(UsernameError::InvalidCharacter)
        ));
    }
}
