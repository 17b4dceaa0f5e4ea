//! Domain primitives for blog content with strong typing.
//!
//! Newtype wrappers keep WordPress post ids and term ids from being mixed up,
//! and `EmailAddress` can only be built from input that passed validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::ContentError;

/// Identifier of a WordPress post.
///
/// # Examples
///
/// ```rust
/// use hubfeed::domain::PostId;
///
/// let id = PostId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PostId(u64);

impl PostId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl Serialize for PostId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Identifier of a WordPress category term.
///
/// This is the value sent as `categories=` when filtering posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CategoryId(u64);

impl CategoryId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CategoryId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl Serialize for CategoryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

fn email_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"))
}

/// An email address that passed the signup form's syntax check.
///
/// ```rust
/// use hubfeed::domain::EmailAddress;
///
/// assert!(EmailAddress::parse("reader@example.com").is_ok());
/// assert!(EmailAddress::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validates and wraps `input` after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Validation`] for an empty or malformed address.
    pub fn parse(input: &str) -> Result<Self, ContentError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ContentError::validation("Email address is required"));
        }

        if !email_regex().is_match(trimmed) {
            return Err(ContentError::validation(format!(
                "Invalid email address: {trimmed}"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
