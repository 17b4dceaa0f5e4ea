//! Error type shared by the content client, the fallback store and the query
//! controllers.

use thiserror::Error;

/// Failures surfaced by content operations.
///
/// Reads only ever fail with [`ContentError::Fetch`], [`ContentError::NotFound`]
/// or [`ContentError::CategoryNotFound`]; writes fail with
/// [`ContentError::Subscription`] or [`ContentError::Submission`]. Both kinds
/// may fail early with [`ContentError::Validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Contact form submission failed: {0}")]
    Submission(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ContentError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<url::ParseError> for ContentError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_underlying_message() {
        let err = ContentError::fetch("HTTP error! status: 502");
        assert_eq!(err.to_string(), "Fetch failed: HTTP error! status: 502");
    }
}
