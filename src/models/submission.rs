use serde::{Deserialize, Serialize};

use crate::domain::EmailAddress;
use crate::error::ContentError;

/// Body of a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: EmailAddress,
    pub message: String,
}

impl ContactMessage {
    /// Validates all three fields before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Validation`] when the name or message is blank
    /// or the email address is malformed.
    pub fn new(name: &str, email: &str, message: &str) -> Result<Self, ContentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContentError::validation("Name is required"));
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(ContentError::validation("Message is required"));
        }

        Ok(Self {
            name: name.to_string(),
            email: EmailAddress::parse(email)?,
            message: message.to_string(),
        })
    }
}

/// Acknowledgment returned by the newsletter and contact endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
