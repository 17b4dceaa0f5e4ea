//! Newsletter and contact form submissions.
//!
//! Writes are never answered from bundled content: a failure is reported as
//! is and recorded in the form state.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::ContentError;
use crate::models::SubmissionReceipt;
use crate::source::ContentSource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionState {
    pub loading: bool,
    pub error: Option<String>,
    /// Set only after the server acknowledged the submission.
    pub success: bool,
    /// Server message from the last acknowledgment.
    pub message: Option<String>,
}

#[derive(Default)]
struct FormState {
    state: Mutex<SubmissionState>,
}

impl FormState {
    async fn run<F>(&self, form: &'static str, submit: F) -> Result<SubmissionReceipt, ContentError>
    where
        F: Future<Output = Result<SubmissionReceipt, ContentError>>,
    {
        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.error = None;
            state.success = false;
        }

        let result = submit.await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match &result {
            Ok(receipt) => {
                info!(form, "Submission acknowledged");
                state.success = receipt.success;
                state.message = Some(receipt.message.clone()).filter(|m| !m.is_empty());
            }
            Err(e) => {
                warn!(form, error = %e, "Submission failed");
                state.success = false;
                state.message = None;
                state.error = Some(e.to_string());
            }
        }
        result
    }

    async fn snapshot(&self) -> SubmissionState {
        self.state.lock().await.clone()
    }

    async fn reset(&self) {
        *self.state.lock().await = SubmissionState::default();
    }
}

pub struct NewsletterSignup {
    source: Arc<dyn ContentSource>,
    form: FormState,
}

impl NewsletterSignup {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            form: FormState::default(),
        }
    }

    /// # Errors
    ///
    /// Passes through the error from [`ContentSource::subscribe`] after
    /// recording it in the form state.
    pub async fn subscribe(&self, email: &str) -> Result<SubmissionReceipt, ContentError> {
        self.form.run("newsletter", self.source.subscribe(email)).await
    }

    pub async fn state(&self) -> SubmissionState {
        self.form.snapshot().await
    }

    pub async fn reset(&self) {
        self.form.reset().await;
    }
}

pub struct ContactForm {
    source: Arc<dyn ContentSource>,
    form: FormState,
}

impl ContactForm {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            form: FormState::default(),
        }
    }

    /// # Errors
    ///
    /// Passes through the error from [`ContentSource::submit_contact`] after
    /// recording it in the form state.
    pub async fn submit(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<SubmissionReceipt, ContentError> {
        self.form
            .run("contact", self.source.submit_contact(name, email, message))
            .await
    }

    pub async fn state(&self) -> SubmissionState {
        self.form.snapshot().await
    }

    pub async fn reset(&self) {
        self.form.reset().await;
    }
}
