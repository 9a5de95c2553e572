//! Signature form state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Success
//!                       │
//!                       └───────▶ Failed(reason, message)
//! ```
//!
//! `Success` and `Failed` are resting states; the next `submit()` starts a
//! new attempt from either of them.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use vible_core::signature::DEFAULT_RECENT_LIMIT;
use vible_core::wire::SubmitResponse;
use vible_core::{DisplaySource, PublicSignature, SignatureDraft, SignatureId};

use crate::api::{ClientError, SignatureApi};

/// Shown when the request never reached the API.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Signature count shown when the API is unreachable.
pub const PLACEHOLDER_TOTAL: usize = 42;

/// Why a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Rejected by local or server-side validation.
    Validation,
    /// The server saw this client sign recently.
    Duplicate,
    /// The request did not go through.
    Network,
    /// The server could not save the signature.
    Persistence,
}

impl FailureReason {
    /// Classify a client error.
    #[must_use]
    pub const fn from_error(error: &ClientError) -> Self {
        match error.status() {
            Some(400 | 422) => Self::Validation,
            Some(409) => Self::Duplicate,
            Some(500..) => Self::Persistence,
            _ => Self::Network,
        }
    }
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl SubmissionState {
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Errors returned by [`SubmissionFlow::submit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InProgress,

    #[error("{message}")]
    Failed {
        reason: FailureReason,
        message: String,
    },
}

/// The signature count and recent list on display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayData {
    pub total: usize,
    pub recent: Vec<PublicSignature>,
    pub source: DisplaySource,
}

impl DisplayData {
    /// Sample data shown while the API is unreachable.
    #[must_use]
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        let sample = |n: i64, name: &str, message: &str| PublicSignature {
            id: SignatureId::new(format!("placeholder-{}", n + 1)),
            name: name.to_string(),
            message: message.to_string(),
            timestamp: now - Duration::days(n),
        };

        Self {
            total: PLACEHOLDER_TOTAL,
            recent: vec![
                sample(0, "Sarah M.", "Love this vibe! ✨"),
                sample(1, "Alex K.", "Spreading goodwill everywhere!"),
                sample(2, "Maria L.", "The world needs more of this energy"),
            ],
            source: DisplaySource::Placeholder,
        }
    }
}

/// Drives the signature form against a [`SignatureApi`].
#[derive(Debug)]
pub struct SubmissionFlow<A> {
    api: A,
    form: Mutex<SignatureDraft>,
    state: watch::Sender<SubmissionState>,
    display: watch::Sender<DisplayData>,
}

impl<A: SignatureApi> SubmissionFlow<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: Mutex::new(SignatureDraft::default()),
            state: watch::Sender::new(SubmissionState::Idle),
            display: watch::Sender::new(DisplayData::default()),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn display(&self) -> DisplayData {
        self.display.borrow().clone()
    }

    #[must_use]
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayData> {
        self.display.subscribe()
    }

    /// A copy of the form fields.
    #[must_use]
    pub fn form(&self) -> SignatureDraft {
        self.form.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Edit the form fields.
    pub fn update_form(&self, edit: impl FnOnce(&mut SignatureDraft)) {
        edit(&mut self.form.lock().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.update_form(|form| form.name = name);
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update_form(|form| form.message = message);
    }

    /// Set the location; blank clears it.
    pub fn set_location(&self, location: impl Into<String>) {
        let location = non_blank(location.into());
        self.update_form(|form| form.location = location);
    }

    /// Set the email; blank clears it.
    pub fn set_email(&self, email: impl Into<String>) {
        let email = non_blank(email.into());
        self.update_form(|form| form.email = email);
    }

    /// Fetch the count and recent list, falling back to placeholder data
    /// if the API cannot be reached.
    pub async fn load(&self) -> DisplaySource {
        let data = match self.fetch_display().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch signature data, showing placeholder");
                DisplayData::placeholder(Utc::now())
            }
        };

        let source = data.source;
        self.display.send_replace(data);
        source
    }

    /// Submit the form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InProgress`] if a submission is already in
    /// flight, or [`SubmitError::Failed`] with the reason the state machine
    /// moved to.
    pub async fn submit(&self) -> Result<SubmitResponse, SubmitError> {
        let claimed = self.state.send_if_modified(|state| {
            if state.is_submitting() {
                false
            } else {
                *state = SubmissionState::Submitting;
                true
            }
        });
        if !claimed {
            return Err(SubmitError::InProgress);
        }
        let _settle = IdleIfUnsettled(&self.state);

        let draft = self.form();
        if let Err(e) = draft.validate() {
            return Err(self.fail(FailureReason::Validation, e.to_string()));
        }

        match self.api.submit(&draft).await {
            Ok(response) => {
                self.update_form(|form| *form = SignatureDraft::default());
                self.state.send_replace(SubmissionState::Success);
                tracing::info!(total = response.total_signatures, "Signature submitted");
                self.refresh().await;
                Ok(response)
            }
            Err(e) => {
                let reason = FailureReason::from_error(&e);
                let message = match e {
                    ClientError::Api { message, .. } => message,
                    other => {
                        tracing::warn!(error = %other, "Signature submission failed");
                        NETWORK_ERROR_MESSAGE.to_string()
                    }
                };
                Err(self.fail(reason, message))
            }
        }
    }

    fn fail(&self, reason: FailureReason, message: String) -> SubmitError {
        self.state.send_replace(SubmissionState::Failed {
            reason,
            message: message.clone(),
        });
        SubmitError::Failed { reason, message }
    }

    /// Reload live data after a write; keeps what is on display on failure.
    async fn refresh(&self) {
        match self.fetch_display().await {
            Ok(data) => {
                self.display.send_replace(data);
            }
            Err(e) => tracing::warn!(error = %e, "Could not refresh signature data"),
        }
    }

    async fn fetch_display(&self) -> Result<DisplayData, ClientError> {
        let (total, recent) = tokio::join!(self.api.count(), self.api.recent(DEFAULT_RECENT_LIMIT));
        Ok(DisplayData {
            total: total?,
            recent: recent?,
            source: DisplaySource::Live,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Returns a cancelled submission to `Idle`.
struct IdleIfUnsettled<'a>(&'a watch::Sender<SubmissionState>);

impl Drop for IdleIfUnsettled<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| {
            if state.is_submitting() {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }
}
