//! Form state, required-field validation and the submit/navigate cycle.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{FormField, Page, RegistrationPayload},
    error::UnknownField,
    protocol::SubmissionResult,
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{messages::Locale, RegistrationGateway};

pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Required fields were blank; nothing was sent.
    Rejected(Vec<FormField>),
    /// A submission was already in flight.
    Ignored,
    Completed(SubmissionResult),
}

pub type NavigationCallback = Arc<dyn Fn(Page) + Send + Sync>;

struct FormState {
    form: RegistrationPayload,
    state: SubmissionState,
    pending_navigation: Option<JoinHandle<()>>,
}

impl FormState {
    fn cancel_navigation(&mut self) -> bool {
        match self.pending_navigation.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

/// Owns the registration form and drives at most one submission at a time.
///
/// The state lock is never held across the gateway call; the `Submitting`
/// state is what blocks re-entry. Dropping the controller cancels a pending
/// navigation.
pub struct FormController {
    gateway: Arc<dyn RegistrationGateway>,
    on_navigate: NavigationCallback,
    navigation_delay: Duration,
    locale: Locale,
    inner: Mutex<FormState>,
}

impl FormController {
    pub fn new(
        gateway: Arc<dyn RegistrationGateway>,
        locale: Locale,
        on_navigate: impl Fn(Page) + Send + Sync + 'static,
    ) -> Self {
        Self {
            gateway,
            on_navigate: Arc::new(on_navigate),
            navigation_delay: DEFAULT_NAVIGATION_DELAY,
            locale,
            inner: Mutex::new(FormState {
                form: RegistrationPayload::default(),
                state: SubmissionState::Idle,
                pending_navigation: None,
            }),
        }
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    pub async fn update_field(&self, field: FormField, value: impl Into<String>) {
        self.inner.lock().await.form.set(field, value.into());
    }

    pub async fn update_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownField> {
        let field = name.parse::<FormField>()?;
        self.update_field(field, value).await;
        Ok(())
    }

    pub async fn field(&self, field: FormField) -> String {
        self.inner.lock().await.form.get(field).to_string()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state.clone()
    }

    /// False while a submission is in flight.
    pub async fn can_submit(&self) -> bool {
        self.inner.lock().await.state != SubmissionState::Submitting
    }

    pub async fn missing_fields(&self) -> Vec<FormField> {
        self.inner.lock().await.form.missing_fields()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let payload = {
            let mut guard = self.inner.lock().await;
            if guard.state == SubmissionState::Submitting {
                debug!("submission already in flight; ignoring submit");
                return SubmitOutcome::Ignored;
            }

            guard.cancel_navigation();

            let missing = guard.form.missing_fields();
            if !missing.is_empty() {
                warn!(?missing, "registration form is incomplete");
                guard.state =
                    SubmissionState::Failed(self.locale.required_fields_missing().to_string());
                return SubmitOutcome::Rejected(missing);
            }

            guard.state = SubmissionState::Submitting;
            guard.form.trimmed()
        };

        let result = self.gateway.submit(payload).await;

        let mut guard = self.inner.lock().await;
        if result.success {
            info!(message = %result.message, "registration submitted");
            guard.state = SubmissionState::Succeeded(result.message.clone());
            guard.pending_navigation = Some(self.schedule_navigation(Page::ThankYou));
        } else {
            warn!(message = %result.message, error = ?result.error, "registration failed");
            guard.state = SubmissionState::Failed(result.display_message());
        }

        SubmitOutcome::Completed(result)
    }

    /// Returns true when a pending navigation was cancelled.
    pub async fn cancel_navigation(&self) -> bool {
        self.inner.lock().await.cancel_navigation()
    }

    fn schedule_navigation(&self, page: Page) -> JoinHandle<()> {
        let on_navigate = Arc::clone(&self.on_navigate);
        let delay = self.navigation_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(?page, "navigating after successful registration");
            on_navigate(page);
        })
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.inner.get_mut().cancel_navigation();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
