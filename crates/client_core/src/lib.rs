use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{ConfirmationRequest, RegistrationPayload},
    error::ErrorKind,
    protocol::SubmissionResult,
};
use tracing::{debug, error, info};

pub mod config;
pub mod controller;
pub mod error;
pub mod messages;
pub mod transport;

pub use config::{load_settings, ConfigError, ServiceConfig, Settings};
pub use controller::{FormController, SubmissionState, SubmitOutcome};
pub use error::GatewayError;
pub use messages::Locale;
pub use transport::{HttpConfirmationNotifier, HttpRegistrationStore};

/// Durable store for registration rows.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Inserts one row and returns the rows echoed back by the store.
    async fn insert(&self, payload: &RegistrationPayload) -> Result<Vec<Value>, GatewayError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    Delivered(Value),
    Rejected { status: u16, body: String },
}

/// Best-effort confirmation email trigger.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<NotifyOutcome, GatewayError>;
}

/// Seam between the form controller and whatever performs the remote effects.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn submit(&self, payload: RegistrationPayload) -> SubmissionResult;
}

struct Backend<S, N> {
    store: S,
    notifier: N,
}

/// Persists a registration, then asks for a confirmation email, and folds both
/// steps into one [`SubmissionResult`]. Stateless between calls.
pub struct SubmissionGateway<S = HttpRegistrationStore, N = HttpConfirmationNotifier> {
    backend: Result<Backend<S, N>, ConfigError>,
    locale: Locale,
}

impl SubmissionGateway {
    /// Builds the HTTP-backed gateway. Missing service settings do not fail here;
    /// the gateway then rejects every submission with a configuration result.
    pub fn from_settings(settings: &Settings) -> Result<Self, GatewayError> {
        let service = match settings.service_config() {
            Ok(service) => service,
            Err(err) => {
                error!(%err, "registration service is not configured; submissions will be rejected");
                return Ok(Self::misconfigured(err, settings.locale));
            }
        };

        debug!(
            url = %service.service_url,
            key_prefix = %service.key_prefix(),
            "using registration service"
        );

        let http = transport::build_http_client(settings.request_timeout())?;
        let store = HttpRegistrationStore::new(http.clone(), &service, &settings.table);
        let notifier = HttpConfirmationNotifier::new(http, &service, &settings.notify_function);
        Ok(Self::new(store, notifier, settings.locale))
    }
}

impl<S, N> SubmissionGateway<S, N>
where
    S: RegistrationStore,
    N: ConfirmationNotifier,
{
    pub fn new(store: S, notifier: N, locale: Locale) -> Self {
        Self {
            backend: Ok(Backend { store, notifier }),
            locale,
        }
    }

    pub fn misconfigured(err: ConfigError, locale: Locale) -> Self {
        Self {
            backend: Err(err),
            locale,
        }
    }

    async fn run(&self, payload: &RegistrationPayload) -> Result<SubmissionResult, GatewayError> {
        let backend = self.backend.as_ref().map_err(|err| err.clone())?;

        info!(
            name = %payload.name,
            email = %payload.email,
            organization = %payload.organization,
            "starting registration submission"
        );

        let rows = backend.store.insert(payload).await?;
        info!(rows = rows.len(), "registration saved");

        let request = payload.confirmation_request();
        match backend.notifier.send_confirmation(&request).await? {
            NotifyOutcome::Delivered(body) => {
                info!(response = %body, "confirmation email sent");
                Ok(SubmissionResult::succeeded(
                    self.locale.saved_and_email_sent(),
                ))
            }
            NotifyOutcome::Rejected { status, body } => {
                error!(status, body = %body, "confirmation email failed");
                Ok(SubmissionResult::qualified(
                    self.locale.saved_but_email_failed(),
                    ErrorKind::Notification,
                ))
            }
        }
    }

    fn reduce_error(&self, err: GatewayError) -> SubmissionResult {
        let kind = err.kind();
        match err {
            GatewayError::Config(err) => SubmissionResult::failed(
                kind,
                self.locale.missing_configuration(),
                format!("Missing service config: {err}"),
            ),
            GatewayError::Store(store_error) => {
                error!(
                    code = %store_error.code,
                    message = %store_error.message,
                    "database rejected registration"
                );
                SubmissionResult::failed(
                    kind,
                    self.locale.save_failed(&store_error.message),
                    format!("Database Error: {store_error}"),
                )
            }
            other => {
                let detail = other.to_string();
                error!(error = %detail, "unexpected registration error");
                SubmissionResult::failed(kind, self.locale.unexpected_error(&detail), detail)
            }
        }
    }
}

#[async_trait]
impl<S, N> RegistrationGateway for SubmissionGateway<S, N>
where
    S: RegistrationStore,
    N: ConfirmationNotifier,
{
    async fn submit(&self, payload: RegistrationPayload) -> SubmissionResult {
        match self.run(&payload).await {
            Ok(result) => result,
            Err(err) => self.reduce_error(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/fakes.rs"]
mod fakes;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
