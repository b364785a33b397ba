//! HTTP implementations of the store and notifier against a PostgREST-style service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::{
    domain::{ConfirmationRequest, RegistrationPayload},
    error::StoreError,
};
use tracing::debug;

use crate::{
    config::ServiceConfig, ConfirmationNotifier, GatewayError, NotifyOutcome, RegistrationStore,
};

pub fn build_http_client(timeout: Duration) -> Result<Client, GatewayError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub struct HttpRegistrationStore {
    http: Client,
    endpoint: String,
    access_key: String,
}

impl HttpRegistrationStore {
    pub fn new(http: Client, service: &ServiceConfig, table: &str) -> Self {
        Self {
            http,
            endpoint: service.endpoint(&format!("rest/v1/{table}")),
            access_key: service.access_key.clone(),
        }
    }
}

#[async_trait]
impl RegistrationStore for HttpRegistrationStore {
    async fn insert(&self, payload: &RegistrationPayload) -> Result<Vec<Value>, GatewayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
            .header("Prefer", "return=representation")
            .json(&[payload])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Store(parse_store_error(status, &body)));
        }

        debug!(%status, "store accepted registration row");
        Ok(serde_json::from_str(&body)?)
    }
}

/// Falls back to the HTTP status as the code when the body is not a store error document.
fn parse_store_error(status: StatusCode, body: &str) -> StoreError {
    serde_json::from_str::<StoreError>(body).unwrap_or_else(|_| {
        let body = body.trim();
        let message = if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.to_string()
        };
        StoreError::new(status.as_u16().to_string(), message)
    })
}

pub struct HttpConfirmationNotifier {
    http: Client,
    endpoint: String,
    access_key: String,
}

impl HttpConfirmationNotifier {
    pub fn new(http: Client, service: &ServiceConfig, function: &str) -> Self {
        Self {
            http,
            endpoint: service.endpoint(&format!("functions/v1/{function}")),
            access_key: service.access_key.clone(),
        }
    }
}

#[async_trait]
impl ConfirmationNotifier for HttpConfirmationNotifier {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<NotifyOutcome, GatewayError> {
        debug!(endpoint = %self.endpoint, "requesting confirmation email");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.access_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Ok(NotifyOutcome::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(NotifyOutcome::Delivered(serde_json::from_str(&body)?))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
