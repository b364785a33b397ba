use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::{ConfirmationRequest, RegistrationPayload},
    error::StoreError,
};

use crate::{ConfirmationNotifier, GatewayError, NotifyOutcome, RegistrationStore};

/// Ordered record of remote calls shared by the fake store and notifier.
#[derive(Clone, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<&'static str>>>,
    inserted: Arc<Mutex<Vec<RegistrationPayload>>>,
    notified: Arc<Mutex<Vec<ConfirmationRequest>>>,
}

impl CallLog {
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub(crate) fn inserted(&self) -> Vec<RegistrationPayload> {
        self.inserted.lock().expect("inserted lock").clone()
    }

    pub(crate) fn notified(&self) -> Vec<ConfirmationRequest> {
        self.notified.lock().expect("notified lock").clone()
    }
}

fn malformed_body() -> GatewayError {
    serde_json::from_str::<Value>("{not json")
        .expect_err("malformed json")
        .into()
}

pub(crate) enum StoreBehavior {
    Insert,
    Reject(StoreError),
    Fault,
}

pub(crate) struct FakeStore {
    pub(crate) log: CallLog,
    pub(crate) behavior: StoreBehavior,
}

#[async_trait]
impl RegistrationStore for FakeStore {
    async fn insert(&self, payload: &RegistrationPayload) -> Result<Vec<Value>, GatewayError> {
        self.log.calls.lock().expect("calls lock").push("persist");
        self.log
            .inserted
            .lock()
            .expect("inserted lock")
            .push(payload.clone());

        match &self.behavior {
            StoreBehavior::Insert => Ok(vec![json!({"id": 1, "name": payload.name})]),
            StoreBehavior::Reject(err) => Err(GatewayError::Store(err.clone())),
            StoreBehavior::Fault => Err(malformed_body()),
        }
    }
}

pub(crate) enum NotifyBehavior {
    Deliver,
    Reject(u16),
    Fault,
}

pub(crate) struct FakeNotifier {
    pub(crate) log: CallLog,
    pub(crate) behavior: NotifyBehavior,
}

#[async_trait]
impl ConfirmationNotifier for FakeNotifier {
    async fn send_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<NotifyOutcome, GatewayError> {
        self.log.calls.lock().expect("calls lock").push("notify");
        self.log
            .notified
            .lock()
            .expect("notified lock")
            .push(request.clone());

        match self.behavior {
            NotifyBehavior::Deliver => Ok(NotifyOutcome::Delivered(json!({"ok": true}))),
            NotifyBehavior::Reject(status) => Ok(NotifyOutcome::Rejected {
                status,
                body: "{\"error\":\"smtp unavailable\"}".into(),
            }),
            NotifyBehavior::Fault => Err(malformed_body()),
        }
    }
}

pub(crate) fn fake_backend(
    store: StoreBehavior,
    notify: NotifyBehavior,
) -> (FakeStore, FakeNotifier, CallLog) {
    let log = CallLog::default();
    (
        FakeStore {
            log: log.clone(),
            behavior: store,
        },
        FakeNotifier {
            log: log.clone(),
            behavior: notify,
        },
        log,
    )
}

pub(crate) fn sample_payload() -> RegistrationPayload {
    RegistrationPayload {
        name: "Ali".into(),
        email: "a@b.com".into(),
        phone: "+1".into(),
        organization: "Acme".into(),
        country: "X".into(),
        city: "Y".into(),
    }
}
