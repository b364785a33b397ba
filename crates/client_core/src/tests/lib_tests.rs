use super::*;
use crate::fakes::{fake_backend, sample_payload, NotifyBehavior, StoreBehavior};
use shared::error::StoreError;

fn gateway(
    store: StoreBehavior,
    notify: NotifyBehavior,
) -> (
    SubmissionGateway<crate::fakes::FakeStore, crate::fakes::FakeNotifier>,
    crate::fakes::CallLog,
) {
    let (store, notifier, log) = fake_backend(store, notify);
    (SubmissionGateway::new(store, notifier, Locale::English), log)
}

#[tokio::test]
async fn persists_before_notifying_and_confirms() {
    let (gateway, log) = gateway(StoreBehavior::Insert, NotifyBehavior::Deliver);

    let result = gateway.submit(sample_payload()).await;

    assert_eq!(
        result,
        SubmissionResult::succeeded(Locale::English.saved_and_email_sent())
    );
    assert_eq!(log.calls(), vec!["persist", "notify"]);
    assert_eq!(log.inserted(), vec![sample_payload()]);
    assert_eq!(log.notified(), vec![sample_payload().confirmation_request()]);
}

#[tokio::test]
async fn store_rejection_skips_notification() {
    let (gateway, log) = gateway(
        StoreBehavior::Reject(StoreError::new("23505", "duplicate")),
        NotifyBehavior::Deliver,
    );

    let result = gateway.submit(sample_payload()).await;

    assert!(!result.success);
    assert!(result.message.contains("duplicate"));
    let error = result.error.expect("error detail");
    assert!(error.contains("23505"), "unexpected error detail: {error}");
    assert_eq!(result.kind, Some(ErrorKind::Persistence));
    assert_eq!(log.count("notify"), 0);
}

#[tokio::test]
async fn rejected_notification_is_still_a_success() {
    let (gateway, log) = gateway(StoreBehavior::Insert, NotifyBehavior::Reject(500));

    let result = gateway.submit(sample_payload()).await;

    assert!(result.success);
    assert_eq!(result.message, Locale::English.saved_but_email_failed());
    assert_eq!(result.kind, Some(ErrorKind::Notification));
    assert_eq!(result.error, None);
    assert_eq!(log.calls(), vec!["persist", "notify"]);
}

#[tokio::test]
async fn store_fault_is_reported_as_unexpected() {
    let (gateway, log) = gateway(StoreBehavior::Fault, NotifyBehavior::Deliver);

    let result = gateway.submit(sample_payload()).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Unexpected));
    let detail = result.error.clone().expect("detail");
    assert!(detail.starts_with("malformed response"));
    assert_eq!(result.message, Locale::English.unexpected_error(&detail));
    assert_eq!(log.count("notify"), 0);
}

#[tokio::test]
async fn notify_fault_after_save_is_reported_as_unexpected() {
    let (gateway, log) = gateway(StoreBehavior::Insert, NotifyBehavior::Fault);

    let result = gateway.submit(sample_payload()).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Unexpected));
    assert_eq!(log.calls(), vec!["persist", "notify"]);
}

#[tokio::test]
async fn misconfigured_gateway_short_circuits() {
    let gateway = SubmissionGateway::<crate::fakes::FakeStore, crate::fakes::FakeNotifier>::misconfigured(
        ConfigError::Missing(vec!["access_key"]),
        Locale::Arabic,
    );

    let result = gateway.submit(sample_payload()).await;

    assert!(!result.success);
    assert_eq!(result.kind, Some(ErrorKind::Configuration));
    assert_eq!(result.message, Locale::Arabic.missing_configuration());
    assert!(result
        .error
        .expect("detail")
        .contains("Missing service config"));
}

#[tokio::test]
async fn unconfigured_settings_build_a_rejecting_gateway() {
    let gateway = SubmissionGateway::from_settings(&Settings::default()).expect("gateway");

    let result = gateway.submit(sample_payload()).await;

    assert_eq!(result.kind, Some(ErrorKind::Configuration));
}
