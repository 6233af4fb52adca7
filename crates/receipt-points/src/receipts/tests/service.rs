use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::receipts::domain::ReceiptId;
use crate::receipts::store::{PointsStore, StoreError};
use crate::receipts::{ReceiptService, ReceiptServiceError};

#[test]
fn submit_scores_and_stores_the_receipt() {
    let (service, store) = build_service();

    let record = service.submit(&target_receipt()).expect("submission succeeds");

    assert_eq!(record.points, 28);
    assert_eq!(store.get(&record.id).expect("store readable"), Some(28));
    assert_eq!(
        service.lookup(&record.id).expect("lookup succeeds"),
        Some(28)
    );
}

#[test]
fn each_submission_gets_a_new_id() {
    let (service, store) = build_service();

    let first = service.submit(&target_receipt()).expect("first");
    let second = service.submit(&target_receipt()).expect("second");

    assert_ne!(first.id, second.id);
    assert_eq!(first.points, second.points);
    assert_eq!(store.len(), 2);
}

#[test]
fn rejected_payload_is_never_stored() {
    let store = Arc::new(RecordingStore::default());
    let service = ReceiptService::new(store.clone());

    let err = service.submit(&json!({})).expect_err("empty payload rejected");

    match err {
        ReceiptServiceError::Validation(errors) => assert!(!errors.is_empty()),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.writes.lock().expect("store mutex poisoned").is_empty());
}

#[test]
fn lookup_of_unknown_id_is_absent() {
    let (service, _) = build_service();
    let points = service
        .lookup(&ReceiptId("fake-id".to_string()))
        .expect("lookup succeeds");
    assert_eq!(points, None);
}

#[test]
fn store_failures_surface_as_store_errors() {
    let service = ReceiptService::new(Arc::new(UnavailableStore));

    let err = service
        .submit(&target_receipt())
        .expect_err("store offline");
    assert!(matches!(
        err,
        ReceiptServiceError::Store(StoreError::Unavailable(_))
    ));

    let err = service
        .lookup(&ReceiptId("any".to_string()))
        .expect_err("store offline");
    assert!(matches!(err, ReceiptServiceError::Store(_)));
}

#[test]
fn conflicting_ids_are_not_overwritten() {
    let service = ReceiptService::new(Arc::new(ConflictStore));
    let err = service
        .submit(&corner_market_receipt())
        .expect_err("conflict propagates");
    assert!(matches!(
        err,
        ReceiptServiceError::Store(StoreError::Conflict(_))
    ));
}
