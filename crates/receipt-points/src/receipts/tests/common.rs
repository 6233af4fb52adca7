use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::receipts::domain::{ReceiptId, ScoreRecord};
use crate::receipts::store::{InMemoryPointsStore, PointsStore, StoreError};
use crate::receipts::{receipt_router, ReceiptService};

pub(super) fn target_receipt() -> Value {
    json!({
        "retailer": "Target",
        "purchaseDate": "2022-01-01",
        "purchaseTime": "13:01",
        "items": [
            { "shortDescription": "Mountain Dew 12PK", "price": "6.49" },
            { "shortDescription": "Emils Cheese Pizza", "price": "12.25" },
            { "shortDescription": "Knorr Creamy Chicken", "price": "1.26" },
            { "shortDescription": "Doritos Nacho Cheese", "price": "3.35" },
            { "shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00" }
        ],
        "total": "35.35"
    })
}

pub(super) fn corner_market_receipt() -> Value {
    json!({
        "retailer": "M&M Corner Market",
        "purchaseDate": "2022-03-20",
        "purchaseTime": "14:33",
        "items": [
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" }
        ],
        "total": "9.00"
    })
}

/// Single item receipt whose only scoring rule is the retailer name.
pub(super) fn minimal_receipt() -> Value {
    json!({
        "retailer": "Walgreens",
        "purchaseDate": "2022-01-02",
        "purchaseTime": "08:13",
        "items": [
            { "shortDescription": "Pepsi - 12-oz", "price": "1.25" }
        ],
        "total": "1.33"
    })
}

pub(super) fn build_service() -> (ReceiptService<InMemoryPointsStore>, Arc<InMemoryPointsStore>) {
    let store = Arc::new(InMemoryPointsStore::default());
    let service = ReceiptService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: ReceiptService<InMemoryPointsStore>) -> axum::Router {
    receipt_router(Arc::new(service))
}

/// Records every write it accepts so tests can assert on what reached storage.
#[derive(Default, Clone)]
pub(super) struct RecordingStore {
    pub(super) writes: Arc<Mutex<Vec<ScoreRecord>>>,
}

impl PointsStore for RecordingStore {
    fn put(&self, record: ScoreRecord) -> Result<(), StoreError> {
        self.writes.lock().expect("store mutex poisoned").push(record);
        Ok(())
    }

    fn get(&self, id: &ReceiptId) -> Result<Option<u64>, StoreError> {
        let writes = self.writes.lock().expect("store mutex poisoned");
        Ok(writes
            .iter()
            .find(|record| &record.id == id)
            .map(|record| record.points))
    }
}

pub(super) struct ConflictStore;

impl PointsStore for ConflictStore {
    fn put(&self, record: ScoreRecord) -> Result<(), StoreError> {
        Err(StoreError::Conflict(record.id))
    }

    fn get(&self, _id: &ReceiptId) -> Result<Option<u64>, StoreError> {
        Ok(None)
    }
}

pub(super) struct UnavailableStore;

impl PointsStore for UnavailableStore {
    fn put(&self, _record: ScoreRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &ReceiptId) -> Result<Option<u64>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
