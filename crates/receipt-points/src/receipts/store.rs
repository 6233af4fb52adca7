use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::domain::{ReceiptId, ScoreRecord};

/// Storage capability for issued scores so the service can be exercised against test doubles
/// or a durable backend.
pub trait PointsStore: Send + Sync {
    /// Insert a new record. An id that is already present is rejected with
    /// [`StoreError::Conflict`]; stored points are never overwritten.
    fn put(&self, record: ScoreRecord) -> Result<(), StoreError>;
    fn get(&self, id: &ReceiptId) -> Result<Option<u64>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("receipt id {0} already issued")]
    Conflict(ReceiptId),
    #[error("points store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPointsStore {
    records: Arc<RwLock<HashMap<ReceiptId, u64>>>,
}

impl InMemoryPointsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PointsStore for InMemoryPointsStore {
    fn put(&self, record: ScoreRecord) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("points store lock poisoned".to_string()))?;
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        guard.insert(record.id, record.points);
        Ok(())
    }

    fn get(&self, id: &ReceiptId) -> Result<Option<u64>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("points store lock poisoned".to_string()))?;
        Ok(guard.get(id).copied())
    }
}
