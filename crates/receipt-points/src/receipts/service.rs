use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{ReceiptId, ScoreRecord};
use super::points::PointsEngine;
use super::store::{PointsStore, StoreError};
use super::validation::{validate, ValidationErrors};

/// Service composing the validator, the points engine, and the injected store.
pub struct ReceiptService<S> {
    store: Arc<S>,
    engine: PointsEngine,
}

impl<S> ReceiptService<S>
where
    S: PointsStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            engine: PointsEngine::new(),
        }
    }

    /// Validate, score and store a submitted payload, returning the issued record.
    ///
    /// Points are computed in full before the id is published, so a concurrent lookup sees
    /// either nothing or the final value.
    pub fn submit(&self, payload: &Value) -> Result<ScoreRecord, ReceiptServiceError> {
        let receipt = validate(payload).map_err(|errors| {
            warn!(error_count = errors.len(), "receipt rejected by validation");
            errors
        })?;

        let breakdown = self.engine.score(&receipt);
        for component in &breakdown.components {
            debug!(
                rule = component.rule.label(),
                points = component.points,
                notes = %component.notes,
                "points rule evaluated"
            );
        }

        let record = ScoreRecord {
            id: ReceiptId::generate(),
            points: breakdown.total,
        };
        self.store.put(record.clone())?;

        info!(receipt_id = %record.id, points = record.points, "receipt scored");
        Ok(record)
    }

    /// Points previously issued for `id`, or `None` when the id is unknown.
    pub fn lookup(&self, id: &ReceiptId) -> Result<Option<u64>, ReceiptServiceError> {
        let points = self.store.get(id)?;
        if points.is_none() {
            debug!(receipt_id = %id, "no receipt stored for id");
        }
        Ok(points)
    }
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}
