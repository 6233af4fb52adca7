use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::domain::ReceiptId;
use super::service::{ReceiptService, ReceiptServiceError};
use super::store::PointsStore;
use super::validation::ValidationErrors;

pub const NOT_FOUND_MESSAGE: &str = "No receipt found for that id";

/// Router exposing receipt submission and points lookup.
pub fn receipt_router<S>(service: Arc<ReceiptService<S>>) -> Router
where
    S: PointsStore + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S>))
        .route("/receipts/:id/points", get(points_handler::<S>))
        .with_state(service)
}

pub(crate) async fn process_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: PointsStore + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return validation_response(ValidationErrors::unreadable_body(rejection.body_text()))
        }
    };

    match service.submit(&payload) {
        Ok(record) => (StatusCode::OK, Json(json!({ "id": record.id }))).into_response(),
        Err(ReceiptServiceError::Validation(errors)) => validation_response(errors),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn points_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: PointsStore + 'static,
{
    let id = ReceiptId::from(id);
    match service.lookup(&id) {
        Ok(Some(points)) => (StatusCode::OK, Json(json!({ "points": points }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": NOT_FOUND_MESSAGE })),
        )
            .into_response(),
        Err(other) => internal_error(other),
    }
}

fn validation_response(errors: ValidationErrors) -> Response {
    let payload = json!({ "errors": errors });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn internal_error(err: ReceiptServiceError) -> Response {
    error!(error = %err, "receipt request failed");
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
