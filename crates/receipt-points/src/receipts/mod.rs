//! Receipt intake, points scoring and id-based lookup.

pub mod domain;
pub mod points;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Item, PurchaseDate, PurchaseTime, Receipt, ReceiptId, ScoreRecord};
pub use points::{PointsBreakdown, PointsComponent, PointsEngine, PointsRule};
pub use router::receipt_router;
pub use service::{ReceiptService, ReceiptServiceError};
pub use store::{InMemoryPointsStore, PointsStore, StoreError};
pub use validation::{validate, FieldError, ValidationErrors};
