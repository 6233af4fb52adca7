//! Receipt validation, loyalty points scoring, and the HTTP routes that expose them.

pub mod config;
pub mod error;
pub mod receipts;
pub mod telemetry;
