use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier handed back to callers after a receipt has been scored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    /// Allocate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReceiptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// `YYYY-MM-DD` digits as written on the receipt. Calendar validity is not implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl PurchaseDate {
    pub const fn day(self) -> u8 {
        self.day
    }
}

impl fmt::Display for PurchaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// 24-hour `HH:MM` purchase time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PurchaseTime {
    pub hour: u8,
    pub minute: u8,
}

impl PurchaseTime {
    /// Hour and minute digits read as one number, e.g. `14:33` becomes `1433`.
    pub const fn as_hhmm(self) -> u16 {
        self.hour as u16 * 100 + self.minute as u16
    }
}

impl fmt::Display for PurchaseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One line entry of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    pub price: Decimal,
}

/// Receipt accepted by the validator. Fields are never mutated after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,
    #[serde(serialize_with = "serialize_display")]
    pub purchase_date: PurchaseDate,
    #[serde(serialize_with = "serialize_display")]
    pub purchase_time: PurchaseTime,
    pub total: Decimal,
    pub items: Vec<Item>,
}

/// Persisted association between an issued id and its points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: ReceiptId,
    pub points: u64,
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
