//! Shape checks that turn an arbitrary JSON payload into a [`Receipt`].
//!
//! Every field is checked independently and all violations are reported together, so a caller
//! fixing a rejected payload sees every problem in one round trip.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::domain::{Item, PurchaseDate, PurchaseTime, Receipt};

static PURCHASE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("purchase date pattern compiles")
});

static PURCHASE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("purchase time pattern compiles")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("amount pattern compiles")
});

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Path of the offending field, e.g. `items[2].price`.
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.cloned(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Non-empty, ordered list of field errors produced by [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Single error describing a request body that could not be read at all.
    pub fn unreadable_body(message: impl Into<String>) -> Self {
        Self(vec![FieldError::new("body", message, None)])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receipt rejected: ")?;
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a parsed payload and normalize it into a [`Receipt`].
///
/// Never panics on malformed input: missing fields, wrong types and wrong nesting all come back
/// as field errors.
pub fn validate(payload: &Value) -> Result<Receipt, ValidationErrors> {
    let mut errors = Vec::new();

    let retailer = collect_all(
        &mut errors,
        check_text("retailer", payload.get("retailer"), "Retailer"),
    );
    let total = collect(&mut errors, check_amount("total", payload.get("total"), "Total"));
    let items = collect(&mut errors, check_items(payload.get("items")));
    let items = items.and_then(|items| check_item_entries(items, &mut errors));
    let purchase_date = collect(&mut errors, check_purchase_date(payload.get("purchaseDate")));
    let purchase_time = collect(&mut errors, check_purchase_time(payload.get("purchaseTime")));

    match (retailer, total, items, purchase_date, purchase_time) {
        (Some(retailer), Some(total), Some(items), Some(purchase_date), Some(purchase_time))
            if errors.is_empty() =>
        {
            Ok(Receipt {
                retailer,
                purchase_date,
                purchase_time,
                total,
                items,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

/// A missing or null text field fails both the string check and the non-empty check, so it
/// reports both.
fn check_text(
    field: &str,
    value: Option<&Value>,
    label: &str,
) -> Result<String, Vec<FieldError>> {
    let not_string = || FieldError::new(field, format!("{label} must be a string"), value);
    let empty = || FieldError::new(field, format!("{label} cannot be empty"), value);

    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        Some(Value::String(_)) => Err(vec![empty()]),
        None | Some(Value::Null) => Err(vec![not_string(), empty()]),
        Some(_) => Err(vec![not_string()]),
    }
}

fn collect_all<T>(errors: &mut Vec<FieldError>, result: Result<T, Vec<FieldError>>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(mut failed) => {
            errors.append(&mut failed);
            None
        }
    }
}

fn check_items(value: Option<&Value>) -> Result<&[Value], FieldError> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items.as_slice()),
        _ => Err(FieldError::new(
            "items",
            "Items must be an array with at least one item",
            value,
        )),
    }
}

/// Descriptions are checked for every item first, then prices, so the error order is stable
/// regardless of which item is broken.
fn check_item_entries(items: &[Value], errors: &mut Vec<FieldError>) -> Option<Vec<Item>> {
    let descriptions: Vec<Option<String>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let field = format!("items[{index}].shortDescription");
            let value = item.get("shortDescription");
            collect_all(errors, check_text(&field, value, "Item short description"))
        })
        .collect();

    let prices: Vec<Option<Decimal>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let field = format!("items[{index}].price");
            collect(errors, check_amount(&field, item.get("price"), "Item price"))
        })
        .collect();

    descriptions
        .into_iter()
        .zip(prices)
        .map(|(short_description, price)| {
            Some(Item {
                short_description: short_description?,
                price: price?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountError {
    Malformed,
    /// Well-formed, but not representable exactly within 28 significant digits.
    OutOfRange,
}

fn check_amount(field: &str, value: Option<&Value>, label: &str) -> Result<Decimal, FieldError> {
    let reject = || FieldError::new(field, format!("{label} must be >= 0"), value);

    let text = match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return Err(reject()),
    };

    let amount = match parse_amount(&text) {
        Ok(amount) => amount,
        Err(AmountError::Malformed) => return Err(reject()),
        Err(AmountError::OutOfRange) => {
            return Err(FieldError::new(
                field,
                format!("{label} is outside the supported amount range"),
                value,
            ))
        }
    };
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(reject());
    }
    Ok(amount)
}

/// Parse a plain (`12.50`) or scientific (`1.25e1`) decimal literal.
///
/// Literals that `Decimal` would overflow on, or silently round, are out of range.
fn parse_amount(text: &str) -> Result<Decimal, AmountError> {
    let captures = AMOUNT.captures(text).ok_or(AmountError::Malformed)?;
    let sign = captures.get(1).map_or("", |m| m.as_str());
    let mantissa = captures.get(2).map_or("", |m| m.as_str());
    let mantissa = mantissa.strip_suffix('.').unwrap_or(mantissa);
    let sign = if sign == "-" { "-" } else { "" };

    let fraction_digits = mantissa.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    let digits = mantissa.replace('.', "");
    let trailing_zeros = digits.len() - digits.trim_end_matches('0').len();

    let (amount, exponent) = match captures.get(3) {
        Some(exponent) => {
            let exponent = exponent.as_str().replace('+', "");
            let shift = exponent[1..]
                .parse::<i64>()
                .map_err(|_| AmountError::OutOfRange)?;
            let amount = Decimal::from_scientific(&format!("{sign}{mantissa}{exponent}"));
            (amount, shift)
        }
        None => (Decimal::from_str(&format!("{sign}{mantissa}")), 0),
    };
    let amount = amount.map_err(|_| AmountError::OutOfRange)?;

    // Smallest scale that holds every significant digit of the literal.
    let required_scale = (fraction_digits as i64 - trailing_zeros as i64)
        .saturating_sub(exponent)
        .max(0);
    if i64::from(amount.normalize().scale()) != required_scale {
        return Err(AmountError::OutOfRange);
    }
    Ok(amount)
}

fn check_purchase_date(value: Option<&Value>) -> Result<PurchaseDate, FieldError> {
    let reject = || {
        FieldError::new(
            "purchaseDate",
            "Purchase date must be in YYYY-MM-DD format",
            value,
        )
    };

    let text = value.and_then(Value::as_str).ok_or_else(reject)?;
    let captures = PURCHASE_DATE.captures(text).ok_or_else(reject)?;
    let digits = |group: usize| captures.get(group).map(|m| m.as_str());

    let date = (|| {
        Some(PurchaseDate {
            year: digits(1)?.parse().ok()?,
            month: digits(2)?.parse().ok()?,
            day: digits(3)?.parse().ok()?,
        })
    })();
    date.ok_or_else(reject)
}

fn check_purchase_time(value: Option<&Value>) -> Result<PurchaseTime, FieldError> {
    let reject = || {
        FieldError::new(
            "purchaseTime",
            "Purchase time must be in HH:MM format",
            value,
        )
    };

    let text = value.and_then(Value::as_str).ok_or_else(reject)?;
    let captures = PURCHASE_TIME.captures(text).ok_or_else(reject)?;
    let digits = |group: usize| captures.get(group).map(|m| m.as_str());

    let time = (|| {
        Some(PurchaseTime {
            hour: digits(1)?.parse().ok()?,
            minute: digits(2)?.parse().ok()?,
        })
    })();
    time.ok_or_else(reject)
}
