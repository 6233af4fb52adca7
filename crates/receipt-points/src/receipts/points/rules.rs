use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::super::domain::{Item, Receipt};
use super::{PointsComponent, PointsRule};

const ROUND_DOLLAR_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const POINTS_PER_ITEM_PAIR: u64 = 5;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;

/// Exclusive bounds, read as `HHMM`.
const AFTERNOON_START: u16 = 1400;
const AFTERNOON_END: u16 = 1600;

pub(crate) fn score_receipt(receipt: &Receipt) -> Vec<PointsComponent> {
    PointsRule::ordered()
        .into_iter()
        .map(|rule| match rule {
            PointsRule::RetailerAlphanumerics => retailer_alphanumerics(&receipt.retailer),
            PointsRule::RoundDollarTotal => round_dollar_total(receipt.total),
            PointsRule::QuarterMultipleTotal => quarter_multiple_total(receipt.total),
            PointsRule::ItemPairs => item_pairs(&receipt.items),
            PointsRule::DescriptionLength => description_length(&receipt.items),
            PointsRule::OddPurchaseDay => odd_purchase_day(receipt.purchase_date.day()),
            PointsRule::AfternoonWindow => afternoon_window(receipt.purchase_time.as_hhmm()),
        })
        .collect()
}

fn retailer_alphanumerics(retailer: &str) -> PointsComponent {
    let count = retailer
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .count() as u64;

    PointsComponent {
        rule: PointsRule::RetailerAlphanumerics,
        points: count,
        notes: format!("{count} alphanumeric character(s) in '{retailer}'"),
    }
}

fn round_dollar_total(total: Decimal) -> PointsComponent {
    let round = total.fract().is_zero();
    PointsComponent {
        rule: PointsRule::RoundDollarTotal,
        points: if round { ROUND_DOLLAR_POINTS } else { 0 },
        notes: if round {
            format!("total {total} has no cents")
        } else {
            format!("total {total} has cents")
        },
    }
}

fn quarter_multiple_total(total: Decimal) -> PointsComponent {
    let quarter = Decimal::new(25, 2);
    let multiple = (total % quarter).is_zero();
    PointsComponent {
        rule: PointsRule::QuarterMultipleTotal,
        points: if multiple { QUARTER_MULTIPLE_POINTS } else { 0 },
        notes: if multiple {
            format!("total {total} is a multiple of 0.25")
        } else {
            format!("total {total} is not a multiple of 0.25")
        },
    }
}

fn item_pairs(items: &[Item]) -> PointsComponent {
    let pairs = (items.len() / 2) as u64;
    PointsComponent {
        rule: PointsRule::ItemPairs,
        points: pairs.saturating_mul(POINTS_PER_ITEM_PAIR),
        notes: format!("{pairs} pair(s) across {} item(s)", items.len()),
    }
}

/// Each qualifying item is rounded up on its own before the items are summed.
fn description_length(items: &[Item]) -> PointsComponent {
    let mut points: u64 = 0;
    let mut qualifying = 0usize;

    for item in items {
        if let Some(bonus) = description_bonus(item) {
            qualifying += 1;
            points = points.saturating_add(bonus);
        }
    }

    PointsComponent {
        rule: PointsRule::DescriptionLength,
        points,
        notes: format!(
            "{qualifying} of {} item description(s) have a trimmed length divisible by 3",
            items.len()
        ),
    }
}

/// `ceil(price * 0.2)` when the trimmed description length is divisible by three.
/// A description that trims to nothing counts as length zero and qualifies.
fn description_bonus(item: &Item) -> Option<u64> {
    let length = item.short_description.trim().chars().count();
    if length % 3 != 0 {
        return None;
    }

    let bonus = (item.price * Decimal::new(2, 1)).ceil();
    Some(bonus.to_u64().unwrap_or(u64::MAX))
}

fn odd_purchase_day(day: u8) -> PointsComponent {
    let odd = day % 2 != 0;
    PointsComponent {
        rule: PointsRule::OddPurchaseDay,
        points: if odd { ODD_DAY_POINTS } else { 0 },
        notes: format!("purchase day {day:02} is {}", if odd { "odd" } else { "even" }),
    }
}

fn afternoon_window(hhmm: u16) -> PointsComponent {
    let inside = AFTERNOON_START < hhmm && hhmm < AFTERNOON_END;
    PointsComponent {
        rule: PointsRule::AfternoonWindow,
        points: if inside { AFTERNOON_POINTS } else { 0 },
        notes: if inside {
            format!("purchased at {hhmm:04}, between 14:00 and 16:00")
        } else {
            format!("purchased at {hhmm:04}, outside 14:00-16:00")
        },
    }
}
