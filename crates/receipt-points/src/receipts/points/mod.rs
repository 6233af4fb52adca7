mod rules;

use serde::{Deserialize, Serialize};

use super::domain::Receipt;

/// The fixed scoring rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsRule {
    RetailerAlphanumerics,
    RoundDollarTotal,
    QuarterMultipleTotal,
    ItemPairs,
    DescriptionLength,
    OddPurchaseDay,
    AfternoonWindow,
}

impl PointsRule {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::RetailerAlphanumerics,
            Self::RoundDollarTotal,
            Self::QuarterMultipleTotal,
            Self::ItemPairs,
            Self::DescriptionLength,
            Self::OddPurchaseDay,
            Self::AfternoonWindow,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RetailerAlphanumerics => "Retailer alphanumerics",
            Self::RoundDollarTotal => "Round-dollar total",
            Self::QuarterMultipleTotal => "Quarter-multiple total",
            Self::ItemPairs => "Item pairs",
            Self::DescriptionLength => "Description length",
            Self::OddPurchaseDay => "Odd purchase day",
            Self::AfternoonWindow => "Afternoon window",
        }
    }
}

/// Contribution of one rule, kept so a score can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsComponent {
    pub rule: PointsRule,
    pub points: u64,
    pub notes: String,
}

/// Per-rule contributions and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub components: Vec<PointsComponent>,
    pub total: u64,
}

impl PointsBreakdown {
    pub fn points_for(&self, rule: PointsRule) -> u64 {
        self.components
            .iter()
            .filter(|component| component.rule == rule)
            .map(|component| component.points)
            .fold(0, u64::saturating_add)
    }
}

/// Stateless scorer. Every rule is evaluated for every receipt and the results are summed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointsEngine;

impl PointsEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, receipt: &Receipt) -> PointsBreakdown {
        let components = rules::score_receipt(receipt);
        let total = components
            .iter()
            .map(|component| component.points)
            .fold(0, u64::saturating_add);

        PointsBreakdown { components, total }
    }

    pub fn points(&self, receipt: &Receipt) -> u64 {
        self.score(receipt).total
    }
}
