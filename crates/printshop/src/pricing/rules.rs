use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::normalizer::normalize_key;
use super::range::InclusiveRange;

/// Print colour mode offered for paper printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintColor {
    #[serde(alias = "B/W", alias = "BW")]
    BlackAndWhite,
    #[serde(alias = "Colour")]
    Color,
}

impl PrintColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintColor::BlackAndWhite => "BlackAndWhite",
            PrintColor::Color => "Color",
        }
    }

    /// Accepts both table spellings and the storefront radio labels ("B/W", "Color").
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_key(label).replace([' ', '_', '-'], "").as_str() {
            "b/w" | "bw" | "blackandwhite" | "blackwhite" => Some(PrintColor::BlackAndWhite),
            "color" | "colour" => Some(PrintColor::Color),
            _ => None,
        }
    }
}

/// How the matched rule price turns into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Rule price is the total for the band.
    Flat,
    /// Rule price is charged per unit of the matched value.
    PerUnit,
}

impl PriceBasis {
    /// `None` when the total does not fit in a `Decimal`.
    pub fn total(&self, price: Decimal, value: u32) -> Option<Decimal> {
        match self {
            PriceBasis::Flat => Some(price),
            PriceBasis::PerUnit => price.checked_mul(Decimal::from(value)),
        }
    }
}

/// What to do with tables whose ranges overlap for the same attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    #[default]
    Reject,
    FirstMatch,
}

impl OverlapPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Some(Self::Reject),
            "first-match" | "first_match" | "first" => Some(Self::FirstMatch),
            _ => None,
        }
    }
}

/// Polaroid cards: size + quantity band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolaroidRule {
    pub size: String,
    pub quantity_range: InclusiveRange,
    pub price: Decimal,
}

/// Offset printing: notice type + quality + quantity band (one unit = 1000 copies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRule {
    pub notice_type: String,
    pub quality: String,
    pub quantity_range: InclusiveRange,
    pub price: Decimal,
}

/// Paper printing: size + colour mode + page-count band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRule {
    pub size: String,
    pub color: PrintColor,
    pub page_range: InclusiveRange,
    pub price: Decimal,
}

/// Matched rule as reported back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum PricingRule {
    PolaroidCard(PolaroidRule),
    OffsetPrinting(OffsetRule),
    PaperPrinting(PaperRule),
}

impl PricingRule {
    pub fn price(&self) -> Decimal {
        match self {
            PricingRule::PolaroidCard(rule) => rule.price,
            PricingRule::OffsetPrinting(rule) => rule.price,
            PricingRule::PaperPrinting(rule) => rule.price,
        }
    }
}

/// Shape shared by every row type stored in a [`RuleTable`].
pub trait TableRule {
    /// Normalized categorical attributes; rules with equal keys must not overlap.
    fn category_key(&self) -> String;
    fn band(&self) -> &InclusiveRange;
    fn unit_price(&self) -> Decimal;
}

impl TableRule for PolaroidRule {
    fn category_key(&self) -> String {
        normalize_key(&self.size)
    }

    fn band(&self) -> &InclusiveRange {
        &self.quantity_range
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }
}

impl TableRule for OffsetRule {
    fn category_key(&self) -> String {
        format!(
            "{}|{}",
            normalize_key(&self.notice_type),
            normalize_key(&self.quality)
        )
    }

    fn band(&self) -> &InclusiveRange {
        &self.quantity_range
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }
}

impl TableRule for PaperRule {
    fn category_key(&self) -> String {
        format!("{}|{}", normalize_key(&self.size), self.color.as_str())
    }

    fn band(&self) -> &InclusiveRange {
        &self.page_range
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }
}

/// Immutable, validated pricing table for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable<R> {
    rules: Vec<R>,
    basis: PriceBasis,
}

impl<R: TableRule> RuleTable<R> {
    pub fn new(rules: Vec<R>, basis: PriceBasis, policy: OverlapPolicy) -> Result<Self, TableError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.unit_price().is_sign_negative() {
                return Err(TableError::NegativePrice { position: index + 1 });
            }
        }

        if let Some(overlap) = find_overlap(&rules) {
            match policy {
                OverlapPolicy::Reject => return Err(overlap),
                OverlapPolicy::FirstMatch => {
                    warn!(%overlap, "accepting overlapping pricing rules; first match wins");
                }
            }
        }

        Ok(Self { rules, basis })
    }
}

impl<R> RuleTable<R> {
    pub fn rules(&self) -> &[R] {
        &self.rules
    }

    pub fn basis(&self) -> PriceBasis {
        self.basis
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn find_overlap<R: TableRule>(rules: &[R]) -> Option<TableError> {
    for (index, rule) in rules.iter().enumerate() {
        let key = rule.category_key();
        for later in &rules[index + 1..] {
            if later.category_key() == key && rule.band().overlaps(later.band()) {
                return Some(TableError::OverlappingRanges {
                    key,
                    first: *rule.band(),
                    second: *later.band(),
                });
            }
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("pricing rules for '{key}' overlap: {first} and {second}")]
    OverlappingRanges {
        key: String,
        first: InclusiveRange,
        second: InclusiveRange,
    },
    /// `position` counts table rules from 1, not source lines.
    #[error("rule {position} in table order carries a negative price")]
    NegativePrice { position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polaroid(size: &str, band: &str, price: i64) -> PolaroidRule {
        PolaroidRule {
            size: size.to_string(),
            quantity_range: InclusiveRange::parse(band).expect("valid band"),
            price: Decimal::from(price),
        }
    }

    #[test]
    fn reject_policy_refuses_overlapping_bands_for_same_size() {
        let rules = vec![polaroid("A4", "1-500", 2), polaroid(" a4", "500-900", 1)];

        let error = RuleTable::new(rules, PriceBasis::PerUnit, OverlapPolicy::Reject)
            .expect_err("overlap rejected");

        match error {
            TableError::OverlappingRanges { key, first, second } => {
                assert_eq!(key, "a4");
                assert_eq!(first.to_string(), "1-500");
                assert_eq!(second.to_string(), "500-900");
            }
            other => panic!("expected overlap error, got {other:?}"),
        }
    }

    #[test]
    fn overlapping_bands_for_different_sizes_are_fine() {
        let rules = vec![polaroid("A4", "1-500", 2), polaroid("A5", "1-500", 1)];
        let table = RuleTable::new(rules, PriceBasis::PerUnit, OverlapPolicy::Reject)
            .expect("distinct sizes accepted");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn first_match_policy_keeps_overlapping_rows_in_order() {
        let rules = vec![polaroid("A4", "1-500", 2), polaroid("A4", "400-900", 1)];
        let table = RuleTable::new(rules, PriceBasis::PerUnit, OverlapPolicy::FirstMatch)
            .expect("overlap tolerated");
        assert_eq!(table.rules()[0].price, Decimal::from(2));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let rules = vec![polaroid("A4", "1-500", -2)];
        assert_eq!(
            RuleTable::new(rules, PriceBasis::Flat, OverlapPolicy::Reject),
            Err(TableError::NegativePrice { position: 1 })
        );
    }

    #[test]
    fn print_color_accepts_storefront_labels() {
        assert_eq!(PrintColor::from_label("B/W"), Some(PrintColor::BlackAndWhite));
        assert_eq!(PrintColor::from_label("Black and White"), Some(PrintColor::BlackAndWhite));
        assert_eq!(PrintColor::from_label("colour"), Some(PrintColor::Color));
        assert_eq!(PrintColor::from_label("sepia"), None);
    }

    #[test]
    fn per_unit_basis_multiplies_by_value() {
        assert_eq!(PriceBasis::PerUnit.total(Decimal::from(2), 500), Some(Decimal::from(1000)));
        assert_eq!(PriceBasis::Flat.total(Decimal::from(2), 500), Some(Decimal::from(2)));
        assert_eq!(PriceBasis::PerUnit.total(Decimal::MAX, 2), None);
    }
}
