use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalizer::keys_equal;
use super::range::InclusiveRange;
use super::rules::PrintColor;

/// How an addon surcharge scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonCharge {
    /// Charged once for every copy that receives the addon.
    #[default]
    PerCopy,
    /// Charged once per order line.
    Flat,
}

/// Optional finishing service such as spiral or hard binding.
///
/// Unset constraints apply to every selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub addon_type: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<PrintColor>,
    #[serde(default)]
    pub page_range: Option<InclusiveRange>,
    pub price: Decimal,
    #[serde(default)]
    pub charge: AddonCharge,
}

impl Addon {
    pub fn applies_to(&self, addon_type: &str, size: &str, color: PrintColor, pages: u32) -> bool {
        keys_equal(&self.addon_type, addon_type)
            && self
                .size
                .as_deref()
                .map_or(true, |wanted| keys_equal(wanted, size))
            && self.color.map_or(true, |wanted| wanted == color)
            && self
                .page_range
                .map_or(true, |range| range.contains(pages))
    }

    pub fn total(&self, book_count: u32) -> Option<Decimal> {
        match self.charge {
            AddonCharge::PerCopy => self.price.checked_mul(Decimal::from(book_count)),
            AddonCharge::Flat => Some(self.price),
        }
    }
}

/// First applicable addon in table order.
pub fn find_addon<'a>(
    addons: &'a [Addon],
    addon_type: &str,
    size: &str,
    color: PrintColor,
    pages: u32,
) -> Option<&'a Addon> {
    addons
        .iter()
        .find(|addon| addon.applies_to(addon_type, size, color, pages))
}

/// Which copies receive the selected addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "count", rename_all = "snake_case")]
pub enum CopySelection {
    #[default]
    All,
    Custom(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiral(size: Option<&str>, color: Option<PrintColor>, pages: Option<&str>) -> Addon {
        Addon {
            addon_type: "Spiral Binding".to_string(),
            size: size.map(str::to_string),
            color,
            page_range: pages.map(|band| InclusiveRange::parse(band).expect("valid band")),
            price: Decimal::from(30),
            charge: AddonCharge::PerCopy,
        }
    }

    #[test]
    fn unconstrained_addon_applies_everywhere() {
        let addon = spiral(None, None, None);
        assert!(addon.applies_to("spiral binding", "A3", PrintColor::Color, 900));
        assert!(!addon.applies_to("Hard Binding", "A3", PrintColor::Color, 900));
    }

    #[test]
    fn page_range_constraint_is_inclusive() {
        let addons = vec![
            spiral(Some("A4"), Some(PrintColor::BlackAndWhite), Some("1-100")),
            spiral(Some("A4"), Some(PrintColor::BlackAndWhite), Some("101-300")),
        ];

        let found = find_addon(&addons, "Spiral Binding", "a4", PrintColor::BlackAndWhite, 100)
            .expect("first band matches its upper bound");
        assert_eq!(found.page_range.map(|r| r.max()), Some(100));

        assert!(find_addon(&addons, "Spiral Binding", "A4", PrintColor::BlackAndWhite, 301).is_none());
        assert!(find_addon(&addons, "Spiral Binding", "A4", PrintColor::Color, 50).is_none());
    }

    #[test]
    fn charge_mode_controls_total() {
        let mut addon = spiral(None, None, None);
        assert_eq!(addon.total(4), Some(Decimal::from(120)));
        addon.charge = AddonCharge::Flat;
        assert_eq!(addon.total(4), Some(Decimal::from(30)));
    }

    #[test]
    fn copy_selection_uses_mode_tag() {
        let custom: CopySelection =
            serde_json::from_str(r#"{"mode":"custom","count":3}"#).expect("custom parses");
        assert_eq!(custom, CopySelection::Custom(3));
        let all: CopySelection = serde_json::from_str(r#"{"mode":"all"}"#).expect("all parses");
        assert_eq!(all, CopySelection::All);
    }
}
