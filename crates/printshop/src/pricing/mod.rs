//! Pricing-rule resolution for configurable print products.
//!
//! A product carries a [`RuleTable`] of range-based rules. [`PriceResolver`]
//! matches the customer's [`Selection`] against it (categorical fields first,
//! then the inclusive numeric band) and adds any addon surcharge.

pub mod addon;
pub mod matcher;
mod normalizer;
pub mod product;
pub mod range;
pub mod resolution;
pub mod resolver;
pub mod rules;
pub mod selection;

#[cfg(test)]
mod tests;

pub use addon::{find_addon, Addon, AddonCharge, CopySelection};
pub use matcher::{Lookup, RangeMatcher};
pub use product::{ProductKind, ProductPricing, QualityPolicy};
pub use range::{InclusiveRange, RangeParseError};
pub use resolution::{PricingError, Resolution};
pub use resolver::PriceResolver;
pub use rules::{
    OffsetRule, OverlapPolicy, PaperRule, PolaroidRule, PriceBasis, PricingRule, PrintColor,
    RuleTable, TableError, TableRule,
};
pub use selection::{CountInput, OffsetSelection, PaperSelection, PolaroidSelection, Selection};

pub(crate) use normalizer::normalize_key;
