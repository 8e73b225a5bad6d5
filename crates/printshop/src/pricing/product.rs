use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::addon::Addon;
use super::normalizer::normalize_key;
use super::rules::{OffsetRule, PaperRule, PolaroidRule, RuleTable};

/// Product families with their own pricing schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    PolaroidCard,
    OffsetPrinting,
    PaperPrinting,
}

impl ProductKind {
    /// Resolves the storefront product name ("Polaroid Card", "Offset Printing", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize_key(name);
        if normalized.contains("polaroid") {
            Some(Self::PolaroidCard)
        } else if normalized.contains("offset") {
            Some(Self::OffsetPrinting)
        } else if normalized.contains("paper print") || normalized.contains("document print") {
            Some(Self::PaperPrinting)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::PolaroidCard => "Polaroid Card",
            ProductKind::OffsetPrinting => "Offset Printing",
            ProductKind::PaperPrinting => "Paper Printing",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualities each offset notice type may be printed on.
///
/// Notice types without an entry accept every quality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityPolicy {
    allowed: BTreeMap<String, Vec<String>>,
}

impl QualityPolicy {
    pub fn allow<I, S>(mut self, notice_type: &str, qualities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let qualities = qualities
            .into_iter()
            .map(|quality| normalize_key(quality.as_ref()))
            .collect();
        self.allowed.insert(normalize_key(notice_type), qualities);
        self
    }

    pub fn allows(&self, notice_type: &str, quality: &str) -> bool {
        match self.allowed.get(&normalize_key(notice_type)) {
            Some(qualities) => {
                let wanted = normalize_key(quality);
                qualities.iter().any(|allowed| *allowed == wanted)
            }
            None => true,
        }
    }

    /// Narrows the quality dropdown for the chosen notice type.
    pub fn filter_options(&self, notice_type: &str, options: &[String]) -> Vec<String> {
        options
            .iter()
            .filter(|quality| self.allows(notice_type, quality))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Everything the resolver needs to price one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum ProductPricing {
    PolaroidCard {
        rules: RuleTable<PolaroidRule>,
    },
    OffsetPrinting {
        rules: RuleTable<OffsetRule>,
        qualities: QualityPolicy,
    },
    PaperPrinting {
        rules: RuleTable<PaperRule>,
        addons: Vec<Addon>,
    },
}

impl ProductPricing {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductPricing::PolaroidCard { .. } => ProductKind::PolaroidCard,
            ProductPricing::OffsetPrinting { .. } => ProductKind::OffsetPrinting,
            ProductPricing::PaperPrinting { .. } => ProductKind::PaperPrinting,
        }
    }

    pub fn rule_count(&self) -> usize {
        match self {
            ProductPricing::PolaroidCard { rules } => rules.len(),
            ProductPricing::OffsetPrinting { rules, .. } => rules.len(),
            ProductPricing::PaperPrinting { rules, .. } => rules.len(),
        }
    }
}
