use serde::{Deserialize, Deserializer, Serialize};

use super::addon::CopySelection;
use super::product::ProductKind;

/// Numeric field exactly as the customer typed it.
///
/// Kept as text so that "abc" can be reported instead of silently becoming zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CountInput(String);

impl CountInput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Ok(None)` for a blank field; zero, negative or non-integer input is invalid.
    pub fn read(&self) -> Result<Option<u32>, InvalidCount> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        match trimmed.parse::<i64>() {
            Ok(value) if value > 0 => u32::try_from(value)
                .map(Some)
                .map_err(|_| InvalidCount),
            _ => Err(InvalidCount),
        }
    }
}

impl From<u32> for CountInput {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for CountInput {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for CountInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            None => Self::default(),
            Some(Raw::Text(text)) => Self(text),
            Some(Raw::Integer(value)) => Self(value.to_string()),
            Some(Raw::Float(value)) => Self(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCount;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolaroidSelection {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub quantity: CountInput,
}

/// Offset quantities are counted in bundles of 1000 copies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffsetSelection {
    #[serde(default)]
    pub notice_type: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub quantity: CountInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaperSelection {
    #[serde(default)]
    pub size: String,
    /// Colour mode label, e.g. "B/W" or "Color".
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub page_count: CountInput,
    #[serde(default)]
    pub copies: CountInput,
    /// Addon type such as "Spiral Binding"; blank means no addon.
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub copy_selection: CopySelection,
}

/// The customer's in-progress configuration for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum Selection {
    PolaroidCard(PolaroidSelection),
    OffsetPrinting(OffsetSelection),
    PaperPrinting(PaperSelection),
}

impl Selection {
    pub fn kind(&self) -> ProductKind {
        match self {
            Selection::PolaroidCard(_) => ProductKind::PolaroidCard,
            Selection::OffsetPrinting(_) => ProductKind::OffsetPrinting,
            Selection::PaperPrinting(_) => ProductKind::PaperPrinting,
        }
    }

    /// Units sent along with the cart line (quantity, bundles or copies).
    pub fn ordered_units(&self) -> Option<u32> {
        let input = match self {
            Selection::PolaroidCard(selection) => &selection.quantity,
            Selection::OffsetPrinting(selection) => &selection.quantity,
            Selection::PaperPrinting(selection) => &selection.copies,
        };
        input.read().ok().flatten()
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
