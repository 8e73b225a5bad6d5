//! Turns remote product documents and CSV rate cards into priceable entries.

mod mapping;
pub mod payload;
pub mod table_csv;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::pricing::{
    Addon, InclusiveRange, OffsetRule, OverlapPolicy, PaperRule, PolaroidRule, PriceBasis,
    PrintColor, ProductKind, ProductPricing, QualityPolicy, RuleTable, TableError,
};

pub use payload::{ProductPayload, RawAddon, RawAttribute, RawPricingRule, RawValue};
pub use table_csv::RuleTableImporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dropdown values advertised for a product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProductOptions {
    pub sizes: Vec<String>,
    pub notice_types: Vec<String>,
    pub qualities: Vec<String>,
    pub colors: Vec<String>,
    pub quantities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: String,
    pub kind: ProductKind,
    pub description: String,
    pub options: ProductOptions,
    pub pricing: ProductPricing,
}

impl CatalogEntry {
    /// Quality options the customer may pick once a notice type is chosen.
    pub fn qualities_for(&self, notice_type: &str) -> Vec<String> {
        match &self.pricing {
            ProductPricing::OffsetPrinting { qualities, .. } => {
                qualities.filter_options(notice_type, &self.options.qualities)
            }
            _ => self.options.qualities.clone(),
        }
    }
}

/// In-memory product lookup loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    entries: HashMap<ProductId, CatalogEntry>,
}

impl ProductCatalog {
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, policy: OverlapPolicy) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, policy)
    }

    /// Reads a JSON array of product-details documents.
    pub fn from_reader<R: Read>(reader: R, policy: OverlapPolicy) -> Result<Self, CatalogError> {
        let payloads: Vec<ProductPayload> = serde_json::from_reader(reader)?;
        let entries = payloads
            .into_iter()
            .map(|payload| payload.into_entry(policy))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::from_entries(entries)?;
        info!(products = catalog.len(), "product catalog loaded");
        Ok(catalog)
    }

    pub fn insert(&mut self, entry: CatalogEntry) -> Result<(), CatalogError> {
        if self.entries.contains_key(&entry.id) {
            return Err(CatalogError::DuplicateProduct(entry.id));
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Columns of one rate-card row before they are typed for a product.
#[derive(Debug, Clone)]
pub(crate) struct RuleFields {
    pub(crate) row: usize,
    pub(crate) size: Option<String>,
    pub(crate) notice_type: Option<String>,
    pub(crate) quality: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) range: Option<String>,
    pub(crate) price: Decimal,
}

impl RuleFields {
    fn required(&self, value: &Option<String>, field: &'static str) -> Result<String, CatalogError> {
        value.clone().ok_or(CatalogError::InvalidRule {
            row: self.row,
            field,
            reason: "value is missing".to_string(),
        })
    }

    fn band(&self, field: &'static str) -> Result<InclusiveRange, CatalogError> {
        let raw = self.required(&self.range, field)?;
        InclusiveRange::parse(&raw).map_err(|err| CatalogError::InvalidRule {
            row: self.row,
            field,
            reason: err.to_string(),
        })
    }

    fn polaroid(&self) -> Result<PolaroidRule, CatalogError> {
        Ok(PolaroidRule {
            size: self.required(&self.size, "Size")?,
            quantity_range: self.band("QuantityRange")?,
            price: self.price,
        })
    }

    fn offset(&self) -> Result<OffsetRule, CatalogError> {
        let notice_type = self.notice_type.clone().or_else(|| self.size.clone());
        Ok(OffsetRule {
            notice_type: self.required(&notice_type, "NoticeType")?,
            quality: self.required(&self.quality, "Quality")?,
            quantity_range: self.band("QuantityRange")?,
            price: self.price,
        })
    }

    fn paper(&self) -> Result<PaperRule, CatalogError> {
        let label = self.required(&self.color, "Color")?;
        let color = PrintColor::from_label(&label).ok_or_else(|| CatalogError::InvalidRule {
            row: self.row,
            field: "Color",
            reason: format!("unknown print colour '{label}'"),
        })?;

        Ok(PaperRule {
            size: self.required(&self.size, "Size")?,
            color,
            page_range: self.band("PageRange")?,
            price: self.price,
        })
    }
}

pub(crate) fn build_pricing(
    kind: ProductKind,
    rows: Vec<RuleFields>,
    addons: Vec<Addon>,
    qualities: QualityPolicy,
    basis: PriceBasis,
    policy: OverlapPolicy,
) -> Result<ProductPricing, CatalogError> {
    if let Some(negative) = rows.iter().find(|row| row.price.is_sign_negative()) {
        return Err(CatalogError::InvalidRule {
            row: negative.row,
            field: "Price",
            reason: "price must not be negative".to_string(),
        });
    }

    let pricing = match kind {
        ProductKind::PolaroidCard => {
            let rules = rows
                .iter()
                .map(RuleFields::polaroid)
                .collect::<Result<Vec<_>, _>>()?;
            ProductPricing::PolaroidCard {
                rules: RuleTable::new(rules, basis, policy)?,
            }
        }
        ProductKind::OffsetPrinting => {
            let rules = rows
                .iter()
                .map(RuleFields::offset)
                .collect::<Result<Vec<_>, _>>()?;
            ProductPricing::OffsetPrinting {
                rules: RuleTable::new(rules, basis, policy)?,
                qualities,
            }
        }
        ProductKind::PaperPrinting => {
            let rules = rows
                .iter()
                .map(RuleFields::paper)
                .collect::<Result<Vec<_>, _>>()?;
            ProductPricing::PaperPrinting {
                rules: RuleTable::new(rules, basis, policy)?,
                addons,
            }
        }
    };

    Ok(pricing)
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Table(TableError),
    UnknownProduct(String),
    DuplicateProduct(ProductId),
    InvalidRule {
        row: usize,
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read pricing data: {}", err),
            CatalogError::Json(err) => write!(f, "invalid product document: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid rate card CSV: {}", err),
            CatalogError::Table(err) => write!(f, "rejected pricing table: {}", err),
            CatalogError::UnknownProduct(name) => {
                write!(f, "product '{}' has no known pricing schema", name)
            }
            CatalogError::DuplicateProduct(id) => write!(f, "product {} listed twice", id),
            CatalogError::InvalidRule { row, field, reason } => {
                write!(f, "pricing rule {} has invalid {}: {}", row, field, reason)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Json(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::Table(err) => Some(err),
            CatalogError::UnknownProduct(_)
            | CatalogError::DuplicateProduct(_)
            | CatalogError::InvalidRule { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<TableError> for CatalogError {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OFFSET: &str = r#"[{
        "ProductID": 21,
        "ProductName": "Offset Printing",
        "Attributes": [
            {"AttributeName": "Notice Type", "Values": ["A4 Notice", "A5 Notice"]},
            {"AttributeName": "Quality", "Values": ["Maplitho", "Art Paper"]}
        ],
        "PricingRules": [
            {"NoticeType": {"ValueName": "A4 Notice"}, "Quality": {"ValueName": "Maplitho"}, "QuantityRange": {"ValueName": "1-10"}, "Price": 1600},
            {"NoticeType": {"ValueName": "A5 Notice"}, "Quality": {"ValueName": "Art Paper"}, "QuantityRange": {"ValueName": "1-10"}, "Price": 1400}
        ],
        "QualityRules": {"A4 Notice": ["MAPLITHO"]}
    }]"#;

    #[test]
    fn catalog_loads_products_and_filters_qualities() {
        let catalog = ProductCatalog::from_reader(Cursor::new(OFFSET), OverlapPolicy::Reject)
            .expect("catalog loads");

        let entry = catalog.get(ProductId(21)).expect("offset product present");
        assert_eq!(entry.kind, ProductKind::OffsetPrinting);
        assert_eq!(entry.qualities_for("A4 Notice"), vec!["Maplitho".to_string()]);
        assert_eq!(entry.qualities_for("A5 Notice").len(), 2);
        assert!(catalog.get(ProductId(99)).is_none());
    }

    #[test]
    fn overlapping_rules_are_rejected_at_ingestion() {
        let payload = r#"[{
            "ProductID": 5,
            "ProductName": "Polaroid Card",
            "PricingRules": [
                {"Size": "A4", "QuantityRange": "1-500", "Price": 2},
                {"Size": "A4", "QuantityRange": "400-900", "Price": 1}
            ]
        }]"#;

        match ProductCatalog::from_reader(Cursor::new(payload), OverlapPolicy::Reject) {
            Err(CatalogError::Table(TableError::OverlappingRanges { .. })) => {}
            other => panic!("expected overlap rejection, got {other:?}"),
        }

        let catalog = ProductCatalog::from_reader(Cursor::new(payload), OverlapPolicy::FirstMatch)
            .expect("first-match tolerates overlap");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn duplicate_products_are_refused() {
        let payload = r#"[
            {"ProductID": 5, "ProductName": "Polaroid Card"},
            {"ProductID": 5, "ProductName": "Polaroid Card"}
        ]"#;

        match ProductCatalog::from_reader(Cursor::new(payload), OverlapPolicy::Reject) {
            Err(CatalogError::DuplicateProduct(id)) => assert_eq!(id, ProductId(5)),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn missing_rule_columns_name_the_row_and_field() {
        let payload = r#"[{
            "ProductID": 8,
            "ProductName": "Paper Printing",
            "PricingRules": [
                {"Size": "A4", "Color": "B/W", "PageRange": "1-50", "Price": 2},
                {"Size": "A4", "PageRange": "51-100", "Price": 2}
            ]
        }]"#;

        match ProductCatalog::from_reader(Cursor::new(payload), OverlapPolicy::Reject) {
            Err(CatalogError::InvalidRule { row, field, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "Color");
            }
            other => panic!("expected invalid rule, got {other:?}"),
        }
    }
}
