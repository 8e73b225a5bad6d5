use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::{build_pricing, CatalogError, RuleFields};
use crate::pricing::{OverlapPolicy, PriceBasis, ProductKind, ProductPricing, QualityPolicy};

/// Loads a flat rate card exported as CSV.
///
/// Headers: `Size`, `Notice Type`, `Quality`, `Color`, `Range` (or
/// `Quantity Range` / `Page Range`) and `Price`. Columns a product does not
/// use may be left out. Rate cards carry neither addons nor quality rules;
/// load a catalog when those are needed.
pub struct RuleTableImporter;

impl RuleTableImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        kind: ProductKind,
        basis: PriceBasis,
        policy: OverlapPolicy,
    ) -> Result<ProductPricing, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, kind, basis, policy)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        kind: ProductKind,
        basis: PriceBasis,
        policy: OverlapPolicy,
    ) -> Result<ProductPricing, CatalogError> {
        let rows = parse_rows(reader)?;
        debug!(%kind, rows = rows.len(), "rate card parsed");
        build_pricing(kind, rows, Vec::new(), QualityPolicy::default(), basis, policy)
    }
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<RuleFields>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RateCardRow>().enumerate() {
        let row = record?;
        // header occupies line 1
        let line = index + 2;
        let price = Decimal::from_str(&row.price).map_err(|err| CatalogError::InvalidRule {
            row: line,
            field: "Price",
            reason: err.to_string(),
        })?;

        rows.push(RuleFields {
            row: line,
            size: row.size,
            notice_type: row.notice_type,
            quality: row.quality,
            color: row.color,
            range: row.range,
            price,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RateCardRow {
    #[serde(rename = "Size", default, deserialize_with = "empty_string_as_none")]
    size: Option<String>,
    #[serde(
        rename = "Notice Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    notice_type: Option<String>,
    #[serde(rename = "Quality", default, deserialize_with = "empty_string_as_none")]
    quality: Option<String>,
    #[serde(
        rename = "Color",
        alias = "Colour",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    color: Option<String>,
    #[serde(
        rename = "Range",
        alias = "Quantity Range",
        alias = "Page Range",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    range: Option<String>,
    #[serde(rename = "Price")]
    price: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
