use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::mapping::{attribute_kind, title_case, AttributeKind};
use super::{build_pricing, CatalogEntry, CatalogError, ProductId, ProductOptions, RuleFields};
use crate::pricing::{
    Addon, AddonCharge, InclusiveRange, OverlapPolicy, PriceBasis, PrintColor, ProductKind,
    QualityPolicy,
};

/// Product-details document as returned by the remote product API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPayload {
    #[serde(rename = "ProductID")]
    pub product_id: u64,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
    #[serde(default)]
    pub pricing_rules: Vec<RawPricingRule>,
    #[serde(default)]
    pub addons: Vec<RawAddon>,
    #[serde(default)]
    pub price_basis: Option<PriceBasis>,
    #[serde(default)]
    pub quality_rules: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAttribute {
    pub attribute_name: String,
    #[serde(default)]
    pub values: Vec<RawValue>,
}

/// Attribute values arrive either bare or wrapped as `{"ValueName": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Named {
        #[serde(rename = "ValueName")]
        value_name: String,
    },
}

impl RawValue {
    pub fn value(&self) -> &str {
        match self {
            RawValue::Text(text) => text,
            RawValue::Named { value_name } => value_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPricingRule {
    #[serde(default)]
    pub size: Option<RawValue>,
    #[serde(default)]
    pub notice_type: Option<RawValue>,
    #[serde(default)]
    pub quality: Option<RawValue>,
    #[serde(default)]
    pub color: Option<RawValue>,
    #[serde(default)]
    pub quantity_range: Option<RawValue>,
    #[serde(default)]
    pub page_range: Option<RawValue>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAddon {
    pub addon_type: String,
    #[serde(default)]
    pub size: Option<RawValue>,
    #[serde(default)]
    pub color: Option<RawValue>,
    #[serde(default)]
    pub page_range: Option<RawValue>,
    pub price: Decimal,
    #[serde(default)]
    pub charge: Option<AddonCharge>,
}

fn text(value: Option<RawValue>) -> Option<String> {
    value
        .map(|value| value.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ProductPayload {
    pub fn kind(&self) -> Result<ProductKind, CatalogError> {
        ProductKind::from_name(&self.product_name)
            .ok_or_else(|| CatalogError::UnknownProduct(self.product_name.clone()))
    }

    pub fn into_entry(self, policy: OverlapPolicy) -> Result<CatalogEntry, CatalogError> {
        let kind = self.kind()?;
        let options = extract_options(&self.attributes);

        let rows = self
            .pricing_rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| RuleFields {
                row: index + 1,
                size: text(rule.size),
                notice_type: text(rule.notice_type),
                quality: text(rule.quality),
                color: text(rule.color),
                range: text(rule.quantity_range.or(rule.page_range)),
                price: rule.price,
            })
            .collect();

        let addons = self
            .addons
            .into_iter()
            .enumerate()
            .map(|(index, addon)| convert_addon(index + 1, addon))
            .collect::<Result<Vec<_>, _>>()?;

        let qualities = self
            .quality_rules
            .iter()
            .fold(QualityPolicy::default(), |policy, (notice_type, allowed)| {
                policy.allow(notice_type, allowed)
            });

        let basis = self.price_basis.unwrap_or(PriceBasis::PerUnit);
        let pricing = build_pricing(kind, rows, addons, qualities, basis, policy)?;

        Ok(CatalogEntry {
            id: ProductId(self.product_id),
            name: title_case(&self.product_name),
            kind,
            description: self.description.unwrap_or_default(),
            options,
            pricing,
        })
    }
}

fn extract_options(attributes: &[RawAttribute]) -> ProductOptions {
    let mut options = ProductOptions::default();

    for attribute in attributes {
        let Some(kind) = attribute_kind(&attribute.attribute_name) else {
            continue;
        };
        let values = attribute
            .values
            .iter()
            .map(|value| value.value().trim().to_string());

        let target = match kind {
            AttributeKind::Size => &mut options.sizes,
            AttributeKind::NoticeType => &mut options.notice_types,
            AttributeKind::Quality => &mut options.qualities,
            AttributeKind::Color => &mut options.colors,
            AttributeKind::Quantity => &mut options.quantities,
        };
        target.extend(values);
    }

    options
}

fn convert_addon(row: usize, addon: RawAddon) -> Result<Addon, CatalogError> {
    let color = match text(addon.color) {
        Some(label) => Some(PrintColor::from_label(&label).ok_or_else(|| {
            CatalogError::InvalidRule {
                row,
                field: "Color",
                reason: format!("unknown print colour '{label}'"),
            }
        })?),
        None => None,
    };

    let page_range = match text(addon.page_range) {
        Some(raw) => Some(InclusiveRange::parse(&raw).map_err(|err| CatalogError::InvalidRule {
            row,
            field: "PageRange",
            reason: err.to_string(),
        })?),
        None => None,
    };

    Ok(Addon {
        addon_type: addon.addon_type.trim().to_string(),
        size: text(addon.size),
        color,
        page_range,
        price: addon.price,
        charge: addon.charge.unwrap_or_default(),
    })
}
