use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::addon::Addon;
use super::product::ProductKind;
use super::rules::PricingRule;

/// Result of pricing one selection.
///
/// An incomplete selection leaves every field empty; a rejected one only
/// carries `error`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Resolution {
    pub rule: Option<PricingRule>,
    pub addon: Option<Addon>,
    pub base_price: Option<Decimal>,
    pub addon_price: Option<Decimal>,
    pub price: Option<Decimal>,
    pub error: Option<PricingError>,
}

impl Resolution {
    pub fn incomplete() -> Self {
        Self::default()
    }

    pub fn rejected(error: PricingError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn priced(
        rule: PricingRule,
        base_price: Decimal,
        addon: Option<(Addon, Decimal)>,
    ) -> Result<Self, PricingError> {
        let (addon, addon_price) = match addon {
            Some((addon, charge)) => (Some(addon), Some(charge)),
            None => (None, None),
        };
        let price = base_price
            .checked_add(addon_price.unwrap_or(Decimal::ZERO))
            .ok_or(PricingError::PriceOverflow)?;

        Ok(Self {
            rule: Some(rule),
            addon,
            base_price: Some(base_price),
            addon_price,
            price: Some(price),
            error: None,
        })
    }

    pub fn is_priced(&self) -> bool {
        self.rule.is_some() && self.price.is_some()
    }
}

/// Reasons a selection could not be priced, worded for the customer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Please enter a valid quantity.")]
    InvalidQuantity,
    #[error("Please enter a valid page count.")]
    InvalidPageCount,
    #[error("Please enter a valid number of copies.")]
    InvalidCopies,
    #[error("print colour '{0}' is not offered")]
    UnknownColor(String),
    #[error("not available for the selected options")]
    NotAvailable,
    #[error("out of range")]
    OutOfRange,
    #[error("quality '{quality}' is not offered for {notice_type}")]
    QualityNotOffered {
        notice_type: String,
        quality: String,
    },
    #[error("'{0}' is not available for this size, colour and page count")]
    AddonNotAvailable(String),
    #[error("cannot bind {custom} copies out of {copies}")]
    CustomCopiesExceedCopies { custom: u32, copies: u32 },
    #[error("the total for this selection is too large to price")]
    PriceOverflow,
    #[error("selection for {found} cannot be priced against {expected} rules")]
    ProductMismatch {
        expected: ProductKind,
        found: ProductKind,
    },
}

impl Serialize for PricingError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
