use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::service::CartIntent;
use super::session::SessionId;
use crate::catalog::ProductId;
use crate::pricing::{Addon, PricingRule, Selection};

/// Priced line handed to the remote cart service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub product_name: String,
    pub document_id: String,
    pub selection: Selection,
    pub rule: PricingRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon: Option<Addon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    pub base_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_price: Option<Decimal>,
    pub price: Decimal,
    pub currency: String,
    pub added_at: DateTime<Utc>,
}

/// Selection parked while an anonymous customer signs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCartItem {
    pub product_id: ProductId,
    pub selection: Selection,
    pub document_id: String,
    pub intent: CartIntent,
    pub stashed_at: DateTime<Utc>,
}

/// Remote cart API.
pub trait CartGateway: Send + Sync {
    fn add_item(&self, line: &CartLine) -> Result<(), GatewayError>;
}

/// At most one parked item per session; stashing again replaces it.
pub trait PendingCartStore: Send + Sync {
    fn stash(&self, session: &SessionId, item: PendingCartItem) -> Result<(), GatewayError>;
    fn take(&self, session: &SessionId) -> Result<Option<PendingCartItem>, GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("cart service rejected the item: {0}")]
    Rejected(String),
    #[error("cart service unavailable: {0}")]
    Unavailable(String),
}
