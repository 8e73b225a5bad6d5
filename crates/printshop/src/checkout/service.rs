use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::gateway::{CartGateway, CartLine, GatewayError, PendingCartItem, PendingCartStore};
use super::session::SessionContext;
use crate::catalog::{CatalogEntry, ProductCatalog, ProductId};
use crate::pricing::{PriceResolver, PricingError, Resolution, Selection};

/// Where the storefront sends the customer once the item is in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartIntent {
    #[default]
    AddToCart,
    ProceedToCart,
}

impl CartIntent {
    pub fn redirect(&self) -> &'static str {
        match self {
            CartIntent::AddToCart => "/",
            CartIntent::ProceedToCart => "/Cart",
        }
    }
}

const RESUMED_REDIRECT: &str = "/Cart";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRequest {
    pub product_id: ProductId,
    pub selection: Selection,
    /// Id returned by the upload service for the customer's artwork.
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub intent: CartIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Added { line: CartLine, redirect: String },
    LoginRequired { redirect: String },
}

impl CheckoutOutcome {
    pub fn redirect(&self) -> &str {
        match self {
            CheckoutOutcome::Added { redirect, .. } | CheckoutOutcome::LoginRequired { redirect } => {
                redirect
            }
        }
    }
}

/// Price preview for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub product_id: ProductId,
    pub product_name: String,
    pub currency: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

/// Prices selections against the catalog and gates the cart mutation.
pub struct CheckoutService<G, P> {
    catalog: Arc<ProductCatalog>,
    cart: Arc<G>,
    pending: Arc<P>,
    currency: String,
}

impl<G, P> CheckoutService<G, P>
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    pub fn new(catalog: Arc<ProductCatalog>, cart: Arc<G>, pending: Arc<P>) -> Self {
        Self {
            catalog,
            cart,
            pending,
            currency: "INR".to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn product(&self, product_id: ProductId) -> Result<&CatalogEntry, CheckoutError> {
        self.catalog
            .get(product_id)
            .ok_or(CheckoutError::UnknownProduct(product_id))
    }

    pub fn quote(&self, product_id: ProductId, selection: &Selection) -> Result<Quote, CheckoutError> {
        let entry = self.product(product_id)?;
        Ok(Quote {
            product_id,
            product_name: entry.name.clone(),
            currency: self.currency.clone(),
            resolution: PriceResolver::resolve(&entry.pricing, selection),
        })
    }

    /// Adds the selection to the cart, or parks it until the customer signs in.
    pub fn submit(
        &self,
        session: &SessionContext,
        request: CartRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let entry = self.product(request.product_id)?;
        let resolution = PriceResolver::resolve(&entry.pricing, &request.selection);
        if !resolution.is_priced() {
            return Err(CheckoutError::not_priceable(resolution.error.as_ref()));
        }

        let document_id = request
            .document_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(CheckoutError::MissingDocument)?;

        if !session.is_authenticated() {
            let item = PendingCartItem {
                product_id: request.product_id,
                selection: request.selection,
                document_id,
                intent: request.intent,
                stashed_at: Utc::now(),
            };
            self.pending.stash(&session.session_id, item)?;
            info!(session = %session.session_id, product = %request.product_id, "cart item parked until sign-in");

            return Ok(CheckoutOutcome::LoginRequired {
                redirect: format!("/auth/signin?redirect={}", request.intent.redirect()),
            });
        }

        let line = self.cart_line(session, entry, request.selection, document_id, resolution)?;
        self.cart.add_item(&line)?;
        info!(session = %session.session_id, product = %line.product_id, price = %line.price, "cart item added");

        Ok(CheckoutOutcome::Added {
            line,
            redirect: request.intent.redirect().to_string(),
        })
    }

    /// Replays the item parked before sign-in. Nothing parked yields `Ok(None)`.
    pub fn resume_pending(
        &self,
        session: &SessionContext,
    ) -> Result<Option<CheckoutOutcome>, CheckoutError> {
        if !session.is_authenticated() {
            return Err(CheckoutError::Unauthenticated);
        }

        let Some(item) = self.pending.take(&session.session_id)? else {
            return Ok(None);
        };

        match self.replay(session, &item) {
            Ok(line) => {
                info!(session = %session.session_id, product = %line.product_id, "parked cart item added after sign-in");
                Ok(Some(CheckoutOutcome::Added {
                    line,
                    redirect: RESUMED_REDIRECT.to_string(),
                }))
            }
            Err(error @ CheckoutError::NotPriceable { .. }) => {
                warn!(session = %session.session_id, product = %item.product_id, "parked item no longer prices; dropping it");
                Err(error)
            }
            Err(error) => {
                warn!(session = %session.session_id, product = %item.product_id, %error, "parked item not added; keeping it for the next attempt");
                self.pending.stash(&session.session_id, item)?;
                Err(error)
            }
        }
    }

    fn replay(
        &self,
        session: &SessionContext,
        item: &PendingCartItem,
    ) -> Result<CartLine, CheckoutError> {
        let entry = self.product(item.product_id)?;
        let resolution = PriceResolver::resolve(&entry.pricing, &item.selection);
        if !resolution.is_priced() {
            return Err(CheckoutError::not_priceable(resolution.error.as_ref()));
        }

        let line = self.cart_line(
            session,
            entry,
            item.selection.clone(),
            item.document_id.clone(),
            resolution,
        )?;
        self.cart.add_item(&line)?;
        Ok(line)
    }

    fn cart_line(
        &self,
        session: &SessionContext,
        entry: &CatalogEntry,
        selection: Selection,
        document_id: String,
        resolution: Resolution,
    ) -> Result<CartLine, CheckoutError> {
        let (Some(rule), Some(base_price), Some(price)) =
            (resolution.rule, resolution.base_price, resolution.price)
        else {
            return Err(CheckoutError::not_priceable(resolution.error.as_ref()));
        };

        Ok(CartLine {
            session_id: session.session_id.clone(),
            product_id: entry.id,
            product_name: entry.name.clone(),
            document_id,
            units: selection.ordered_units(),
            selection,
            rule,
            addon: resolution.addon,
            base_price,
            addon_price: resolution.addon_price,
            price,
            currency: self.currency.clone(),
            added_at: Utc::now(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
    #[error("selection cannot be priced: {reason}")]
    NotPriceable { reason: String },
    #[error("upload a document before adding this item to the cart")]
    MissingDocument,
    #[error("sign in to continue with the saved cart item")]
    Unauthenticated,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    fn not_priceable(error: Option<&PricingError>) -> Self {
        let reason = match error {
            Some(error) => error.to_string(),
            None => "Please select all options before adding to the cart.".to_string(),
        };
        Self::NotPriceable { reason }
    }
}
