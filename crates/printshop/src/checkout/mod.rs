//! Cart gating for priced selections.
//!
//! Authentication and cart persistence live in external services reached
//! through [`CartGateway`] and [`PendingCartStore`]; callers pass the
//! [`SessionContext`] explicitly.

pub mod gateway;
pub mod router;
pub mod service;
pub mod session;

pub use gateway::{CartGateway, CartLine, GatewayError, PendingCartItem, PendingCartStore};
pub use router::storefront_router;
pub use service::{
    CartIntent, CartRequest, CheckoutError, CheckoutOutcome, CheckoutService, Quote,
};
pub use session::{AuthenticatedUser, SessionContext, SessionError, SessionId};
