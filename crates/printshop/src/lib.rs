//! Pricing-rule resolution and cart gating for a print-on-demand storefront.

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
