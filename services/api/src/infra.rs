use clap::ValueEnum;
use metrics_exporter_prometheus::PrometheusHandle;
use printshop::catalog::ProductCatalog;
use printshop::checkout::{
    CartGateway, CartLine, GatewayError, PendingCartItem, PendingCartStore, SessionId,
};
use printshop::config::PricingConfig;
use printshop::error::AppError;
use printshop::pricing::{OverlapPolicy, PriceBasis, ProductKind};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) products: usize,
}

/// Stands in for the remote cart API until one is wired up.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCartGateway {
    lines: Arc<Mutex<Vec<CartLine>>>,
}

impl CartGateway for InMemoryCartGateway {
    fn add_item(&self, line: &CartLine) -> Result<(), GatewayError> {
        let mut guard = self
            .lines
            .lock()
            .map_err(|_| GatewayError::Unavailable("cart mutex poisoned".to_string()))?;
        guard.push(line.clone());
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryCartGateway {
    pub(crate) fn lines(&self) -> Vec<CartLine> {
        self.lines
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPendingStore {
    items: Arc<Mutex<HashMap<SessionId, PendingCartItem>>>,
}

impl PendingCartStore for InMemoryPendingStore {
    fn stash(&self, session: &SessionId, item: PendingCartItem) -> Result<(), GatewayError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|_| GatewayError::Unavailable("pending store mutex poisoned".to_string()))?;
        guard.insert(session.clone(), item);
        Ok(())
    }

    fn take(&self, session: &SessionId) -> Result<Option<PendingCartItem>, GatewayError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|_| GatewayError::Unavailable("pending store mutex poisoned".to_string()))?;
        Ok(guard.remove(session))
    }
}

pub(crate) fn load_catalog(config: &PricingConfig) -> Result<ProductCatalog, AppError> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = ProductCatalog::from_path(path, config.overlap_policy)?;
            info!(path = %path.display(), products = catalog.len(), "pricing catalog ready");
            Ok(catalog)
        }
        None => {
            warn!("PRICING_CATALOG is not set; serving an empty catalog");
            Ok(ProductCatalog::default())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    Polaroid,
    Offset,
    Paper,
}

impl From<KindArg> for ProductKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Polaroid => ProductKind::PolaroidCard,
            KindArg::Offset => ProductKind::OffsetPrinting,
            KindArg::Paper => ProductKind::PaperPrinting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum BasisArg {
    Flat,
    #[default]
    PerUnit,
}

impl From<BasisArg> for PriceBasis {
    fn from(value: BasisArg) -> Self {
        match value {
            BasisArg::Flat => PriceBasis::Flat,
            BasisArg::PerUnit => PriceBasis::PerUnit,
        }
    }
}

pub(crate) fn overlap_policy(first_match: bool) -> OverlapPolicy {
    if first_match {
        OverlapPolicy::FirstMatch
    } else {
        OverlapPolicy::Reject
    }
}
