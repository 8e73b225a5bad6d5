use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryCartGateway, InMemoryPendingStore};
use crate::routes::with_storefront_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use printshop::checkout::CheckoutService;
use printshop::config::AppConfig;
use printshop::error::AppError;
use printshop::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(&config.pricing)?;
    let products = catalog.len();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        products,
    };

    let checkout_service = Arc::new(
        CheckoutService::new(
            Arc::new(catalog),
            Arc::new(InMemoryCartGateway::default()),
            Arc::new(InMemoryPendingStore::default()),
        )
        .with_currency(config.pricing.currency.clone()),
    );

    let app = with_storefront_routes(checkout_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        products,
        policy = ?config.pricing.overlap_policy,
        "storefront pricing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
