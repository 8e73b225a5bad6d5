use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use printshop::checkout::{storefront_router, CartGateway, CheckoutService, PendingCartStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_storefront_routes<G, P>(service: Arc<CheckoutService<G, P>>) -> axum::Router
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    storefront_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "products": state.products })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryCartGateway, InMemoryPendingStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use printshop::catalog::ProductCatalog;
    use printshop::pricing::OverlapPolicy;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    const CATALOG: &str = r#"[{
        "ProductID": 5,
        "ProductName": "Polaroid Card",
        "PricingRules": [{"Size": "A4", "QuantityRange": "1-500", "Price": 2}]
    }]"#;

    fn app(ready: bool) -> (axum::Router, InMemoryCartGateway) {
        let catalog = ProductCatalog::from_reader(CATALOG.as_bytes(), OverlapPolicy::Reject)
            .expect("catalog loads");
        let products = catalog.len();
        let cart = InMemoryCartGateway::default();
        let service = Arc::new(CheckoutService::new(
            Arc::new(catalog),
            Arc::new(cart.clone()),
            Arc::new(InMemoryPendingStore::default()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            products,
        };
        state.readiness.store(ready, Ordering::Release);

        (with_storefront_routes(service).layer(Extension(state)), cart)
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn readiness_reflects_flag_and_catalog_size() {
        let (router, _) = app(false);
        let (status, payload) = get(router, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], json!("initializing"));

        let (router, _) = app(true);
        let (status, payload) = get(router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["products"], json!(1));
    }

    #[tokio::test]
    async fn storefront_routes_share_the_router() {
        let (router, cart) = app(true);
        let (status, payload) = get(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], json!("ok"));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/cart/items")
            .header("content-type", "application/json")
            .header("x-session-id", "tab-9")
            .header("authorization", "Bearer token")
            .body(Body::from(
                json!({
                    "product_id": 5,
                    "selection": {"product": "polaroid_card", "size": "A4", "quantity": 20},
                    "document_id": "upload-3",
                })
                .to_string(),
            ))
            .expect("request");
        let response = router.oneshot(request).await.expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(cart.lines().len(), 1);
    }
}
