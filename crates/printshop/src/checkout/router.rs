use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::gateway::{CartGateway, PendingCartStore};
use super::service::{CartRequest, CheckoutError, CheckoutOutcome, CheckoutService};
use super::session::SessionContext;
use crate::catalog::ProductId;
use crate::pricing::Selection;

/// Router builder exposing product lookup, quoting and the cart gate.
pub fn storefront_router<G, P>(service: Arc<CheckoutService<G, P>>) -> Router
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    Router::new()
        .route("/api/v1/products/:product_id", get(product_handler::<G, P>))
        .route(
            "/api/v1/products/:product_id/quote",
            post(quote_handler::<G, P>),
        )
        .route("/api/v1/cart/items", post(add_item_handler::<G, P>))
        .route("/api/v1/cart/pending", post(resume_handler::<G, P>))
        .with_state(service)
}

pub(crate) async fn product_handler<G, P>(
    State(service): State<Arc<CheckoutService<G, P>>>,
    Path(product_id): Path<u64>,
) -> Response
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    match service.product(ProductId(product_id)) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_handler<G, P>(
    State(service): State<Arc<CheckoutService<G, P>>>,
    Path(product_id): Path<u64>,
    axum::Json(selection): axum::Json<Selection>,
) -> Response
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    match service.quote(ProductId(product_id), &selection) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_item_handler<G, P>(
    State(service): State<Arc<CheckoutService<G, P>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CartRequest>,
) -> Response
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(error) => return bad_request(error.to_string()),
    };

    match service.submit(&session, request) {
        Ok(outcome) => outcome_response(outcome),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resume_handler<G, P>(
    State(service): State<Arc<CheckoutService<G, P>>>,
    headers: HeaderMap,
) -> Response
where
    G: CartGateway + 'static,
    P: PendingCartStore + 'static,
{
    let session = match SessionContext::from_headers(&headers) {
        Ok(session) => session,
        Err(error) => return bad_request(error.to_string()),
    };

    match service.resume_pending(&session) {
        Ok(Some(outcome)) => outcome_response(outcome),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn outcome_response(outcome: CheckoutOutcome) -> Response {
    let status = match outcome {
        CheckoutOutcome::Added { .. } => StatusCode::CREATED,
        CheckoutOutcome::LoginRequired { .. } => StatusCode::ACCEPTED,
    };
    (status, axum::Json(outcome)).into_response()
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: CheckoutError) -> Response {
    let status = match &error {
        CheckoutError::UnknownProduct(_) => StatusCode::NOT_FOUND,
        CheckoutError::NotPriceable { .. } | CheckoutError::MissingDocument => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CheckoutError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CheckoutError::Gateway(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
