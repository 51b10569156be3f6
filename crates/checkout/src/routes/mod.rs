//! HTTP route handlers for the checkout service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Health check
//!
//! # Checkout
//! POST /checkout/fields                      - Category decision and number fields for a cart
//! PUT  /checkout/session                     - Save draft numbers for pre-fill
//! POST /checkout/rates                       - Adjust shipping rates for a cart
//! POST /checkout/orders/{order_id}           - Validate and store numbers for a new order
//!
//! # Orders (read by admin, thank-you page and email renderers)
//! GET  /orders/{order_id}/attributes         - All stored numbers
//! GET  /orders/{order_id}/attributes/{key}   - One stored number
//! ```

pub mod checkout;
pub mod orders;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/fields", post(checkout::fields))
        .route("/session", put(checkout::save_session))
        .route("/rates", post(checkout::rates))
        .route("/orders/{order_id}", post(orders::create))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/{order_id}/attributes", get(orders::attributes))
        .route("/{order_id}/attributes/{key}", get(orders::attribute))
}

/// Create all routes for the checkout service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
}

/// Build the complete application with middleware and state applied.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
