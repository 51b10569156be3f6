//! Checkout route handlers.
//!
//! Carts are sent as product IDs and resolved against the configured catalog.
//! Draft numbers are kept in the session for pre-filling the form.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use civic_checkout_core::{ProductId, ShippingRateSet};

use crate::error::Result;
use crate::models::CheckoutDraft;
use crate::services::{CategoryDecision, FieldDescriptor, adjust_rates};
use crate::state::AppState;

/// A cart line as sent by the storefront.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineItemRef {
    pub product_id: ProductId,
}

/// Cart contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub items: Vec<LineItemRef>,
}

impl CartRequest {
    /// Product IDs in cart order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|item| item.product_id).collect()
    }
}

/// Fields to render for a cart.
#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub decision: CategoryDecision,
    pub fields: Vec<FieldDescriptor>,
}

/// Shipping rates for a cart package.
#[derive(Debug, Deserialize)]
pub struct RatesRequest {
    #[serde(flatten)]
    pub cart: CartRequest,
    pub rates: ShippingRateSet,
}

/// Adjusted shipping rates.
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub free_shipping: bool,
    pub rates: ShippingRateSet,
}

/// Decide which identity number fields to show for a cart.
#[instrument(skip_all, fields(items = tracing::field::Empty))]
pub async fn fields(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<CartRequest>, JsonRejection>,
) -> Result<Json<FieldsResponse>> {
    let Json(cart) = body?;
    tracing::Span::current().record("items", cart.items.len());
    let draft = CheckoutDraft::load(&session).await?;
    let decision = state.evaluate_cart(&cart.product_ids());
    let fields = state.policy().fields(&decision, &draft);

    Ok(Json(FieldsResponse { decision, fields }))
}

/// Save draft identity numbers for pre-filling the checkout form.
#[instrument(skip_all)]
pub async fn save_session(
    session: Session,
    body: std::result::Result<Json<CheckoutDraft>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(draft) = body?;
    draft.save(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Zero shipping for carts with subscription products.
#[instrument(skip_all, fields(items = tracing::field::Empty))]
pub async fn rates(
    State(state): State<AppState>,
    body: std::result::Result<Json<RatesRequest>, JsonRejection>,
) -> Result<Json<RatesResponse>> {
    let Json(request) = body?;
    tracing::Span::current().record("items", request.cart.items.len());
    let decision = state.evaluate_cart(&request.cart.product_ids());

    Ok(Json(RatesResponse {
        free_shipping: decision.free_shipping,
        rates: adjust_rates(decision.free_shipping, request.rates),
    }))
}
