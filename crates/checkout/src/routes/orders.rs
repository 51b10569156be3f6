//! Order attribute route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use civic_checkout_core::{AttributeKey, OrderId};

use super::checkout::CartRequest;
use crate::error::{AppError, Result};
use crate::services::notice::display_label;
use crate::services::{CheckoutSubmission, PersistedAttributes, process_submission};
use crate::state::AppState;

/// Checkout form submission for a new order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub cart: CartRequest,
    #[serde(flatten)]
    pub submission: CheckoutSubmission,
}

/// Stored identity numbers of an order.
#[derive(Debug, Serialize)]
pub struct OrderAttributesResponse {
    pub order_id: OrderId,
    pub attributes: PersistedAttributes,
}

/// Validate the submitted numbers and store them on the order.
#[instrument(skip_all, fields(order_id = %order_id, items = tracing::field::Empty))]
pub async fn create(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    body: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderAttributesResponse>)> {
    let Json(request) = body?;
    tracing::Span::current().record("items", request.cart.items.len());
    let decision = state.evaluate_cart(&request.cart.product_ids());

    let attributes = process_submission(
        state.orders(),
        order_id,
        &request.submission,
        &decision,
        state.policy(),
        state.rules().enforce_required,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(OrderAttributesResponse {
            order_id,
            attributes,
        }),
    ))
}

/// All stored identity numbers of an order.
#[instrument(skip(state))]
pub async fn attributes(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderAttributesResponse>> {
    let attributes = state.orders().read_all(order_id)?;
    Ok(Json(OrderAttributesResponse {
        order_id,
        attributes,
    }))
}

/// One stored identity number of an order, as plain text.
#[instrument(skip(state))]
pub async fn attribute(
    State(state): State<AppState>,
    Path((order_id, key)): Path<(OrderId, String)>,
) -> Result<String> {
    let key: AttributeKey = key
        .parse()
        .map_err(|e: civic_checkout_core::UnknownAttributeKey| AppError::BadRequest(e.to_string()))?;

    state
        .orders()
        .read(order_id, key)?
        .ok_or_else(|| AppError::NotFound(format!("{} for order {order_id}", display_label(key))))
}
