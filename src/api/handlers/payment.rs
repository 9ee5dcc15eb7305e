//! Payment order endpoint handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CreateOrderRequest, CreateOrderResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

const DEFAULT_CURRENCY: &str = "INR";

/// `POST /api/orders` — Create a payment order at the provider.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] when no payment credentials are
/// configured, [`GatewayError::InvalidRequest`] for a bad amount, and
/// [`GatewayError::PaymentError`] when the provider call fails.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Payments",
    summary = "Create a payment order",
    description = "Creates an order at the payment provider for client-side checkout.",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 500, description = "Provider failure or not configured", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, GatewayError> {
    let payments = state
        .payments
        .as_ref()
        .ok_or_else(|| GatewayError::Internal("payment gateway not configured".to_string()))?;

    let currency = req.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let order = payments
        .create_order(req.amount, currency, req.receipt)
        .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
    }))
}

/// Payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/orders", post(create_order))
}
