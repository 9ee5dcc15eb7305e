//! Confirmation email endpoint handlers.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SendConfirmationRequest, SendConfirmationResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::TicketLine;

/// `POST /api/send-confirmation` — Email the booking confirmation.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] when SMTP is not configured,
/// [`GatewayError::InvalidRequest`] for a bad recipient address, and
/// [`GatewayError::EmailError`] on delivery failure.
#[utoipa::path(
    post,
    path = "/api/send-confirmation",
    tag = "Email",
    summary = "Send a booking confirmation",
    description = "Sends the confirmation email listing every issued ticket.",
    request_body = SendConfirmationRequest,
    responses(
        (status = 200, description = "Confirmation sent", body = SendConfirmationResponse),
        (status = 400, description = "Invalid recipient", body = ErrorResponse),
        (status = 500, description = "Delivery failure or not configured", body = ErrorResponse),
    )
)]
pub async fn send_confirmation(
    State(state): State<AppState>,
    Json(req): Json<SendConfirmationRequest>,
) -> Result<Json<SendConfirmationResponse>, GatewayError> {
    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| GatewayError::Internal("email delivery not configured".to_string()))?;

    let lines: Vec<TicketLine> = req
        .tickets
        .iter()
        .map(|t| TicketLine {
            ticket_id: t.ticket_id.clone(),
            ticket_type: t.ticket_type.clone(),
            qr_code: t.qr_code.clone(),
        })
        .collect();

    mailer
        .send_confirmation(
            &req.email,
            &req.customer_name,
            &lines,
            req.total_amount,
            &req.payment_id,
        )
        .await?;

    Ok(Json(SendConfirmationResponse {
        success: true,
        message: format!("Confirmation sent to {}", req.email),
    }))
}

/// Email routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/send-confirmation", post(send_confirmation))
}
