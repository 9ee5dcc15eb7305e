//! Ticket issuance and listing endpoint handlers.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    GenerateTicketsRequest, GenerateTicketsResponse, IssuedTicketDto, ListTicketDto,
    ListTicketsResponse,
};
use crate::app_state::AppState;
use crate::domain::TicketType;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::IssueOrder;

/// `POST /api/tickets` — Issue tickets for a confirmed payment.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on missing fields, an unknown
/// ticket type, or an out-of-range quantity.
#[utoipa::path(
    post,
    path = "/api/tickets",
    tag = "Tickets",
    summary = "Issue tickets",
    description = "Creates one confirmed ticket per purchased unit and returns their QR artifacts.",
    request_body = GenerateTicketsRequest,
    responses(
        (status = 200, description = "Tickets issued", body = GenerateTicketsResponse),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 409, description = "Identifier collision", body = ErrorResponse),
    )
)]
pub async fn generate_tickets(
    State(state): State<AppState>,
    Json(req): Json<GenerateTicketsRequest>,
) -> Result<Json<GenerateTicketsResponse>, GatewayError> {
    let ticket_type = TicketType::parse(&req.ticket_type).ok_or_else(|| {
        GatewayError::InvalidRequest(format!("unknown ticket type: {}", req.ticket_type))
    })?;

    let issued = state
        .issuance
        .issue(IssueOrder {
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            ticket_type,
            quantity: req.quantity,
            payment_id: req.payment_id,
        })
        .await?;

    Ok(Json(GenerateTicketsResponse {
        success: true,
        tickets: issued.iter().map(IssuedTicketDto::from_issued).collect(),
    }))
}

/// `GET /api/tickets` — List all tickets, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = "Tickets",
    summary = "List tickets",
    description = "Returns every ticket with its scan state, newest first.",
    responses(
        (status = 200, description = "Ticket listing", body = ListTicketsResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse),
    )
)]
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<ListTicketsResponse>, GatewayError> {
    let tickets = state.reporting.list_tickets().await?;
    Ok(Json(ListTicketsResponse {
        success: true,
        count: tickets.len(),
        tickets: tickets.iter().map(ListTicketDto::from_ticket).collect(),
    }))
}

/// Ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tickets", post(generate_tickets).get(list_tickets))
}
