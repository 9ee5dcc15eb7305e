//! Ticket issuance and listing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ticket;
use crate::service::IssuedTicket;

/// Request body for `POST /api/tickets`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketsRequest {
    /// Purchaser display name.
    pub customer_name: String,
    /// Purchaser contact email.
    pub customer_email: String,
    /// Ticket category: `regular`, `vip`, or `couple`.
    pub ticket_type: String,
    /// Number of tickets to issue (1–10).
    pub quantity: u32,
    /// Payment reference from the gateway.
    pub payment_id: String,
}

/// One issued ticket with its QR artifacts.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTicketDto {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Attendee display name.
    pub attendee_name: String,
    /// Ticket category.
    pub ticket_type: String,
    /// Lifecycle state (`confirmed` on issue).
    pub status: String,
    /// URL of the rendered QR image.
    pub qr_code: String,
    /// Structured QR payload as JSON.
    pub qr_data: String,
}

impl IssuedTicketDto {
    pub(crate) fn from_issued(issued: &IssuedTicket) -> Self {
        Self {
            ticket_id: issued.ticket.ticket_id.to_string(),
            attendee_name: issued.ticket.attendee_name.clone(),
            ticket_type: issued.ticket.ticket_type.as_str().to_string(),
            status: issued.ticket.status.as_str().to_string(),
            qr_code: issued.qr_image_url.clone(),
            qr_data: issued.qr_json.clone(),
        }
    }
}

/// Response body for `POST /api/tickets`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTicketsResponse {
    /// Always `true`.
    pub success: bool,
    /// The issued tickets, in sequence order.
    pub tickets: Vec<IssuedTicketDto>,
}

/// One ticket row in the listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketDto {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Attendee display name.
    pub attendee_name: String,
    /// Attendee contact email.
    pub attendee_email: String,
    /// Ticket category.
    pub ticket_type: String,
    /// Lifecycle state.
    pub status: String,
    /// Payment reference.
    pub payment_id: String,
    /// When the ticket was issued.
    pub created_at: DateTime<Utc>,
    /// When the ticket was scanned, if it was.
    pub scanned_at: Option<DateTime<Utc>>,
    /// Who scanned it.
    pub scanned_by: Option<String>,
}

impl ListTicketDto {
    pub(crate) fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.to_string(),
            attendee_name: ticket.attendee_name.clone(),
            attendee_email: ticket.attendee_email.clone(),
            ticket_type: ticket.ticket_type.as_str().to_string(),
            status: ticket.status.as_str().to_string(),
            payment_id: ticket.payment_id.clone(),
            created_at: ticket.created_at,
            scanned_at: ticket.scanned_at,
            scanned_by: ticket.scanned_by.clone(),
        }
    }
}

/// Response body for `GET /api/tickets`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsResponse {
    /// Always `true`.
    pub success: bool,
    /// Total number of tickets.
    pub count: usize,
    /// All tickets, newest first.
    pub tickets: Vec<ListTicketDto>,
}
