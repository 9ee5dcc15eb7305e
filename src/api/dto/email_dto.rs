//! Confirmation email DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One ticket listed in a confirmation email.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketLineDto {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Ticket category.
    pub ticket_type: String,
    /// URL of the rendered QR image.
    pub qr_code: String,
}

/// Request body for `POST /api/send-confirmation`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationRequest {
    /// Recipient email address.
    pub email: String,
    /// Purchaser display name.
    pub customer_name: String,
    /// Tickets to list in the email.
    pub tickets: Vec<TicketLineDto>,
    /// Total amount paid, in major currency units.
    pub total_amount: f64,
    /// Payment reference from the gateway.
    pub payment_id: String,
}

/// Response body for `POST /api/send-confirmation`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}
