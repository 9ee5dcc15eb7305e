//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Expected business outcomes of a scan (cancelled, already scanned, not
//! found) are **not** errors — they are modeled as
//! [`crate::service::ValidationOutcome`] variants. `GatewayError` covers
//! request validation failures and infrastructure faults only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::TicketId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: quantity must be between 1 and 10",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Ticket with the given identifier was not found.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// A ticket with the given identifier already exists in the store.
    #[error("ticket already exists: {0}")]
    TicketAlreadyExists(TicketId),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Outbound email delivery failure.
    #[error("email delivery error: {0}")]
    EmailError(String),

    /// Payment gateway request failure.
    #[error("payment gateway error: {0}")]
    PaymentError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::TicketNotFound(_) => 2001,
            Self::TicketAlreadyExists(_) => 2002,
            Self::PersistenceError(_) => 3001,
            Self::EmailError(_) => 3002,
            Self::PaymentError(_) => 3003,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::TicketNotFound(_) => StatusCode::NOT_FOUND,
            Self::TicketAlreadyExists(_) => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::EmailError(_) | Self::PaymentError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the message exposed to API clients.
    ///
    /// Infrastructure variants are reported generically: connection strings
    /// and driver messages stay in the logs, not in responses.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::PersistenceError(_) => "storage failure".to_string(),
            Self::EmailError(_) => "email delivery failed".to_string(),
            Self::PaymentError(_) => "payment gateway request failed".to_string(),
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_detail_is_not_exposed() {
        let err = GatewayError::PersistenceError("connection refused at 10.0.0.5:5432".to_string());
        assert_eq!(err.public_message(), "storage failure");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_detail_is_exposed() {
        let err = GatewayError::InvalidRequest("quantity must be between 1 and 10".to_string());
        assert!(err.public_message().contains("quantity"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::TicketNotFound(TicketId::new("EVT-0-0"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }
}
