//! Payment order DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/orders`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Amount in major currency units (rupees).
    pub amount: u64,
    /// ISO currency code. Defaults to INR.
    #[serde(default)]
    pub currency: Option<String>,
    /// Merchant receipt reference; generated when omitted.
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Response body for `POST /api/orders`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Always `true`.
    pub success: bool,
    /// Provider-assigned order identifier.
    pub order_id: String,
    /// Amount in minor units (paise).
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
}
