//! Payment gateway client: creates orders against the provider's REST API.

use serde::{Deserialize, Serialize};

use crate::config::PaymentConfig;
use crate::error::GatewayError;

/// Smallest-unit multiplier: the provider bills in paise, callers pass rupees.
const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// An order created at the payment provider, ready for client-side checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Provider-assigned order identifier.
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody {
    amount: u64,
    currency: String,
    receipt: String,
}

/// Thin client over the payment provider's order API.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentClient {
    /// Builds the client from provider credentials.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a payment order for `amount_major` currency units.
    ///
    /// A random receipt reference is generated when the caller does not
    /// supply one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a zero or overflowing
    /// amount and [`GatewayError::PaymentError`] when the provider call
    /// fails.
    pub async fn create_order(
        &self,
        amount_major: u64,
        currency: &str,
        receipt: Option<String>,
    ) -> Result<PaymentOrder, GatewayError> {
        if amount_major == 0 {
            return Err(GatewayError::InvalidRequest(
                "amount must be greater than zero".to_string(),
            ));
        }
        let amount = amount_major
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .ok_or_else(|| GatewayError::InvalidRequest("amount too large".to_string()))?;
        let receipt = receipt
            .unwrap_or_else(|| format!("order_{}", uuid::Uuid::new_v4().simple()));

        let body = CreateOrderBody {
            amount,
            currency: currency.to_string(),
            receipt,
        };

        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::PaymentError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail, "payment order creation rejected");
            return Err(GatewayError::PaymentError(format!(
                "provider returned {status}"
            )));
        }

        let order = response
            .json::<PaymentOrder>()
            .await
            .map_err(|e| GatewayError::PaymentError(format!("malformed provider response: {e}")))?;

        tracing::info!(order_id = %order.id, amount = order.amount, "payment order created");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_client() -> PaymentClient {
        PaymentClient::new(&PaymentConfig {
            key_id: "key".to_string(),
            key_secret: "secret".to_string(),
            base_url: "https://pay.example.com/".to_string(),
        })
    }

    #[tokio::test]
    async fn rejects_zero_amount_without_calling_out() {
        let client = make_client();
        let result = client.create_order(0, "INR", None).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn rejects_overflowing_amount() {
        let client = make_client();
        let result = client.create_order(u64::MAX, "INR", None).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = make_client();
        assert_eq!(client.base_url, "https://pay.example.com");
    }
}
