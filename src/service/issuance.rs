//! Ticket issuance: creates ticket records after payment confirmation.

use std::sync::Arc;

use chrono::Utc;

use crate::config::GatewayConfig;
use crate::domain::{QrPayload, Ticket, TicketId, TicketType};
use crate::error::GatewayError;
use crate::persistence::TicketStore;

/// Maximum number of tickets issued against one payment.
pub const MAX_TICKETS_PER_ORDER: u32 = 10;

/// Validated issuance order: one confirmed payment, one attendee, N units.
#[derive(Debug, Clone)]
pub struct IssueOrder {
    /// Attendee display name.
    pub customer_name: String,
    /// Attendee contact email.
    pub customer_email: String,
    /// Ticket category.
    pub ticket_type: TicketType,
    /// Number of tickets to issue (1–10).
    pub quantity: u32,
    /// Payment reference from the gateway.
    pub payment_id: String,
}

/// A persisted ticket together with its generated QR artifacts.
#[derive(Debug, Clone)]
pub struct IssuedTicket {
    /// The persisted ticket.
    pub ticket: Ticket,
    /// Structured QR payload as JSON, embedded in the QR code.
    pub qr_json: String,
    /// URL of the rendered QR image (external renderer).
    pub qr_image_url: String,
}

/// Creates one `confirmed` ticket per purchased unit.
///
/// Identifiers are minted from a single order timestamp plus the
/// one-based sequence index, so every ticket of a multi-quantity order
/// gets a distinct identifier; global uniqueness is enforced by the
/// store.
#[derive(Debug)]
pub struct IssuanceService<S> {
    store: Arc<S>,
    event_name: String,
    event_date: String,
    qr_image_base_url: String,
    qr_secret: String,
}

impl<S> Clone for IssuanceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            event_name: self.event_name.clone(),
            event_date: self.event_date.clone(),
            qr_image_base_url: self.qr_image_base_url.clone(),
            qr_secret: self.qr_secret.clone(),
        }
    }
}

impl<S: TicketStore> IssuanceService<S> {
    /// Creates a new issuance service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, config: &GatewayConfig) -> Self {
        Self {
            store,
            event_name: config.event_name.clone(),
            event_date: config.event_date.clone(),
            qr_image_base_url: config.qr_image_base_url.clone(),
            qr_secret: config.qr_secret.clone(),
        }
    }

    /// Issues and persists the tickets for one order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on an empty name/email or
    /// out-of-range quantity, [`GatewayError::TicketAlreadyExists`] if an
    /// identifier collides, and [`GatewayError::PersistenceError`] on
    /// store failure.
    pub async fn issue(&self, order: IssueOrder) -> Result<Vec<IssuedTicket>, GatewayError> {
        if order.customer_name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "customer name is required".to_string(),
            ));
        }
        if order.customer_email.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "customer email is required".to_string(),
            ));
        }
        if order.quantity == 0 || order.quantity > MAX_TICKETS_PER_ORDER {
            return Err(GatewayError::InvalidRequest(format!(
                "quantity must be between 1 and {MAX_TICKETS_PER_ORDER}"
            )));
        }
        if order.payment_id.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "payment ID is required".to_string(),
            ));
        }

        let now = Utc::now();
        let order_millis = now.timestamp_millis();

        let mut issued = Vec::with_capacity(order.quantity as usize);
        for sequence in 1..=order.quantity {
            let ticket = Ticket::issue(
                TicketId::mint(order_millis, sequence),
                order.customer_name.clone(),
                order.customer_email.clone(),
                order.ticket_type,
                order.payment_id.clone(),
                now,
            );
            self.store.insert(&ticket).await?;

            let payload =
                QrPayload::for_ticket(&ticket, &self.event_name, &self.event_date, &self.qr_secret);
            let qr_json = payload
                .to_json()
                .map_err(|e| GatewayError::Internal(format!("QR payload serialization: {e}")))?;
            let qr_image_url = format!(
                "{}?size=200x200&data={}",
                self.qr_image_base_url,
                ticket.ticket_id.as_str()
            );

            issued.push(IssuedTicket {
                ticket,
                qr_json,
                qr_image_url,
            });
        }

        tracing::info!(
            count = issued.len(),
            payment_id = %order.payment_id,
            "tickets issued"
        );
        Ok(issued)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{TicketStatus, qr_payload};
    use crate::persistence::memory::MemoryTicketStore;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap_or_else(|_| {
                panic!("literal socket address");
            }),
            database_url: String::new(),
            database_max_connections: 1,
            database_min_connections: 1,
            database_connect_timeout_secs: 1,
            persistence_enabled: false,
            event_name: "Garba Night 2025".to_string(),
            event_date: "2025-10-15".to_string(),
            event_venue: "PARK PLAZA Hotel".to_string(),
            qr_image_base_url: "https://qr.example.com/render".to_string(),
            qr_secret: "secret".to_string(),
            smtp: None,
            payment: None,
        }
    }

    fn make_service() -> (IssuanceService<MemoryTicketStore>, Arc<MemoryTicketStore>) {
        let store = Arc::new(MemoryTicketStore::new());
        let service = IssuanceService::new(Arc::clone(&store), &test_config());
        (service, store)
    }

    fn sample_order(quantity: u32) -> IssueOrder {
        IssueOrder {
            customer_name: "Asha Patel".to_string(),
            customer_email: "asha@example.com".to_string(),
            ticket_type: TicketType::Couple,
            quantity,
            payment_id: "pay_123".to_string(),
        }
    }

    #[tokio::test]
    async fn issues_distinct_confirmed_tickets_per_unit() {
        let (service, store) = make_service();

        let Ok(issued) = service.issue(sample_order(3)).await else {
            panic!("issuance should succeed");
        };
        assert_eq!(issued.len(), 3);

        let mut ids: Vec<&str> = issued.iter().map(|t| t.ticket.ticket_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3, "identifiers must be distinct within an order");

        for item in &issued {
            assert_eq!(item.ticket.status, TicketStatus::Confirmed);
            assert!(!item.ticket.entry_allowed);
            assert!(TicketId::is_direct_format(item.ticket.ticket_id.as_str()));
        }
        assert_eq!(store.total_count().await.unwrap_or(0), 3);
    }

    #[tokio::test]
    async fn generated_qr_payload_decodes_back_to_the_ticket() {
        let (service, _store) = make_service();

        let Ok(issued) = service.issue(sample_order(1)).await else {
            panic!("issuance should succeed");
        };
        let Some(item) = issued.first() else {
            panic!("one ticket expected");
        };

        let Ok(decoded) = qr_payload::decode(&item.qr_json) else {
            panic!("generated payload should decode");
        };
        assert_eq!(decoded.ticket_id, item.ticket.ticket_id);
        assert!(item.qr_image_url.contains(item.ticket.ticket_id.as_str()));
    }

    #[tokio::test]
    async fn rejects_out_of_range_quantity() {
        let (service, _store) = make_service();
        for quantity in [0, MAX_TICKETS_PER_ORDER + 1] {
            let result = service.issue(sample_order(quantity)).await;
            assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        }
    }

    #[tokio::test]
    async fn rejects_blank_customer_fields() {
        let (service, _store) = make_service();
        let mut order = sample_order(1);
        order.customer_name = "  ".to_string();
        let result = service.issue(order).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }
}
