//! In-memory implementation of the ticket store.
//!
//! Used when the gateway is started without a database and by the test
//! suite. The conditional-claim semantics match PostgreSQL's: the claim
//! inspects and mutates the entry under the map's write lock, so at most
//! one concurrent claim on an identifier can observe `confirmed`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::TicketStore;
use crate::domain::{Ticket, TicketId, TicketStatus};
use crate::error::GatewayError;

/// In-memory ticket store over a `RwLock<HashMap>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTicketStore {
    tickets: Arc<RwLock<HashMap<TicketId, Ticket>>>,
}

impl MemoryTicketStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), GatewayError> {
        let mut map = self.tickets.write().await;
        if map.contains_key(&ticket.ticket_id) {
            return Err(GatewayError::TicketAlreadyExists(ticket.ticket_id.clone()));
        }
        map.insert(ticket.ticket_id.clone(), ticket.clone());
        Ok(())
    }

    async fn find(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, GatewayError> {
        Ok(self.tickets.read().await.get(ticket_id).cloned())
    }

    async fn claim_for_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        let mut map = self.tickets.write().await;
        match map.get_mut(ticket_id) {
            Some(ticket) if ticket.status == TicketStatus::Confirmed => {
                ticket.status = TicketStatus::Used;
                ticket.scanned_at = Some(scanned_at);
                ticket.scanned_by = Some(scanned_by.to_string());
                ticket.entry_allowed = true;
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn force_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        let mut map = self.tickets.write().await;
        match map.get_mut(ticket_id) {
            Some(ticket) => {
                ticket.status = TicketStatus::Used;
                ticket.scanned_at = Some(scanned_at);
                ticket.scanned_by = Some(scanned_by.to_string());
                ticket.entry_allowed = true;
                Ok(Some(ticket.clone()))
            }
            None => Ok(None),
        }
    }

    async fn total_count(&self) -> Result<u64, GatewayError> {
        Ok(self.tickets.read().await.len() as u64)
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<u64, GatewayError> {
        let map = self.tickets.read().await;
        Ok(map.values().filter(|t| t.status == status).count() as u64)
    }

    async fn sample_ids(&self, limit: usize) -> Result<Vec<TicketId>, GatewayError> {
        let map = self.tickets.read().await;
        Ok(map.keys().take(limit).cloned().collect())
    }

    async fn recent_scans(&self, limit: usize) -> Result<Vec<Ticket>, GatewayError> {
        let map = self.tickets.read().await;
        let mut used: Vec<Ticket> = map
            .values()
            .filter(|t| t.status == TicketStatus::Used)
            .cloned()
            .collect();
        used.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        used.truncate(limit);
        Ok(used)
    }

    async fn list(&self) -> Result<Vec<Ticket>, GatewayError> {
        let map = self.tickets.read().await;
        let mut tickets: Vec<Ticket> = map.values().cloned().collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::TicketType;

    fn confirmed_ticket(seq: u32) -> Ticket {
        Ticket::issue(
            TicketId::mint(1_700_000_000_000, seq),
            "Asha Patel".to_string(),
            "asha@example.com".to_string(),
            TicketType::Regular,
            "pay_123".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_enforces_unique_ids() {
        let store = MemoryTicketStore::new();
        let ticket = confirmed_ticket(1);

        assert!(store.insert(&ticket).await.is_ok());
        let dup = store.insert(&ticket).await;
        assert!(matches!(dup, Err(GatewayError::TicketAlreadyExists(_))));
    }

    #[tokio::test]
    async fn claim_transitions_confirmed_ticket_once() {
        let store = MemoryTicketStore::new();
        let ticket = confirmed_ticket(1);
        let id = ticket.ticket_id.clone();
        let _ = store.insert(&ticket).await;

        let now = Utc::now();
        let Ok(Some(claimed)) = store.claim_for_entry(&id, now, "GateA").await else {
            panic!("first claim should succeed");
        };
        assert_eq!(claimed.status, TicketStatus::Used);
        assert_eq!(claimed.scanned_at, Some(now));
        assert_eq!(claimed.scanned_by.as_deref(), Some("GateA"));
        assert!(claimed.entry_allowed);

        // Second claim must not re-transition or overwrite scan metadata.
        let Ok(second) = store.claim_for_entry(&id, Utc::now(), "GateB").await else {
            panic!("second claim should not be a store error");
        };
        assert!(second.is_none());
        let Ok(Some(stored)) = store.find(&id).await else {
            panic!("ticket should still exist");
        };
        assert_eq!(stored.scanned_at, Some(now));
        assert_eq!(stored.scanned_by.as_deref(), Some("GateA"));
    }

    #[tokio::test]
    async fn claim_on_missing_ticket_returns_none() {
        let store = MemoryTicketStore::new();
        let result = store
            .claim_for_entry(&TicketId::new("EVT-0-0"), Utc::now(), "GateA")
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn force_entry_bypasses_status_guard() {
        let store = MemoryTicketStore::new();
        let mut ticket = confirmed_ticket(1);
        ticket.status = TicketStatus::Cancelled;
        let id = ticket.ticket_id.clone();
        let _ = store.insert(&ticket).await;

        let Ok(Some(forced)) = store
            .force_entry(&id, Utc::now(), "Manual Override - Supervisor")
            .await
        else {
            panic!("force entry should succeed on a cancelled ticket");
        };
        assert_eq!(forced.status, TicketStatus::Used);
        assert!(forced.entry_allowed);
    }

    #[tokio::test]
    async fn recent_scans_orders_by_scan_time_descending() {
        let store = MemoryTicketStore::new();
        for seq in 1..=3 {
            let _ = store.insert(&confirmed_ticket(seq)).await;
        }
        let base = Utc::now();
        for (seq, offset) in [(1u32, 30i64), (2, 10), (3, 20)] {
            let id = TicketId::mint(1_700_000_000_000, seq);
            let at = base - chrono::Duration::seconds(offset);
            let _ = store.claim_for_entry(&id, at, "GateA").await;
        }

        let Ok(recent) = store.recent_scans(2).await else {
            panic!("recent scans should succeed");
        };
        let ids: Vec<&str> = recent.iter().map(|t| t.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["EVT-1700000000000-2", "EVT-1700000000000-3"]);
    }

    #[tokio::test]
    async fn counts_track_status() {
        let store = MemoryTicketStore::new();
        for seq in 1..=3 {
            let _ = store.insert(&confirmed_ticket(seq)).await;
        }
        let id = TicketId::mint(1_700_000_000_000, 1);
        let _ = store.claim_for_entry(&id, Utc::now(), "GateA").await;

        assert_eq!(store.total_count().await.unwrap_or(0), 3);
        assert_eq!(
            store.count_by_status(TicketStatus::Used).await.unwrap_or(0),
            1
        );
        assert_eq!(
            store
                .count_by_status(TicketStatus::Confirmed)
                .await
                .unwrap_or(0),
            2
        );
    }
}
