//! Scan reporting: read-only aggregation over the ticket store.

use std::sync::Arc;

use crate::domain::{Ticket, TicketStatus};
use crate::error::GatewayError;
use crate::persistence::TicketStore;

/// How many recently used tickets the stats feed returns.
pub const RECENT_SCANS_LIMIT: usize = 10;

/// Aggregated scanning statistics.
#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Total tickets in the store.
    pub total_tickets: u64,
    /// Tickets in the `used` state.
    pub scanned_tickets: u64,
    /// Tickets still `confirmed`.
    pub pending_tickets: u64,
    /// `scanned / total` as a percentage, rounded to one decimal.
    /// Zero when no tickets exist.
    pub scan_rate: f64,
    /// Most recently used tickets, newest scan first.
    pub recent_scans: Vec<Ticket>,
}

/// Read-only reporting over the store. Never mutates state.
#[derive(Debug)]
pub struct ReportingService<S> {
    store: Arc<S>,
}

impl<S> Clone for ReportingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TicketStore> ReportingService<S> {
    /// Creates a new reporting service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Computes the scan statistics snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn scan_stats(&self) -> Result<ScanStats, GatewayError> {
        let total_tickets = self.store.total_count().await?;
        let scanned_tickets = self.store.count_by_status(TicketStatus::Used).await?;
        let pending_tickets = self.store.count_by_status(TicketStatus::Confirmed).await?;
        let recent_scans = self.store.recent_scans(RECENT_SCANS_LIMIT).await?;

        #[allow(clippy::cast_precision_loss)]
        let scan_rate = if total_tickets == 0 {
            0.0
        } else {
            let rate = scanned_tickets as f64 / total_tickets as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        };

        Ok(ScanStats {
            total_tickets,
            scanned_tickets,
            pending_tickets,
            scan_rate,
            recent_scans,
        })
    }

    /// Lists all tickets, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, GatewayError> {
        self.store.list().await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Ticket, TicketId, TicketType};
    use crate::persistence::memory::MemoryTicketStore;

    async fn seed(store: &MemoryTicketStore, count: u32, scanned: u32) {
        for seq in 1..=count {
            let ticket = Ticket::issue(
                TicketId::mint(1_700_000_000_000, seq),
                "Asha Patel".to_string(),
                "asha@example.com".to_string(),
                TicketType::Regular,
                "pay_123".to_string(),
                Utc::now(),
            );
            let Ok(()) = store.insert(&ticket).await else {
                panic!("seed insert failed");
            };
        }
        for seq in 1..=scanned {
            let id = TicketId::mint(1_700_000_000_000, seq);
            let Ok(Some(_)) = store.claim_for_entry(&id, Utc::now(), "GateA").await else {
                panic!("seed claim failed");
            };
        }
    }

    #[tokio::test]
    async fn stats_reflect_counts_and_rate() {
        let store = Arc::new(MemoryTicketStore::new());
        seed(&store, 3, 1).await;
        let service = ReportingService::new(Arc::clone(&store));

        let Ok(stats) = service.scan_stats().await else {
            panic!("stats should succeed");
        };
        assert_eq!(stats.total_tickets, 3);
        assert_eq!(stats.scanned_tickets, 1);
        assert_eq!(stats.pending_tickets, 2);
        assert!((stats.scan_rate - 33.3).abs() < f64::EPSILON);
        assert_eq!(stats.recent_scans.len(), 1);
    }

    #[tokio::test]
    async fn stats_on_empty_store_report_zero_rate() {
        let store = Arc::new(MemoryTicketStore::new());
        let service = ReportingService::new(store);

        let Ok(stats) = service.scan_stats().await else {
            panic!("stats should succeed");
        };
        assert_eq!(stats.total_tickets, 0);
        assert!((stats.scan_rate - 0.0).abs() < f64::EPSILON);
        assert!(stats.recent_scans.is_empty());
    }

    #[tokio::test]
    async fn stats_do_not_mutate_the_store() {
        let store = Arc::new(MemoryTicketStore::new());
        seed(&store, 2, 1).await;
        let service = ReportingService::new(Arc::clone(&store));

        let before = store.list().await.unwrap_or_default();
        let Ok(_) = service.scan_stats().await else {
            panic!("stats should succeed");
        };
        let after = store.list().await.unwrap_or_default();
        assert_eq!(before, after);
    }
}
