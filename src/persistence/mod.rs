//! Persistence layer: the ticket store contract and its backends.
//!
//! [`TicketStore`] is the only shared mutable resource in the gateway.
//! Its single mandatory concurrency-control point is
//! [`TicketStore::claim_for_entry`]: a conditional write keyed on the
//! current status, so that two simultaneous scans of the same ticket can
//! never both observe `confirmed` and both transition. A naive
//! read-then-save here would be a correctness bug, not a simplification.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};

use crate::domain::{Ticket, TicketId, TicketStatus};
use crate::error::GatewayError;
use memory::MemoryTicketStore;
use postgres::PostgresTicketStore;

/// Persistent mapping from ticket identifier to ticket state.
///
/// All mutation of `status`/`scanned_at`/`scanned_by`/`entry_allowed`
/// flows through [`claim_for_entry`](Self::claim_for_entry) or
/// [`force_entry`](Self::force_entry); the remaining methods are
/// read-only and may be snapshot reads.
pub trait TicketStore: Send + Sync + 'static {
    /// Inserts a freshly issued ticket.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TicketAlreadyExists`] when the unique index
    /// rejects the identifier, or [`GatewayError::PersistenceError`] on
    /// store failure.
    fn insert(
        &self,
        ticket: &Ticket,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Looks up a ticket by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn find(
        &self,
        ticket_id: &TicketId,
    ) -> impl std::future::Future<Output = Result<Option<Ticket>, GatewayError>> + Send;

    /// Atomically transitions a `confirmed` ticket to `used`, setting the
    /// scan metadata and `entry_allowed = true`.
    ///
    /// Returns the updated snapshot when the claim succeeded, or `None`
    /// when the ticket was absent or not in the `confirmed` state — the
    /// caller re-reads to distinguish those cases. Exactly one of any set
    /// of concurrent claims on the same identifier can succeed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn claim_for_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> impl std::future::Future<Output = Result<Option<Ticket>, GatewayError>> + Send;

    /// Manual-override write: transitions any existing ticket to `used`
    /// regardless of its prior state. Returns `None` only when the ticket
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn force_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> impl std::future::Future<Output = Result<Option<Ticket>, GatewayError>> + Send;

    /// Total number of tickets in the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn total_count(&self)
    -> impl std::future::Future<Output = Result<u64, GatewayError>> + Send;

    /// Number of tickets currently in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn count_by_status(
        &self,
        status: TicketStatus,
    ) -> impl std::future::Future<Output = Result<u64, GatewayError>> + Send;

    /// A small sample of valid identifiers, for scanner-operator
    /// troubleshooting on not-found paths.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn sample_ids(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<TicketId>, GatewayError>> + Send;

    /// The most recently used tickets, ordered by `scanned_at` descending.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn recent_scans(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Ticket>, GatewayError>> + Send;

    /// All tickets, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    fn list(&self)
    -> impl std::future::Future<Output = Result<Vec<Ticket>, GatewayError>> + Send;
}

/// Runtime-selected store backend.
///
/// PostgreSQL in production; the in-memory store when the gateway is run
/// without a database (`PERSISTENCE_ENABLED=false`) and in tests.
#[derive(Debug, Clone)]
pub enum Store {
    /// PostgreSQL-backed store.
    Postgres(PostgresTicketStore),
    /// In-memory store.
    Memory(MemoryTicketStore),
}

impl TicketStore for Store {
    async fn insert(&self, ticket: &Ticket) -> Result<(), GatewayError> {
        match self {
            Self::Postgres(s) => s.insert(ticket).await,
            Self::Memory(s) => s.insert(ticket).await,
        }
    }

    async fn find(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, GatewayError> {
        match self {
            Self::Postgres(s) => s.find(ticket_id).await,
            Self::Memory(s) => s.find(ticket_id).await,
        }
    }

    async fn claim_for_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        match self {
            Self::Postgres(s) => s.claim_for_entry(ticket_id, scanned_at, scanned_by).await,
            Self::Memory(s) => s.claim_for_entry(ticket_id, scanned_at, scanned_by).await,
        }
    }

    async fn force_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        match self {
            Self::Postgres(s) => s.force_entry(ticket_id, scanned_at, scanned_by).await,
            Self::Memory(s) => s.force_entry(ticket_id, scanned_at, scanned_by).await,
        }
    }

    async fn total_count(&self) -> Result<u64, GatewayError> {
        match self {
            Self::Postgres(s) => s.total_count().await,
            Self::Memory(s) => s.total_count().await,
        }
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<u64, GatewayError> {
        match self {
            Self::Postgres(s) => s.count_by_status(status).await,
            Self::Memory(s) => s.count_by_status(status).await,
        }
    }

    async fn sample_ids(&self, limit: usize) -> Result<Vec<TicketId>, GatewayError> {
        match self {
            Self::Postgres(s) => s.sample_ids(limit).await,
            Self::Memory(s) => s.sample_ids(limit).await,
        }
    }

    async fn recent_scans(&self, limit: usize) -> Result<Vec<Ticket>, GatewayError> {
        match self {
            Self::Postgres(s) => s.recent_scans(limit).await,
            Self::Memory(s) => s.recent_scans(limit).await,
        }
    }

    async fn list(&self) -> Result<Vec<Ticket>, GatewayError> {
        match self {
            Self::Postgres(s) => s.list().await,
            Self::Memory(s) => s.list().await,
        }
    }
}
