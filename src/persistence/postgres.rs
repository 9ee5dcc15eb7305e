//! PostgreSQL implementation of the ticket store.
//!
//! The conditional-claim write relies on a single `UPDATE ... WHERE
//! status = 'confirmed' RETURNING ...` statement: row-level locking in
//! PostgreSQL guarantees that of any set of concurrent claims on the same
//! identifier, exactly one sees the row in `confirmed` and updates it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::TicketStore;
use crate::domain::{Ticket, TicketId, TicketStatus, TicketType};
use crate::error::GatewayError;

/// Column tuple shared by every query returning full ticket rows.
type TicketRow = (
    String,                // ticket_id
    String,                // attendee_name
    String,                // attendee_email
    String,                // ticket_type
    String,                // status
    String,                // payment_id
    DateTime<Utc>,         // created_at
    Option<DateTime<Utc>>, // scanned_at
    Option<String>,        // scanned_by
    bool,                  // entry_allowed
);

const TICKET_COLUMNS: &str = "ticket_id, attendee_name, attendee_email, ticket_type, status, \
     payment_id, created_at, scanned_at, scanned_by, entry_allowed";

/// PostgreSQL-backed ticket store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresTicketStore {
    pool: PgPool,
}

impl PostgresTicketStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TicketStore for PostgresTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO tickets (ticket_id, attendee_name, attendee_email, ticket_type, status, \
             payment_id, created_at, scanned_at, scanned_by, entry_allowed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(ticket.ticket_id.as_str())
        .bind(&ticket.attendee_name)
        .bind(&ticket.attendee_email)
        .bind(ticket.ticket_type.as_str())
        .bind(ticket.status.as_str())
        .bind(&ticket.payment_id)
        .bind(ticket.created_at)
        .bind(ticket.scanned_at)
        .bind(ticket.scanned_by.as_deref())
        .bind(ticket.entry_allowed)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) => {
                GatewayError::TicketAlreadyExists(ticket.ticket_id.clone())
            }
            _ => GatewayError::PersistenceError(e.to_string()),
        })?;

        Ok(())
    }

    async fn find(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, GatewayError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_id = $1",
        ))
        .bind(ticket_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        row.map(ticket_from_row).transpose()
    }

    async fn claim_for_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "UPDATE tickets SET status = 'used', scanned_at = $2, scanned_by = $3, \
             entry_allowed = TRUE \
             WHERE ticket_id = $1 AND status = 'confirmed' \
             RETURNING {TICKET_COLUMNS}",
        ))
        .bind(ticket_id.as_str())
        .bind(scanned_at)
        .bind(scanned_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        row.map(ticket_from_row).transpose()
    }

    async fn force_entry(
        &self,
        ticket_id: &TicketId,
        scanned_at: DateTime<Utc>,
        scanned_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "UPDATE tickets SET status = 'used', scanned_at = $2, scanned_by = $3, \
             entry_allowed = TRUE \
             WHERE ticket_id = $1 \
             RETURNING {TICKET_COLUMNS}",
        ))
        .bind(ticket_id.as_str())
        .bind(scanned_at)
        .bind(scanned_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        row.map(ticket_from_row).transpose()
    }

    async fn total_count(&self) -> Result<u64, GatewayError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<u64, GatewayError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn sample_ids(&self, limit: usize) -> Result<Vec<TicketId>, GatewayError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT ticket_id FROM tickets ORDER BY created_at DESC LIMIT $1",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(ids.into_iter().map(TicketId::new).collect())
    }

    async fn recent_scans(&self, limit: usize) -> Result<Vec<Ticket>, GatewayError> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE status = 'used' \
             ORDER BY scanned_at DESC LIMIT $1",
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn list(&self) -> Result<Vec<Ticket>, GatewayError> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(ticket_from_row).collect()
    }
}

/// Maps a column tuple to the domain entity, rejecting rows whose status
/// or type strings fall outside the closed vocabulary.
fn ticket_from_row(row: TicketRow) -> Result<Ticket, GatewayError> {
    let (
        ticket_id,
        attendee_name,
        attendee_email,
        ticket_type,
        status,
        payment_id,
        created_at,
        scanned_at,
        scanned_by,
        entry_allowed,
    ) = row;

    let ticket_type = TicketType::parse(&ticket_type).ok_or_else(|| {
        GatewayError::PersistenceError(format!("unknown ticket type in store: {ticket_type}"))
    })?;
    let status = TicketStatus::parse(&status).ok_or_else(|| {
        GatewayError::PersistenceError(format!("unknown ticket status in store: {status}"))
    })?;

    Ok(Ticket {
        ticket_id: TicketId::new(ticket_id),
        attendee_name,
        attendee_email,
        ticket_type,
        status,
        payment_id,
        created_at,
        scanned_at,
        scanned_by,
        entry_allowed,
    })
}
