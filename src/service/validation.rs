//! Entry validation engine: the ticket state machine.
//!
//! [`ValidationEngine::validate_entry`] performs the admission decision
//! for a decoded ticket identifier. The transition is claim-first: the
//! engine attempts the store's conditional write before reading, so under
//! concurrent scans of the same ticket exactly one request performs the
//! `confirmed → used` transition and every other request observes `used`
//! and is rejected as already scanned.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Ticket, TicketId, TicketStatus};
use crate::error::GatewayError;
use crate::persistence::TicketStore;

/// Sentinel scanner identity recorded when the request omits one.
pub const DEFAULT_SCANNER_IDENTITY: &str = "Scanner";

/// Prefix tagging manual-override scans apart from normal ones in
/// `scanned_by`.
pub const MANUAL_OVERRIDE_TAG: &str = "Manual Override";

/// How many valid identifiers to sample into not-found diagnostics.
const SAMPLE_ID_LIMIT: usize = 3;

/// Advisory troubleshooting data attached to a not-found outcome.
///
/// Built best-effort: if the diagnostic reads fail, the fields default to
/// empty — diagnostics never block or alter the authoritative result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundDiagnostics {
    /// The identifier that was looked up.
    pub searched: TicketId,
    /// Total number of tickets in the store.
    pub total_tickets: u64,
    /// A small sample of valid identifiers.
    pub sample_ids: Vec<TicketId>,
}

/// Structured outcome of a validation attempt.
///
/// Expected business outcomes are not errors: only store failures surface
/// as [`GatewayError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The ticket was `confirmed` and this request performed the
    /// transition; carries the updated snapshot.
    EntryGranted {
        /// Snapshot after the transition.
        ticket: Ticket,
    },
    /// The ticket was already `used`. No mutation was performed.
    AlreadyScanned {
        /// Snapshot with the original scan metadata intact.
        ticket: Ticket,
        /// Elapsed time since the first scan (`now − scanned_at`).
        time_since_first_scan: chrono::Duration,
    },
    /// The ticket is `cancelled`. No mutation was performed.
    TicketCancelled {
        /// The cancelled ticket, for identifying fields.
        ticket: Ticket,
    },
    /// No ticket with this identifier exists.
    TicketNotFound(NotFoundDiagnostics),
}

/// The entry-validation state machine over a ticket store.
#[derive(Debug)]
pub struct ValidationEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for ValidationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TicketStore> ValidationEngine<S> {
    /// Creates a new engine over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates a scanned ticket and, when admissible, transitions it to
    /// `used` exactly once.
    ///
    /// `scanned_by` defaults to [`DEFAULT_SCANNER_IDENTITY`] when omitted
    /// or empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] when the store is
    /// unavailable (retryable by the caller; the engine never retries).
    pub async fn validate_entry(
        &self,
        ticket_id: &TicketId,
        scanned_by: Option<&str>,
    ) -> Result<ValidationOutcome, GatewayError> {
        let scanner = scanned_by
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCANNER_IDENTITY);
        let now = Utc::now();

        if let Some(ticket) = self.store.claim_for_entry(ticket_id, now, scanner).await? {
            tracing::info!(
                ticket_id = %ticket.ticket_id,
                attendee = %ticket.attendee_name,
                scanner,
                "entry granted"
            );
            return Ok(ValidationOutcome::EntryGranted { ticket });
        }

        // The claim did not apply: the ticket is absent or in a terminal
        // state. Re-read to tell which.
        match self.store.find(ticket_id).await? {
            None => {
                let diagnostics = self.not_found_diagnostics(ticket_id).await;
                tracing::warn!(
                    ticket_id = %ticket_id,
                    total_tickets = diagnostics.total_tickets,
                    "ticket not found"
                );
                Ok(ValidationOutcome::TicketNotFound(diagnostics))
            }
            Some(ticket) if ticket.status == TicketStatus::Cancelled => {
                tracing::info!(ticket_id = %ticket.ticket_id, "cancelled ticket refused");
                Ok(ValidationOutcome::TicketCancelled { ticket })
            }
            Some(ticket) if ticket.status == TicketStatus::Used => {
                let time_since_first_scan = ticket
                    .scanned_at
                    .map_or_else(chrono::Duration::zero, |at| now - at);
                tracing::info!(
                    ticket_id = %ticket.ticket_id,
                    original_scanner = ticket.scanned_by.as_deref().unwrap_or(""),
                    "duplicate scan refused"
                );
                Ok(ValidationOutcome::AlreadyScanned {
                    ticket,
                    time_since_first_scan,
                })
            }
            Some(ticket) => Err(GatewayError::Internal(format!(
                "ticket {} changed state during validation",
                ticket.ticket_id
            ))),
        }
    }

    /// Operator-authorized forced admission bypassing the cancelled and
    /// already-scanned guards, for legitimate at-door exceptions (lost
    /// phone, printed ticket). Records the authorizer inside `scanned_by`
    /// tagged with [`MANUAL_OVERRIDE_TAG`] and emits an audit log naming
    /// who forced entry, for which ticket, why, and from which prior
    /// state.
    ///
    /// Returns `None` when no ticket with this identifier exists.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn manual_override(
        &self,
        ticket_id: &TicketId,
        reason: &str,
        authorized_by: &str,
    ) -> Result<Option<Ticket>, GatewayError> {
        let Some(prior) = self.store.find(ticket_id).await? else {
            return Ok(None);
        };

        let scanner = format!("{MANUAL_OVERRIDE_TAG} - {authorized_by}");
        let updated = self
            .store
            .force_entry(ticket_id, Utc::now(), &scanner)
            .await?;

        if updated.is_some() {
            tracing::warn!(
                ticket_id = %ticket_id,
                authorized_by,
                reason,
                prior_status = prior.status.as_str(),
                "manual entry override"
            );
        }

        Ok(updated)
    }

    /// Best-effort diagnostics for a not-found outcome. Store failures
    /// here are swallowed; they must never fail the request.
    async fn not_found_diagnostics(&self, searched: &TicketId) -> NotFoundDiagnostics {
        let total_tickets = self.store.total_count().await.unwrap_or(0);
        let sample_ids = self
            .store
            .sample_ids(SAMPLE_ID_LIMIT)
            .await
            .unwrap_or_default();
        NotFoundDiagnostics {
            searched: searched.clone(),
            total_tickets,
            sample_ids,
        }
    }
}
