//! The ticket entity and its state machine vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TicketId;

/// Admission state of a ticket.
///
/// The lifecycle is `confirmed → used` on the happy path, or
/// `confirmed → cancelled` via administrative action. Both `used` and
/// `cancelled` are terminal for the normal scan path; only the manual
/// override may move a `cancelled` ticket to `used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Issued and paid for; entry not yet granted.
    Confirmed,
    /// Voided by an administrative action; entry is refused.
    Cancelled,
    /// Entry has been granted exactly once.
    Used,
}

impl TicketStatus {
    /// Stable lowercase string used in the store and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Used => "used",
        }
    }

    /// Parses the stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "used" => Some(Self::Used),
            _ => None,
        }
    }
}

/// Ticket category sold for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    /// Single standard admission.
    Regular,
    /// Single VIP admission.
    Vip,
    /// Couple pass.
    Couple,
}

impl TicketType {
    /// Stable lowercase string used in the store and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Vip => "vip",
            Self::Couple => "couple",
        }
    }

    /// Parses the stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "vip" => Some(Self::Vip),
            "couple" => Some(Self::Couple),
            _ => None,
        }
    }
}

/// A single admission right, uniquely identified and tracked through
/// `confirmed → used` (or `→ cancelled`).
///
/// # Invariants
///
/// - `scanned_at` is set if and only if `status == Used`.
/// - All mutation of `status`/`scanned_at`/`scanned_by`/`entry_allowed`
///   flows through the store's conditional-claim or force-entry writes;
///   no other component writes these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier, assigned at issuance, immutable.
    pub ticket_id: TicketId,
    /// Attendee display name, immutable after issuance.
    pub attendee_name: String,
    /// Attendee contact email, immutable after issuance.
    pub attendee_email: String,
    /// Ticket category, immutable after issuance.
    pub ticket_type: TicketType,
    /// State-machine field.
    pub status: TicketStatus,
    /// Payment reference the ticket was issued against.
    pub payment_id: String,
    /// Issuance timestamp.
    pub created_at: DateTime<Utc>,
    /// Set exactly once, on the transition into `Used`.
    pub scanned_at: Option<DateTime<Utc>>,
    /// Identity of the scanner/operator who performed the transition.
    pub scanned_by: Option<String>,
    /// `true` iff the most recent validation attempt granted entry.
    pub entry_allowed: bool,
}

impl Ticket {
    /// Creates a freshly issued ticket in the `Confirmed` state.
    #[must_use]
    pub fn issue(
        ticket_id: TicketId,
        attendee_name: String,
        attendee_email: String,
        ticket_type: TicketType,
        payment_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_id,
            attendee_name,
            attendee_email,
            ticket_type,
            status: TicketStatus::Confirmed,
            payment_id,
            created_at,
            scanned_at: None,
            scanned_by: None,
            entry_allowed: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn issued_ticket_starts_confirmed_without_scan_metadata() {
        let ticket = Ticket::issue(
            TicketId::mint(1_700_000_000_000, 1),
            "Asha Patel".to_string(),
            "asha@example.com".to_string(),
            TicketType::Regular,
            "pay_123".to_string(),
            Utc::now(),
        );
        assert_eq!(ticket.status, TicketStatus::Confirmed);
        assert!(ticket.scanned_at.is_none());
        assert!(ticket.scanned_by.is_none());
        assert!(!ticket.entry_allowed);
    }

    #[test]
    fn status_round_trips_through_stored_form() {
        for status in [TicketStatus::Confirmed, TicketStatus::Cancelled, TicketStatus::Used] {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TicketStatus::parse("active"), None);
    }

    #[test]
    fn ticket_type_round_trips_through_stored_form() {
        for ty in [TicketType::Regular, TicketType::Vip, TicketType::Couple] {
            assert_eq!(TicketType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(TicketType::parse("premium"), None);
    }
}
