//! Type-safe ticket identifier.
//!
//! [`TicketId`] is a newtype wrapper around [`String`] providing type
//! safety so that ticket identifiers cannot be confused with other
//! strings (payment IDs, scanner names, reasons).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal prefix of every canonically minted ticket identifier.
pub const TICKET_ID_PREFIX: &str = "EVT";

/// Unique identifier for a ticket.
///
/// Minted once at issuance and immutable thereafter. Global uniqueness is
/// enforced by the store's unique index; within a single multi-quantity
/// order, uniqueness comes from the per-ticket sequence number.
///
/// The canonical *direct* wire format is `EVT-<epoch-millis>-<sequence>`,
/// but a `TicketId` itself is opaque: identifiers extracted from structured
/// QR payloads are accepted as-is and resolved against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a canonical identifier from an order timestamp and the
    /// one-based sequence number of the ticket within its order.
    #[must_use]
    pub fn mint(order_epoch_millis: i64, sequence: u32) -> Self {
        Self(format!("{TICKET_ID_PREFIX}-{order_epoch_millis}-{sequence}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the string matches the canonical direct format:
    /// the literal prefix, a dash, a numeric segment, a dash, and a
    /// trailing numeric index.
    #[must_use]
    pub fn is_direct_format(raw: &str) -> bool {
        let Some(rest) = raw.strip_prefix(TICKET_ID_PREFIX) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('-') else {
            return false;
        };
        let mut segments = rest.split('-');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(millis), Some(seq), None) => {
                !millis.is_empty()
                    && !seq.is_empty()
                    && millis.bytes().all(|b| b.is_ascii_digit())
                    && seq.bytes().all(|b| b.is_ascii_digit())
            }
            _ => false,
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TicketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn mint_produces_direct_format() {
        let id = TicketId::mint(1_700_000_000_000, 1);
        assert_eq!(id.as_str(), "EVT-1700000000000-1");
        assert!(TicketId::is_direct_format(id.as_str()));
    }

    #[test]
    fn mint_sequence_distinguishes_tickets_in_one_order() {
        let a = TicketId::mint(1_700_000_000_000, 1);
        let b = TicketId::mint(1_700_000_000_000, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn direct_format_accepts_canonical_ids() {
        assert!(TicketId::is_direct_format("EVT-1757866591224-3"));
        assert!(TicketId::is_direct_format("EVT-0-0"));
    }

    #[test]
    fn direct_format_rejects_malformed_ids() {
        assert!(!TicketId::is_direct_format(""));
        assert!(!TicketId::is_direct_format("EVT-"));
        assert!(!TicketId::is_direct_format("EVT-123"));
        assert!(!TicketId::is_direct_format("EVT-123-"));
        assert!(!TicketId::is_direct_format("EVT--1"));
        assert!(!TicketId::is_direct_format("EVT-12a-1"));
        assert!(!TicketId::is_direct_format("EVT-123-1-9"));
        assert!(!TicketId::is_direct_format("GARBA-123-1"));
        assert!(!TicketId::is_direct_format("{\"ticketId\":\"EVT-1-1\"}"));
    }

    #[test]
    fn serde_is_transparent() {
        let id = TicketId::new("EVT-1700000000000-1");
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"EVT-1700000000000-1\"");
    }
}
