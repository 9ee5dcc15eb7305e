//! QR payload codec.
//!
//! Door scanners in the field emit one of three textual encodings
//! depending on client version: a bare ticket identifier, a JSON payload,
//! or a percent-encoded JSON payload. [`decode`] tries the three formats
//! in order and is total: every input terminates in a [`DecodedQr`] or a
//! typed [`QrDecodeError`], never a panic or an escaped parse error.

use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Ticket, TicketId};

/// The textual encoding a QR payload arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFormat {
    /// Bare canonical identifier (`EVT-<digits>-<digits>`).
    Direct,
    /// JSON object with a `ticketId` field.
    Structured,
    /// Percent-encoded JSON object.
    EncodedStructured,
}

/// Successful decode: the extracted identifier candidate and the format
/// that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedQr {
    /// Identifier candidate, to be resolved against the store.
    pub ticket_id: TicketId,
    /// Which encoding matched.
    pub source: DecodeFormat,
}

/// Human-readable descriptions of the accepted formats, echoed in decode
/// failure diagnostics.
pub const EXPECTED_FORMATS: [&str; 3] = [
    "EVT-XXXXXXXXXXXXX-X",
    "{\"ticketId\":\"EVT-...\"}",
    "percent-encoded JSON payload",
];

/// Typed decode failure. Decode errors never propagate as panics past
/// this module; the caller maps each variant to a wire status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrDecodeError {
    /// The raw payload was empty.
    #[error("QR code data is required")]
    Empty,

    /// A payload parsed as JSON but carried no usable `ticketId` field.
    #[error("ticket ID not found in QR payload")]
    MissingTicketId {
        /// The parsed payload, echoed for operator troubleshooting.
        payload: serde_json::Value,
    },

    /// The payload matched none of the accepted formats.
    #[error("unrecognized QR payload format")]
    Unrecognized {
        /// The raw input, echoed for operator troubleshooting.
        raw: String,
    },
}

/// Decodes raw scanned text into a ticket identifier candidate.
///
/// Decoding policy, tried in order, first match wins:
///
/// 1. direct identifier — checked first because it needs no parsing and
///    cannot fail;
/// 2. JSON payload with a `ticketId` field;
/// 3. percent-decode, then step 2 on the result.
///
/// A payload that parses as JSON commits to the structured path: a missing
/// or empty `ticketId` is reported as [`QrDecodeError::MissingTicketId`]
/// without attempting the percent-decoded fallback.
///
/// # Errors
///
/// Returns a [`QrDecodeError`] when the input is empty, carries no
/// identifier, or matches none of the accepted formats.
pub fn decode(raw: &str) -> Result<DecodedQr, QrDecodeError> {
    if raw.is_empty() {
        return Err(QrDecodeError::Empty);
    }

    if TicketId::is_direct_format(raw) {
        return Ok(DecodedQr {
            ticket_id: TicketId::new(raw),
            source: DecodeFormat::Direct,
        });
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        return extract_ticket_id(value).map(|ticket_id| DecodedQr {
            ticket_id,
            source: DecodeFormat::Structured,
        });
    }

    if let Ok(decoded) = percent_decode_str(raw).decode_utf8()
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&decoded)
    {
        return extract_ticket_id(value).map(|ticket_id| DecodedQr {
            ticket_id,
            source: DecodeFormat::EncodedStructured,
        });
    }

    Err(QrDecodeError::Unrecognized {
        raw: raw.to_string(),
    })
}

/// Pulls a non-empty `ticketId` out of a parsed payload.
fn extract_ticket_id(value: serde_json::Value) -> Result<TicketId, QrDecodeError> {
    match value.get("ticketId").and_then(|v| v.as_str()) {
        Some(id) if !id.is_empty() => Ok(TicketId::new(id)),
        _ => Err(QrDecodeError::MissingTicketId { payload: value }),
    }
}

/// The structured payload embedded in generated QR codes.
///
/// Field names are camelCase on the wire; legacy scanner clients read
/// them positionally by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    /// Ticket identifier.
    pub ticket_id: TicketId,
    /// Attendee display name.
    pub attendee_name: String,
    /// Event name.
    pub event_name: String,
    /// Ticket category string.
    pub ticket_type: String,
    /// Event date string.
    pub event_date: String,
    /// Issuance timestamp (RFC 3339).
    pub issued_at: String,
    /// Truncated SHA-256 verification hash.
    pub hash: String,
}

impl QrPayload {
    /// Builds the payload for a freshly issued ticket.
    #[must_use]
    pub fn for_ticket(ticket: &Ticket, event_name: &str, event_date: &str, secret: &str) -> Self {
        Self {
            ticket_id: ticket.ticket_id.clone(),
            attendee_name: ticket.attendee_name.clone(),
            event_name: event_name.to_string(),
            ticket_type: ticket.ticket_type.as_str().to_string(),
            event_date: event_date.to_string(),
            issued_at: ticket.created_at.to_rfc3339(),
            hash: verification_hash(ticket.ticket_id.as_str(), event_date, secret),
        }
    }

    /// Serializes the payload to its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails (it cannot for
    /// this struct's field types, but the signature stays honest).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the payload to its percent-encoded JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_encoded(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(utf8_percent_encode(&json, NON_ALPHANUMERIC).to_string())
    }
}

/// Truncated SHA-256 over the identifier, event date, and configured
/// secret. Generated at issuance; legacy direct-format codes carry no
/// hash, so it is not checked at the door.
#[must_use]
pub fn verification_hash(ticket_id: &str, event_date: &str, secret: &str) -> String {
    let digest = Sha256::digest(format!("{ticket_id}-{event_date}-{secret}"));
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::TicketType;

    fn sample_ticket() -> Ticket {
        Ticket::issue(
            TicketId::new("EVT-1700000000000-1"),
            "Asha Patel".to_string(),
            "asha@example.com".to_string(),
            TicketType::Vip,
            "pay_123".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn direct_identifier_decodes_without_parsing() {
        let Ok(decoded) = decode("EVT-1700000000000-1") else {
            panic!("direct identifier should decode");
        };
        assert_eq!(decoded.ticket_id.as_str(), "EVT-1700000000000-1");
        assert_eq!(decoded.source, DecodeFormat::Direct);
    }

    #[test]
    fn structured_payload_decodes() {
        let Ok(decoded) = decode(r#"{"ticketId":"EVT-1700000000000-1"}"#) else {
            panic!("structured payload should decode");
        };
        assert_eq!(decoded.ticket_id.as_str(), "EVT-1700000000000-1");
        assert_eq!(decoded.source, DecodeFormat::Structured);
    }

    #[test]
    fn percent_encoded_payload_decodes() {
        let raw = "%7B%22ticketId%22%3A%22EVT-1700000000000-1%22%7D";
        let Ok(decoded) = decode(raw) else {
            panic!("encoded payload should decode");
        };
        assert_eq!(decoded.ticket_id.as_str(), "EVT-1700000000000-1");
        assert_eq!(decoded.source, DecodeFormat::EncodedStructured);
    }

    #[test]
    fn all_three_generated_forms_round_trip() {
        let ticket = sample_ticket();
        let payload = QrPayload::for_ticket(&ticket, "Garba Night 2025", "2025-10-15", "secret");

        let Ok(direct) = decode(ticket.ticket_id.as_str()) else {
            panic!("direct form should decode");
        };
        assert_eq!(direct.ticket_id, ticket.ticket_id);

        let Ok(json) = payload.to_json() else {
            panic!("payload should serialize");
        };
        let Ok(structured) = decode(&json) else {
            panic!("structured form should decode");
        };
        assert_eq!(structured.ticket_id, ticket.ticket_id);
        assert_eq!(structured.source, DecodeFormat::Structured);

        let Ok(encoded) = payload.to_encoded() else {
            panic!("payload should encode");
        };
        let Ok(enc_decoded) = decode(&encoded) else {
            panic!("encoded form should decode");
        };
        assert_eq!(enc_decoded.ticket_id, ticket.ticket_id);
        assert_eq!(enc_decoded.source, DecodeFormat::EncodedStructured);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(decode(""), Err(QrDecodeError::Empty));
    }

    #[test]
    fn json_without_ticket_id_commits_to_structured_path() {
        let result = decode(r#"{"event":"Garba Night 2025"}"#);
        assert!(matches!(result, Err(QrDecodeError::MissingTicketId { .. })));
    }

    #[test]
    fn json_with_empty_ticket_id_is_rejected() {
        let result = decode(r#"{"ticketId":""}"#);
        assert!(matches!(result, Err(QrDecodeError::MissingTicketId { .. })));
    }

    #[test]
    fn decode_is_total_over_garbage() {
        for raw in [
            "not a ticket",
            "GARBA-123",
            "%ZZ%%%",
            "%7Bnot-json%7D",
            "{\"ticketId\":",
            "\u{1F3AB}",
        ] {
            let result = decode(raw);
            assert!(result.is_err(), "expected typed failure for {raw:?}");
        }
    }

    #[test]
    fn verification_hash_is_stable_and_truncated() {
        let a = verification_hash("EVT-1-1", "2025-10-15", "secret");
        let b = verification_hash("EVT-1-1", "2025-10-15", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        let c = verification_hash("EVT-1-2", "2025-10-15", "secret");
        assert_ne!(a, c);
    }
}
