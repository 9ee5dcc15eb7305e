//! Scanner-facing DTOs: entry validation, manual override, scan stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ticket;
use crate::service::ScanStats;

/// Machine-readable result of a scan attempt.
///
/// The variant strings are a stable wire vocabulary consumed by the
/// scanner frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    /// Payload was empty or carried no ticket identifier.
    InvalidQr,
    /// Payload matched none of the accepted formats.
    InvalidFormat,
    /// No ticket with the decoded identifier exists.
    TicketNotFound,
    /// The ticket is cancelled.
    TicketCancelled,
    /// The ticket was already used for entry.
    AlreadyScanned,
    /// Entry granted; the ticket is now used.
    EntryGranted,
    /// Unexpected backend failure.
    ServerError,
}

/// Request body for `POST /api/validate-entry`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateEntryRequest {
    /// Raw QR payload exactly as scanned.
    pub qr_data: String,
    /// Identity of the scanning device or operator.
    #[serde(default)]
    pub scanned_by: Option<String>,
}

/// Identifying ticket fields echoed back to the scanner.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummaryDto {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Attendee display name.
    pub attendee_name: String,
    /// Ticket category.
    pub ticket_type: String,
    /// Current lifecycle state.
    pub status: String,
}

impl TicketSummaryDto {
    pub(crate) fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.to_string(),
            attendee_name: ticket.attendee_name.clone(),
            ticket_type: ticket.ticket_type.as_str().to_string(),
            status: ticket.status.as_str().to_string(),
        }
    }
}

/// Original scan metadata attached to a duplicate-scan rejection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScannedDetailsDto {
    /// When the ticket was first scanned.
    pub original_scan_time: Option<DateTime<Utc>>,
    /// Who performed the first scan.
    pub original_scanner: Option<String>,
    /// Milliseconds elapsed since the first scan.
    pub time_since_first_scan_ms: i64,
}

/// Event context attached to a granted entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailsDto {
    /// Event name.
    pub event_name: String,
    /// Venue description.
    pub venue: String,
    /// When entry was granted.
    pub entry_time: DateTime<Utc>,
}

/// Response body for `POST /api/validate-entry` and
/// `POST /api/manual-entry`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateEntryResponse {
    /// Whether entry was granted.
    pub success: bool,
    /// Human-readable message for the scanner display.
    pub message: String,
    /// Machine-readable status.
    pub status: ScanStatus,
    /// Identifying ticket fields, when a ticket was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketSummaryDto>,
    /// Original scan metadata on duplicate scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_details: Option<ScannedDetailsDto>,
    /// Event context on granted entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_details: Option<EntryDetailsDto>,
    /// Advisory troubleshooting data; structure is not part of the
    /// stable contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

/// Request body for `POST /api/manual-entry`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryRequest {
    /// Identifier of the ticket to force in.
    pub ticket_id: String,
    /// Why the override was needed.
    pub reason: String,
    /// Staff member authorizing the override.
    pub authorized_by: String,
}

/// Response body for `POST /api/manual-entry`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryResponse {
    /// Always `true` on a successful override.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// The ticket after the forced transition.
    pub ticket: TicketSummaryDto,
}

/// Aggregate counters inside the stats response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    /// Total tickets issued.
    pub total_tickets: u64,
    /// Tickets already used for entry.
    pub scanned_tickets: u64,
    /// Tickets still awaiting entry.
    pub pending_tickets: u64,
    /// Percentage of tickets scanned, one decimal.
    pub scan_rate: f64,
}

/// One recently scanned ticket in the stats feed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentScanDto {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Attendee display name.
    pub attendee_name: String,
    /// When the ticket was scanned.
    pub scanned_at: Option<DateTime<Utc>>,
    /// Who scanned it.
    pub scanned_by: Option<String>,
}

/// Response body for `GET /api/scan-stats`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatsResponse {
    /// Always `true`.
    pub success: bool,
    /// Aggregate counters.
    pub stats: StatsDto,
    /// Most recent scans, newest first.
    pub recent_scans: Vec<RecentScanDto>,
}

impl ScanStatsResponse {
    pub(crate) fn from_stats(stats: ScanStats) -> Self {
        Self {
            success: true,
            stats: StatsDto {
                total_tickets: stats.total_tickets,
                scanned_tickets: stats.scanned_tickets,
                pending_tickets: stats.pending_tickets,
                scan_rate: stats.scan_rate,
            },
            recent_scans: stats
                .recent_scans
                .iter()
                .map(|t| RecentScanDto {
                    ticket_id: t.ticket_id.to_string(),
                    attendee_name: t.attendee_name.clone(),
                    scanned_at: t.scanned_at,
                    scanned_by: t.scanned_by.clone(),
                })
                .collect(),
        }
    }
}
