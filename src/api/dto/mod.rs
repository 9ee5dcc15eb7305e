//! Request and response DTOs for the REST API.
//!
//! Wire field names are camelCase; they are a stable contract with the
//! scanner and booking frontends and must not drift with internal
//! renames.

pub mod email_dto;
pub mod payment_dto;
pub mod scanner_dto;
pub mod ticket_dto;

pub use email_dto::{SendConfirmationRequest, SendConfirmationResponse, TicketLineDto};
pub use payment_dto::{CreateOrderRequest, CreateOrderResponse};
pub use scanner_dto::{
    EntryDetailsDto, ManualEntryRequest, ManualEntryResponse, RecentScanDto, ScanStatsResponse,
    ScanStatus, ScannedDetailsDto, StatsDto, TicketSummaryDto, ValidateEntryRequest,
    ValidateEntryResponse,
};
pub use ticket_dto::{
    GenerateTicketsRequest, GenerateTicketsResponse, IssuedTicketDto, ListTicketDto,
    ListTicketsResponse,
};
