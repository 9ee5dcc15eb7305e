//! Domain types: ticket entity, identifiers, and the QR payload codec.

pub mod qr_payload;
pub mod ticket;
pub mod ticket_id;

pub use qr_payload::{DecodeFormat, DecodedQr, QrDecodeError, QrPayload};
pub use ticket::{Ticket, TicketStatus, TicketType};
pub use ticket_id::TicketId;
