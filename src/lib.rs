//! # ticket-gateway
//!
//! REST API backend for event ticket sales and door entry validation.
//!
//! The gateway issues tickets after payment confirmation, delivers booking
//! confirmations by email, and validates QR codes at the venue door. The
//! check-in path enforces at-most-once admission: a ticket moves from
//! `confirmed` to `used` exactly once, via a conditional store write, with
//! distinguishable outcomes for not-found, cancelled, already-scanned, and
//! newly-granted entry.
//!
//! ## Architecture
//!
//! ```text
//! Clients (booking frontend, door scanners)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ValidationEngine   (service/) — entry state machine
//!     ├── IssuanceService    (service/) — ticket creation
//!     ├── ReportingService   (service/) — scan statistics
//!     ├── ConfirmationMailer (service/) — SMTP delivery
//!     ├── PaymentClient      (service/) — gateway order creation
//!     │
//!     ├── Ticket / TicketId / QR codec (domain/)
//!     │
//!     └── TicketStore: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
