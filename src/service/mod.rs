//! Service layer: entry validation, issuance, reporting, email, payments.

pub mod email;
pub mod issuance;
pub mod payment;
pub mod reporting;
pub mod validation;

pub use email::{ConfirmationMailer, TicketLine};
pub use issuance::{IssuanceService, IssueOrder, IssuedTicket};
pub use payment::{PaymentClient, PaymentOrder};
pub use reporting::{ReportingService, ScanStats};
pub use validation::{NotFoundDiagnostics, ValidationEngine, ValidationOutcome};
