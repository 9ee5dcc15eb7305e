//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::persistence::Store;
use crate::service::{
    ConfirmationMailer, IssuanceService, PaymentClient, ReportingService, ValidationEngine,
};

/// Application state shared across all HTTP handlers.
///
/// Every field is cheaply cloneable; the router clones the state per
/// request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Entry validation engine.
    pub validation: Arc<ValidationEngine<Store>>,
    /// Ticket issuance service.
    pub issuance: Arc<IssuanceService<Store>>,
    /// Scan reporting service.
    pub reporting: Arc<ReportingService<Store>>,
    /// Confirmation mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<ConfirmationMailer>>,
    /// Payment gateway client; `None` when credentials are not configured.
    pub payments: Option<Arc<PaymentClient>>,
    /// Loaded gateway configuration.
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Wires the service layer around the selected store backend.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EmailError`] when SMTP credentials are
    /// present but the mailer cannot be constructed from them.
    pub fn build(store: Store, config: GatewayConfig) -> Result<Self, GatewayError> {
        let store = Arc::new(store);

        let mailer = match &config.smtp {
            Some(smtp) => Some(Arc::new(ConfirmationMailer::new(smtp, &config)?)),
            None => None,
        };
        let payments = config
            .payment
            .as_ref()
            .map(|payment| Arc::new(PaymentClient::new(payment)));

        Ok(Self {
            validation: Arc::new(ValidationEngine::new(Arc::clone(&store))),
            issuance: Arc::new(IssuanceService::new(Arc::clone(&store), &config)),
            reporting: Arc::new(ReportingService::new(store)),
            mailer,
            payments,
            config: Arc::new(config),
        })
    }
}
