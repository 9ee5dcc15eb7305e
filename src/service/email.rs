//! Booking confirmation delivery over SMTP.
//!
//! The transport is constructed once at startup from configuration and
//! injected; there is no module-level transporter instance.

use std::fmt;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{GatewayConfig, SmtpConfig};
use crate::error::GatewayError;

/// One ticket line in a confirmation email.
#[derive(Debug, Clone)]
pub struct TicketLine {
    /// Ticket identifier.
    pub ticket_id: String,
    /// Ticket category string.
    pub ticket_type: String,
    /// URL of the rendered QR image.
    pub qr_code: String,
}

/// Sends booking confirmations over an authenticated SMTP relay.
pub struct ConfirmationMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    event_name: String,
    event_date: String,
    event_venue: String,
}

impl fmt::Debug for ConfirmationMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationMailer")
            .field("from", &self.from)
            .field("event_name", &self.event_name)
            .finish_non_exhaustive()
    }
}

impl ConfirmationMailer {
    /// Builds the mailer from SMTP settings and event metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EmailError`] when the relay address or the
    /// configured sender mailbox is invalid.
    pub fn new(smtp: &SmtpConfig, config: &GatewayConfig) -> Result<Self, GatewayError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| GatewayError::EmailError(format!("SMTP relay: {e}")))?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        let from: Mailbox = format!("{} <{}>", smtp.from_name, smtp.from_email)
            .parse()
            .map_err(|e| GatewayError::EmailError(format!("sender mailbox: {e}")))?;

        Ok(Self {
            transport,
            from,
            event_name: config.event_name.clone(),
            event_date: config.event_date.clone(),
            event_venue: config.event_venue.clone(),
        })
    }

    /// Sends the booking confirmation listing every issued ticket, as a
    /// multipart message with plain-text and HTML alternatives.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on an unparseable
    /// recipient address or an empty ticket list, and
    /// [`GatewayError::EmailError`] on build or delivery failure.
    pub async fn send_confirmation(
        &self,
        to: &str,
        customer_name: &str,
        tickets: &[TicketLine],
        total_amount: f64,
        payment_id: &str,
    ) -> Result<(), GatewayError> {
        if tickets.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "at least one ticket is required".to_string(),
            ));
        }
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid recipient address: {e}")))?;

        let subject = format!(
            "Your {} Tickets - {} Confirmed",
            self.event_name,
            plural_tickets(tickets.len())
        );
        let text = self.render_body(customer_name, tickets, total_amount, payment_id);
        let html = self.render_html(customer_name, tickets, total_amount, payment_id);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| GatewayError::EmailError(format!("message build: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| GatewayError::EmailError(e.to_string()))?;

        tracing::info!(to, tickets = tickets.len(), "confirmation email sent");
        Ok(())
    }

    fn render_body(
        &self,
        customer_name: &str,
        tickets: &[TicketLine],
        total_amount: f64,
        payment_id: &str,
    ) -> String {
        let mut body = format!(
            "Dear {customer_name},\n\n\
             Your booking for {event} has been confirmed.\n\n\
             Event details:\n\
             - Event: {event}\n\
             - Date: {date}\n\
             - Venue: {venue}\n\
             - Total amount: {total_amount}\n\
             - Payment ID: {payment_id}\n\n\
             Your tickets ({count}):\n",
            event = self.event_name,
            date = self.event_date,
            venue = self.event_venue,
            count = tickets.len(),
        );
        for (index, ticket) in tickets.iter().enumerate() {
            body.push_str(&format!(
                "\nTicket #{num}:\n\
                 - Ticket ID: {id}\n\
                 - Type: {ty}\n\
                 - QR code: {qr}\n",
                num = index + 1,
                id = ticket.ticket_id,
                ty = ticket.ticket_type,
                qr = ticket.qr_code,
            ));
        }
        body.push_str(
            "\nShow the QR codes at the venue for entry and bring a valid photo ID.\n",
        );
        body
    }

    fn render_html(
        &self,
        customer_name: &str,
        tickets: &[TicketLine],
        total_amount: f64,
        payment_id: &str,
    ) -> String {
        let mut html = format!(
            "<h2>Booking confirmed</h2>\
             <p>Dear {customer_name},</p>\
             <p>Your booking for <strong>{event}</strong> has been confirmed.</p>\
             <ul>\
             <li>Date: {date}</li>\
             <li>Venue: {venue}</li>\
             <li>Total amount: {total_amount}</li>\
             <li>Payment ID: {payment_id}</li>\
             </ul>\
             <h3>Your tickets ({count})</h3>",
            event = self.event_name,
            date = self.event_date,
            venue = self.event_venue,
            count = tickets.len(),
        );
        for (index, ticket) in tickets.iter().enumerate() {
            html.push_str(&format!(
                "<p><strong>Ticket #{num}</strong><br>\
                 ID: {id}<br>Type: {ty}<br>\
                 <img src=\"{qr}\" alt=\"QR code for {id}\" width=\"200\" height=\"200\"></p>",
                num = index + 1,
                id = ticket.ticket_id,
                ty = ticket.ticket_type,
                qr = ticket.qr_code,
            ));
        }
        html.push_str(
            "<p>Show the QR codes at the venue for entry and bring a valid photo ID.</p>",
        );
        html
    }
}

fn plural_tickets(count: usize) -> String {
    if count == 1 {
        "1 Ticket".to_string()
    } else {
        format!("{count} Tickets")
    }
}
