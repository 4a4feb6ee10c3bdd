//! Outbound inquiry email over SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. If `SMTP_HOST` is not
//! set, [`MailConfig::from_env`] returns `None` and inquiries are recorded
//! and logged without being mailed.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why one inquiry email could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Connection, TLS or authentication failure talking to the relay.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A vendor contact or `SMTP_FROM` is not a valid mailbox.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled from subject and body.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// STARTTLS submission port.
const DEFAULT_SMTP_PORT: u16 = 587;

/// Sender used when `SMTP_FROM` is unset.
const DEFAULT_FROM_ADDRESS: &str = "quotes@quotedesk.local";

/// SMTP relay settings for vendor inquiries.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Relay hostname; STARTTLS is required.
    pub smtp_host: String,
    /// Relay port, 587 unless `SMTP_PORT` says otherwise.
    pub smtp_port: u16,
    /// Address vendors see the inquiry come from and reply to.
    pub from_address: String,
    /// Login name; credentials are only sent when the password is set too.
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load SMTP settings, or `None` when `SMTP_HOST` is unset.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      |                           |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `quotes@quotedesk.local`  |
    /// | `SMTP_USER`     | no       |                           |
    /// | `SMTP_PASSWORD` | no       |                           |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends plain-text inquiry emails. The transport is built once and shared.
pub struct Mailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build the relay transport. No connection is made until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from_address: config.from_address.clone(),
            transport: builder.build(),
        })
    }

    /// Send one plain-text inquiry to a vendor contact.
    pub async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = build_message(&self.from_address, to_email, subject, body)?;
        self.transport.send(email).await?;
        tracing::info!(to = to_email, "Inquiry email sent");
        Ok(())
    }
}

fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message, MailError> {
    Message::builder()
        .from(from.parse()?)
        .to(to.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| MailError::Build(e.to_string()))
}
