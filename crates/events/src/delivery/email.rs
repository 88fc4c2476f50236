//! Order email delivery over SMTP.
//!
//! [`EmailConfig::from_env`] returns `None` when `SMTP_HOST` is unset, in
//! which case the shop runs without email. [`EmailDelivery::new`] parses the
//! sender and builds the STARTTLS transport once, so a bad `SMTP_FROM` or
//! host fails at startup instead of on the first order.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "Crave & Glaze <orders@craveandglaze.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender mailbox, display name allowed.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// | Variable        | Required | Default                                       |
    /// |-----------------|----------|-----------------------------------------------|
    /// | `SMTP_HOST`     | yes      |                                               |
    /// | `SMTP_PORT`     | no       | `587`                                         |
    /// | `SMTP_FROM`     | no       | `Crave & Glaze <orders@craveandglaze.local>`  |
    /// | `SMTP_USER`     | no       |                                               |
    /// | `SMTP_PASSWORD` | no       |                                               |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
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

/// A rendered plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    /// Where replies go. Admin alerts point this at the customer so the
    /// owner can answer them directly.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Assemble the MIME message sent from `from`.
    pub fn to_message(&self, from: Mailbox) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(from)
            .to(self.to.parse()?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }
        builder
            .body(self.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

/// Anything that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// SMTP-backed [`Mailer`].
pub struct EmailDelivery {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for EmailDelivery {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = email.to_message(self.from.clone())?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(reply_to: Option<&str>) -> OutgoingEmail {
        OutgoingEmail {
            to: "owner@example.com".to_string(),
            reply_to: reply_to.map(str::to_string),
            subject: "New order".to_string(),
            body: "Order #1".to_string(),
        }
    }

    #[test]
    fn default_from_address_parses_as_mailbox() {
        let mailbox: Mailbox = DEFAULT_FROM_ADDRESS.parse().unwrap();
        assert_eq!(mailbox.email.to_string(), "orders@craveandglaze.local");
    }

    #[test]
    fn reply_to_header_is_set_when_present() {
        let from: Mailbox = DEFAULT_FROM_ADDRESS.parse().unwrap();
        let raw = String::from_utf8(
            alert(Some("achieng@example.com"))
                .to_message(from)
                .unwrap()
                .formatted(),
        )
        .unwrap();
        assert!(raw.contains("Reply-To: achieng@example.com"));
        assert!(raw.contains("To: owner@example.com"));
    }

    #[test]
    fn no_reply_to_header_by_default() {
        let from: Mailbox = DEFAULT_FROM_ADDRESS.parse().unwrap();
        let raw = String::from_utf8(alert(None).to_message(from).unwrap().formatted()).unwrap();
        assert!(!raw.contains("Reply-To"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let from: Mailbox = DEFAULT_FROM_ADDRESS.parse().unwrap();
        let mut email = alert(None);
        email.to = "not-an-email".to_string();
        assert!(matches!(email.to_message(from), Err(EmailError::Address(_))));
    }

    #[test]
    fn bad_sender_fails_at_construction() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: "not a mailbox".to_string(),
            smtp_user: None,
            smtp_password: None,
        };
        assert!(matches!(EmailDelivery::new(config), Err(EmailError::Address(_))));
    }
}
