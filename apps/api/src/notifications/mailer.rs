use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound mail transport used by notification passes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Maps a well-known service name to its SMTP relay; anything else is taken as a host.
pub fn smtp_host_for_service(service: &str) -> &str {
    match service.trim().to_ascii_lowercase().as_str() {
        "gmail" => "smtp.gmail.com",
        "outlook" | "hotmail" | "outlook365" => "smtp-mail.outlook.com",
        "yahoo" => "smtp.mail.yahoo.com",
        "icloud" => "smtp.mail.me.com",
        _ => service.trim(),
    }
}

/// Authenticated SMTP relay. Messages are sent from the login address.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(service: &str, username: &str, password: &str) -> Result<Self, MailError> {
        let from: Mailbox = username.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host_for_service(service))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)?;

        self.transport.send(message).await?;
        Ok(())
    }
}
