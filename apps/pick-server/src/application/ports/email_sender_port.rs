//! Email Sender Port (Driven Port)

use async_trait::async_trait;

/// Email delivery error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmailError {
    /// The provider rejected the sender address or domain.
    #[error("Sender rejected: {message}")]
    SenderRejected { message: String },

    /// The provider rejected the request.
    #[error("Email rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport failed after retries.
    #[error("Email transport error: {message}")]
    Transport { message: String },
}

/// An email to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative.
    pub text: Option<String>,
}

/// Delivery receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailReceipt {
    /// Provider message ID; `None` when delivery is disabled and only logged.
    pub id: Option<String>,
}

/// Port for sending email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSenderPort: Send + Sync {
    /// Send one email.
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Whether messages are actually delivered.
    fn is_enabled(&self) -> bool;
}

/// Sender that only logs, used when no provider key is configured.
#[derive(Debug, Clone, Default)]
pub struct LogOnlyEmailSender;

#[async_trait]
impl EmailSenderPort for LogOnlyEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Email delivery disabled, logging message instead"
        );
        Ok(EmailReceipt::default())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
