use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Mutex;

use crate::config::environment::SmtpConfig;
use crate::modules::auth::model::TwoFactorPurpose;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mailer configuration error: {0}")]
    Configuration(String),

    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Delivers one-time codes to the account email. Delivery is best effort:
/// issuing a challenge succeeds even when the send fails, and the failure
/// is only logged.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_two_factor_code(
        &self,
        to: &str,
        purpose: TwoFactorPurpose,
        code: &str,
    ) -> Result<(), MailerError>;
}

fn subject_for(purpose: TwoFactorPurpose) -> &'static str {
    match purpose {
        TwoFactorPurpose::Login => "Your sign-in code",
        TwoFactorPurpose::Enable => "Your two-factor activation code",
        TwoFactorPurpose::Reset => "Your password reset code",
    }
}

// =============================================================================
// SMTP (lettre)
// =============================================================================

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailerError::Configuration(format!("invalid SMTP host: {}", e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from
            .parse()
            .map_err(|_| MailerError::Configuration("invalid SMTP_FROM address".to_string()))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_two_factor_code(
        &self,
        to: &str,
        purpose: TwoFactorPurpose,
        code: &str,
    ) -> Result<(), MailerError> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| MailerError::Delivery("invalid recipient address".to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject_for(purpose))
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your verification code is {}. It expires in 10 minutes.",
                code
            ))
            .map_err(|e| MailerError::Delivery(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Delivery(e.to_string()))?;

        Ok(())
    }
}

// =============================================================================
// LOG-ONLY (no SMTP configured)
// =============================================================================

/// Records that a code would have been sent. The code itself is never
/// written to the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_two_factor_code(
        &self,
        to: &str,
        purpose: TwoFactorPurpose,
        _code: &str,
    ) -> Result<(), MailerError> {
        tracing::info!(recipient = to, purpose = purpose.as_str(), "two-factor code issued, SMTP not configured");
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY (tests)
// =============================================================================

#[derive(Debug, Clone)]
pub struct SentCode {
    pub to: String,
    pub purpose: TwoFactorPurpose,
    pub code: String,
}

/// Captures outgoing codes so tests can read them back, standing in for a
/// user checking their inbox.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl MemoryMailer {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|sent| sent.to == email)
            .map(|sent| sent.code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_two_factor_code(
        &self,
        to: &str,
        purpose: TwoFactorPurpose,
        code: &str,
    ) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(SentCode {
            to: to.to_string(),
            purpose,
            code: code.to_string(),
        });
        Ok(())
    }
}
