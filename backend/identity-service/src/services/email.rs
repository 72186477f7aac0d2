/// Email delivery for verification and password reset links
use crate::config::EmailSettings;
use crate::error::{IdentityError, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

/// Async SMTP transport wrapper. With no SMTP host configured it runs in
/// no-op mode and only logs, which keeps local development email-free.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    frontend_base_url: String,
}

impl EmailService {
    pub fn new(config: &EmailSettings) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| IdentityError::Internal(format!("Invalid SMTP_FROM address: {e}")))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| {
                    IdentityError::Internal(format!("Failed to configure SMTP transport: {e}"))
                })?
                .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            frontend_base_url: config.frontend_base_url.clone(),
        })
    }

    pub async fn send_verification_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = format!("{}/verify-email?token={}", self.frontend_base_url, token);
        let body = format!(
            "Welcome to LinkUp!\n\nPlease click the following link to verify your email:\n{link}\n\nIf you did not create an account, you can ignore this email."
        );
        self.send(recipient, "Verify your LinkUp account", &body)
            .await
    }

    pub async fn send_password_reset_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = format!("{}/reset-password/{}", self.frontend_base_url, token);
        let body = format!(
            "We received your password reset request.\n\nClick this link to reset your LinkUp password:\n{link}\n\nThe link expires in 1 hour. If you did not request this, ignore this email."
        );
        self.send(recipient, "Reset your LinkUp password", &body).await
    }

    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(recipient, subject, "Email suppressed (no-op mode)");
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| IdentityError::Validation(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| IdentityError::Internal(format!("Failed to build email: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| IdentityError::Internal(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}
