use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::SmtpConfig;
use crate::error::WatchError;
use crate::notify::Notifier;

/// Sends plain-text mail over authenticated SMTP with STARTTLS.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Address parsing and relay setup happen here, before any listing work,
    /// so a bad mail configuration fails the run up front.
    pub fn new(config: &SmtpConfig) -> Result<Self, WatchError> {
        let from = config.from.parse().map_err(|e| {
            WatchError::ConfigError(format!("EMAIL_FROM '{}' is not a valid address: {}", config.from, e))
        })?;
        let to = config.to.parse().map_err(|e| {
            WatchError::ConfigError(format!("EMAIL_TO '{}' is not a valid address: {}", config.to, e))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                WatchError::ConfigError(format!("cannot set up SMTP relay for '{}': {}", config.host, e))
            })?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport, from, to })
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), WatchError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| WatchError::DeliveryError(format!("failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| WatchError::DeliveryError(format!("smtp send failed: {}", e)))?;

        debug!("notification email sent to {}", self.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "watcher".to_string(),
            password: "hunter2".to_string(),
            from: "watcher@example.com".to_string(),
            to: "me@example.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn test_notifier_builds_from_valid_config() {
        assert!(SmtpNotifier::new(&smtp_config()).is_ok());
    }

    #[test]
    fn test_invalid_addresses_fail_as_config_errors() {
        let mut config = smtp_config();
        config.from = "not an address".to_string();

        let err = SmtpNotifier::new(&config).unwrap_err();
        assert!(matches!(err, WatchError::ConfigError(_)));
        assert!(err.to_string().contains("EMAIL_FROM"));

        let mut config = smtp_config();
        config.to = "also@not@valid".to_string();
        let err = SmtpNotifier::new(&config).unwrap_err();
        assert!(err.to_string().contains("EMAIL_TO"));
    }
}
