pub mod smtp;

use crate::error::WatchError;

pub use smtp::SmtpNotifier;

/// Outbound notification channel. One message per new listing.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), WatchError>;
}
