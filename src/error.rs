use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Delivery error: {0}")]
    DeliveryError(String),

    #[error("State file error: {0}")]
    StateError(String),
}

/// How the run should react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Stop the run with a non-zero exit.
    Abort,
    /// Give up on the current page, keep going with the next URL.
    SkipPage,
    /// Log it and carry on with the current page.
    LogAndContinue,
}

impl WatchError {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            WatchError::ConfigError(_) => RecoveryStrategy::Abort,
            WatchError::StateError(_) => RecoveryStrategy::Abort,
            WatchError::RenderError(_) => RecoveryStrategy::SkipPage,
            WatchError::ExtractionError(_) => RecoveryStrategy::SkipPage,
            WatchError::DeliveryError(_) => RecoveryStrategy::LogAndContinue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors_abort() {
        let config = WatchError::ConfigError("missing SMTP_SERVER".to_string());
        assert_eq!(config.recovery_strategy(), RecoveryStrategy::Abort);

        let state = WatchError::StateError("cannot write seen file".to_string());
        assert_eq!(state.recovery_strategy(), RecoveryStrategy::Abort);
    }

    #[test]
    fn test_page_errors_skip_page() {
        let render = WatchError::RenderError("page load timed out".to_string());
        assert_eq!(render.recovery_strategy(), RecoveryStrategy::SkipPage);

        let extract = WatchError::ExtractionError("missing field".to_string());
        assert_eq!(extract.recovery_strategy(), RecoveryStrategy::SkipPage);
    }

    #[test]
    fn test_delivery_errors_continue() {
        let delivery = WatchError::DeliveryError("smtp unavailable".to_string());
        assert_eq!(delivery.recovery_strategy(), RecoveryStrategy::LogAndContinue);
    }
}
