use std::path::PathBuf;
use std::time::Duration;

use crate::error::WatchError;

const DEFAULT_URLS: [&str; 2] = [
    "https://sssb.se/en/looking-for-housing/apply-for-apartment/new-constructions/?pagination=0&paginationantal=0",
    "https://sssb.se/en/looking-for-housing/apply-for-apartment/available-apartments/?pagination=0&paginationantal=0",
];

const DEFAULT_SEEN_FILE: &str = "./out/previous_apartments.txt";
const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub subject: String,
    pub urls: Vec<String>,
    pub exclude_types: Vec<String>,
    pub exclude_areas: Vec<String>,
    pub state_file: PathBuf,
    pub page_timeout: Duration,
    /// Cadence hint for the external scheduler; nothing in-process uses it.
    pub poll_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, WatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source. Everything is
    /// parsed and validated here, before any network activity.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, WatchError> {
        let smtp = SmtpConfig {
            host: require(&get, "SMTP_SERVER")?,
            port: parse_required(&get, "SMTP_PORT")?,
            username: require(&get, "SMTP_USERNAME")?,
            password: require(&get, "SMTP_PASSWORD")?,
            from: require(&get, "EMAIL_FROM")?,
            to: require(&get, "EMAIL_TO")?,
            timeout: duration_or(&get, "SMTP_TIMEOUT_SECS", DEFAULT_SMTP_TIMEOUT_SECS)?,
        };

        let config = Config {
            smtp,
            subject: require(&get, "EMAIL_SUBJECT")?,
            urls: json_list(&get, "LISTING_URLS")?
                .unwrap_or_else(|| DEFAULT_URLS.iter().map(|u| u.to_string()).collect()),
            exclude_types: json_list(&get, "EXCLUDE_TYPES")?.unwrap_or_default(),
            exclude_areas: json_list(&get, "EXCLUDE_AREAS")?.unwrap_or_default(),
            state_file: get("SEEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SEEN_FILE)),
            page_timeout: duration_or(&get, "PAGE_TIMEOUT_SECS", DEFAULT_PAGE_TIMEOUT_SECS)?,
            poll_interval: match get("TIME_INTERVAL") {
                Some(raw) => Some(Duration::from_secs(parse_value("TIME_INTERVAL", &raw)?)),
                None => None,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), WatchError> {
        if self.smtp.host.trim().is_empty() {
            return Err(WatchError::ConfigError(
                "SMTP_SERVER cannot be empty".to_string(),
            ));
        }
        if self.smtp.port == 0 {
            return Err(WatchError::ConfigError(
                "SMTP_PORT must be greater than 0".to_string(),
            ));
        }
        if self.subject.trim().is_empty() {
            return Err(WatchError::ConfigError(
                "EMAIL_SUBJECT cannot be empty".to_string(),
            ));
        }
        if self.urls.is_empty() {
            return Err(WatchError::ConfigError(
                "LISTING_URLS cannot be an empty list".to_string(),
            ));
        }
        for url in &self.urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WatchError::ConfigError(format!(
                    "listing URL '{}' must start with http:// or https://",
                    url
                )));
            }
        }
        if self.page_timeout.is_zero() || self.smtp.timeout.is_zero() {
            return Err(WatchError::ConfigError(
                "timeouts must be greater than 0 seconds".to_string(),
            ));
        }
        Ok(())
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, WatchError> {
    get(key).ok_or_else(|| WatchError::ConfigError(format!("{} is not set", key)))
}

fn parse_required<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<T, WatchError> {
    let raw = require(get, key)?;
    parse_value(key, &raw)
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, WatchError> {
    raw.trim()
        .parse()
        .map_err(|_| WatchError::ConfigError(format!("{} has invalid value '{}'", key, raw)))
}

fn duration_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_secs: u64,
) -> Result<Duration, WatchError> {
    let secs = match get(key) {
        Some(raw) => parse_value(key, &raw)?,
        None => default_secs,
    };
    Ok(Duration::from_secs(secs))
}

/// JSON-encoded string array, e.g. `EXCLUDE_AREAS=["Lappis", "Strix"]`.
fn json_list(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Vec<String>>, WatchError> {
    match get(key) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| {
                WatchError::ConfigError(format!("{} must be a JSON array of strings: {}", key, e))
            }),
    }
}
