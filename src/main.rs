use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sssb_watcher::notify::SmtpNotifier;
use sssb_watcher::{Config, ListingWatcher, Result};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("run aborted: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    info!("Starting SSSB listing watcher");
    if let Some(interval) = config.poll_interval {
        info!(
            "poll interval for the external scheduler: {}s",
            interval.as_secs()
        );
    }

    let notifier = SmtpNotifier::new(&config.smtp)?;
    let watcher = ListingWatcher::new(config, Box::new(notifier))?;
    watcher.run().await
}
