use tracing::{debug, error, info, warn};

use crate::browser::RenderSession;
use crate::config::Config;
use crate::error::{RecoveryStrategy, WatchError};
use crate::notify::Notifier;
use crate::parser::{ListingExtractor, ListingFilter, PageContent, Verdict};
use crate::storage::SeenStore;

/// The poller: renders each configured listing page once, notifies about
/// listings not seen before, and persists the seen-key set.
pub struct ListingWatcher {
    config: Config,
    extractor: ListingExtractor,
    store: SeenStore,
    notifier: Box<dyn Notifier>,
}

impl ListingWatcher {
    pub fn new(config: Config, notifier: Box<dyn Notifier>) -> Result<Self, WatchError> {
        let extractor = ListingExtractor::new()?;
        let store = SeenStore::new(config.state_file.clone());
        Ok(Self {
            config,
            extractor,
            store,
            notifier,
        })
    }

    /// One complete run: load state, render every page through a single
    /// scoped browser session, evaluate and notify, persist state. The
    /// session is closed on every exit path.
    pub async fn run(&self) -> crate::error::Result<()> {
        let seen = self.store.load()?;
        info!("loaded {} previously seen listing keys", seen.len());
        let mut filter = ListingFilter::new(
            seen,
            &self.config.exclude_types,
            &self.config.exclude_areas,
        );

        let session = RenderSession::launch(self.config.page_timeout).await?;
        let outcome = self.check_all_pages(&session, &mut filter).await;
        if let Err(e) = session.close().await {
            warn!("browser shutdown failed: {}", e);
        }
        let new_count = outcome?;

        self.store.save(filter.seen())?;
        info!(
            "run complete: {} new listings, {} keys tracked",
            new_count,
            filter.seen_count()
        );
        Ok(())
    }

    async fn check_all_pages(
        &self,
        session: &RenderSession,
        filter: &mut ListingFilter,
    ) -> Result<u32, WatchError> {
        let mut new_count = 0;
        for url in &self.config.urls {
            match self.check_page(session, filter, url).await {
                Ok(found) => new_count += found,
                Err(e) if e.recovery_strategy() == RecoveryStrategy::Abort => return Err(e),
                Err(e) => warn!("skipping {}: {}", url, e),
            }
        }
        Ok(new_count)
    }

    async fn check_page(
        &self,
        session: &RenderSession,
        filter: &mut ListingFilter,
        url: &str,
    ) -> Result<u32, WatchError> {
        let html = session.render(url).await?;
        self.process_html(filter, &html, url).await
    }

    async fn process_html(
        &self,
        filter: &mut ListingFilter,
        html: &str,
        url: &str,
    ) -> Result<u32, WatchError> {
        let listings = match self.extractor.extract_page(html)? {
            PageContent::NoResults => {
                info!("No apartments found in {}.", url);
                return Ok(0);
            }
            PageContent::Listings(listings) => listings,
        };

        if listings.is_empty() {
            debug!("no listing cards in {}", url);
        }

        let mut new_count = 0;
        for listing in listings {
            match filter.evaluate(&listing) {
                Verdict::AlreadySeen => {}
                Verdict::ExcludedType | Verdict::ExcludedArea => {
                    // the key was recorded; persist it so a crash cannot
                    // bring the listing back
                    self.store.save(filter.seen())?;
                }
                Verdict::Notify => {
                    self.store.save(filter.seen())?;
                    new_count += 1;
                    info!("New listing: {}", listing.url);
                    let body = listing.notification_body();
                    if let Err(e) = self.notifier.send(&self.config.subject, &body).await {
                        error!("failed to deliver notification for {}: {}", listing.url, e);
                    }
                }
            }
        }
        Ok(new_count)
    }
}
