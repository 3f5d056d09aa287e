use std::collections::HashSet;

use tracing::debug;

use crate::parser::Listing;

/// Outcome of evaluating one listing against the seen set and the exclusion
/// lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Never evaluated before and not excluded: notify.
    Notify,
    /// Key already in the seen set; exclusion rules are not consulted.
    AlreadySeen,
    /// Suppressed because the listing type is excluded.
    ExcludedType,
    /// Suppressed because the listing area is excluded.
    ExcludedArea,
}

/// Dedup and exclusion engine. Holds the seen-key set for the duration of a
/// run; the set only ever grows.
pub struct ListingFilter {
    seen: HashSet<String>,
    exclude_types: HashSet<String>,
    exclude_areas: HashSet<String>,
}

impl ListingFilter {
    pub fn new(seen: HashSet<String>, exclude_types: &[String], exclude_areas: &[String]) -> Self {
        Self {
            seen,
            exclude_types: exclude_types.iter().cloned().collect(),
            exclude_areas: exclude_areas.iter().cloned().collect(),
        }
    }

    /// Evaluate a listing. Dedup by key runs first; a previously unseen key
    /// is recorded immediately, before the exclusion checks, so an excluded
    /// listing is also never evaluated again.
    pub fn evaluate(&mut self, listing: &Listing) -> Verdict {
        let key = listing.key();

        if self.seen.contains(&key) {
            debug!("already seen: {}", key);
            return Verdict::AlreadySeen;
        }
        self.seen.insert(key);

        if self.exclude_types.contains(&listing.kind) {
            debug!("excluded type '{}': {}", listing.kind, listing.url);
            return Verdict::ExcludedType;
        }
        if self.exclude_areas.contains(&listing.area) {
            debug!("excluded area '{}': {}", listing.area, listing.url);
            return Verdict::ExcludedArea;
        }

        Verdict::Notify
    }

    pub fn should_notify(&mut self, listing: &Listing) -> bool {
        self.evaluate(listing) == Verdict::Notify
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
