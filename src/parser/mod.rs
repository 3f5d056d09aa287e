pub mod extract;
pub mod filter;
pub mod listing;

pub use extract::{ListingExtractor, PageContent};
pub use filter::{ListingFilter, Verdict};
pub use listing::Listing;
