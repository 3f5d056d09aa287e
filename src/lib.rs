pub mod browser;
pub mod config;
pub mod error;
pub mod notify;
pub mod parser;
pub mod storage;
pub mod watcher;

pub use config::Config;
pub use error::{Result, WatchError};
pub use watcher::ListingWatcher;
