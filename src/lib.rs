//! Configuration-driven JSON fetching with a URL-keyed disk cache
//!
//! Three collaborating pieces: [`Settings`] holds two flags loaded once from
//! a settings file, [`DiskCache`] maps URLs to deterministic file paths under
//! a cache root, and [`FetchClient`] uses both to decide whether a request is
//! served from disk or from a live HTTP call, optionally persisting live
//! responses.
//!
//! All three are plain injected values; there is no global state.
//!
//! ```no_run
//! use fetchcache::{DiskCache, FetchClient, FetchRequest, Settings};
//!
//! # async fn run() -> Result<(), fetchcache::FetchError> {
//! let settings = Settings::load("settings.json");
//! let cache = DiskCache::with_root("/tmp/api-cache".into());
//! let client = FetchClient::new(settings, cache);
//!
//! let url = "https://api.example.com/items?id=42".parse().unwrap();
//! let item: serde_json::Value = client.fetch(FetchRequest::get(url)).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod fetch;

pub use cache::{CacheError, DiskCache};
pub use config::Settings;
pub use fetch::{FetchClient, FetchError, FetchRequest};
