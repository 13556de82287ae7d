//! Disk cache keyed by URL path and query
//!
//! Provides a `DiskCache` that derives a deterministic file path from a URL
//! and stores raw response bodies there as UTF-8 text. Writes are advisory:
//! failures are logged and swallowed so a cache problem can never fail a
//! fetch.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Characters stripped from a query string before it becomes a file name
const UNSAFE_FILENAME_CHARS: &[char] = &['/', ':', '?', '%', '*', '|', '"', '<', '>'];

/// File name used when the URL has no query string
const DEFAULT_ENTRY_STEM: &str = "default";

/// Errors that can occur when reading a cache entry
///
/// Write failures never surface as errors; they are logged and swallowed.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No entry exists at the derived path
    #[error("no cache entry at {}", .path.display())]
    NotFound {
        /// The derived path that was probed
        path: PathBuf,
    },

    /// Reading the entry failed for a reason other than absence
    #[error("failed to read cache entry: {0}")]
    Io(#[from] io::Error),

    /// The entry exists but is not valid JSON of the requested shape
    #[error("failed to parse cache entry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads and writes response bodies at URL-derived paths under a cache root
///
/// A given URL always derives the same path under a given root, so reads and
/// writes for the same URL meet at the same file. There is no locking:
/// concurrent writers to one key race with filesystem last-write-wins.
///
/// All I/O is synchronous and blocks the caller for its duration; callers on
/// a latency-sensitive path should move cache access off it themselves.
#[derive(Debug, Clone)]
pub struct DiskCache {
    /// Directory under which entry paths are derived
    root: PathBuf,
}

impl DiskCache {
    /// Creates a new DiskCache using an XDG-compliant cache directory
    ///
    /// Uses `~/.cache/fetchcache/` on Linux, or the equivalent path on other
    /// platforms. Returns `None` if the cache directory cannot be determined
    /// (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "fetchcache")?;
        Some(Self {
            root: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a new DiskCache with a custom root directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the derived path for the given URL
    ///
    /// The URL's non-empty path segments become nested directories under the
    /// root. The file name is the query string with path-unsafe characters
    /// removed, or `default` when there is no query or sanitization leaves
    /// nothing, always suffixed with `.json` regardless of actual content.
    pub fn entry_path(&self, url: &Url) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(segments) = url.path_segments() {
            for segment in segments.filter(|s| !s.is_empty()) {
                path.push(segment);
            }
        }

        let stem = url
            .query()
            .map(sanitize_query)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ENTRY_STEM.to_string());
        path.push(format!("{}.json", stem));
        path
    }

    /// Writes a response body to the cache, best-effort
    ///
    /// Creates intermediate directories as needed and stores the bytes as
    /// UTF-8 text at the derived path, overwriting any previous entry.
    /// Non-UTF-8 payloads and I/O failures are logged and swallowed; callers
    /// never learn of a cache-write failure.
    pub fn write(&self, url: &Url, bytes: &[u8]) {
        let contents = match std::str::from_utf8(bytes) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(url = %url, error = %e, "response body is not UTF-8, skipping cache write");
                return;
            }
        };

        let path = self.entry_path(url);
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "failed to create cache directory");
                return;
            }
        }

        match fs::write(&path, contents) {
            Ok(()) => debug!(path = %path.display(), "cached response"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write cache entry"),
        }
    }

    /// Reads a cache entry and parses it as JSON of the requested shape
    ///
    /// # Returns
    /// * `Ok(T)` if the entry exists and parses
    /// * `Err(CacheError::NotFound)` if no entry exists at the derived path
    /// * `Err(CacheError::Parse)` if the entry is not valid JSON of shape `T`
    pub fn read<T: DeserializeOwned>(&self, url: &Url) -> Result<T, CacheError> {
        let contents = self.read_text(url)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Reads a cache entry as raw text without parsing
    pub fn read_text(&self, url: &Url) -> Result<String, CacheError> {
        let path = self.entry_path(url);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CacheError::NotFound { path }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Removes path-unsafe characters from a query string
fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect()
}
