//! Cached fetch path for JSON APIs
//!
//! This module provides `FetchClient`, which decides per request between
//! serving from the disk cache and issuing a live HTTP call, based on the
//! injected settings. Live responses are optionally persisted to the cache
//! before decoding.

use std::string::FromUtf8Error;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheError, DiskCache};
use crate::config::Settings;

/// Timeout applied to every live call unless the request overrides it
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(200);

/// Errors that can occur when performing a cached fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// The live HTTP call failed (connectivity, server error, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be parsed into the requested shape
    ///
    /// Distinct from a transport failure: the call succeeded and, when
    /// persistence is enabled, the raw bytes were already cached.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body is not valid UTF-8 text
    #[error("response body is not UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// Serving from the cache failed (entry absent or unparsable)
    ///
    /// Only produced on the cache-only path, when settings enable
    /// `loadFromCache`.
    #[error("cache read failed: {0}")]
    Cache(#[from] CacheError),
}

/// A single fetch to perform: URL plus method, headers, body, and timeout
///
/// One attempt per call; no retries, and redirects only as the transport
/// follows them implicitly.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    url: Url,
    method: Method,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
}

impl FetchRequest {
    /// Creates a request with the given method and URL
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: HeaderMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a GET request for the given URL
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Adds a header to the request
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The target URL, which also keys the cache entry
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Performs fetches, serving from cache or network per the injected settings
///
/// When `loadFromCache` is set, every fetch is served from the disk cache and
/// no network call is issued. Otherwise a single live call is made, and when
/// `saveToCache` is set the raw response bytes are persisted before decoding.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    settings: Settings,
    cache: DiskCache,
}

impl FetchClient {
    /// Creates a new FetchClient with a default HTTP client
    pub fn new(settings: Settings, cache: DiskCache) -> Self {
        Self::with_client(Client::new(), settings, cache)
    }

    /// Creates a new FetchClient with a custom HTTP client
    pub fn with_client(http: Client, settings: Settings, cache: DiskCache) -> Self {
        Self {
            http,
            settings,
            cache,
        }
    }

    /// Fetches a response and decodes it as JSON of the requested shape
    ///
    /// The shape is whatever `T` deserializes from: a typed struct, a
    /// `serde_json::Map` for bare objects, or a `Vec<Value>` for bare arrays.
    ///
    /// # Returns
    /// * `Ok(T)` on a decoded cache entry or live response
    /// * `Err(FetchError::Cache)` when the cache-only path finds no usable entry
    /// * `Err(FetchError::Transport)` when the live call fails
    /// * `Err(FetchError::Decode)` when the body is not valid JSON of shape `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: FetchRequest) -> Result<T, FetchError> {
        if self.settings.load_from_cache() {
            debug!(url = %request.url, "serving fetch from cache");
            return Ok(self.cache.read(&request.url)?);
        }

        let bytes = self.perform(request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches a response as raw UTF-8 text, skipping JSON decoding
    pub async fn fetch_text(&self, request: FetchRequest) -> Result<String, FetchError> {
        if self.settings.load_from_cache() {
            debug!(url = %request.url, "serving fetch from cache");
            return Ok(self.cache.read_text(&request.url)?);
        }

        let bytes = self.perform(request).await?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Issues the live call and persists the body when settings allow
    ///
    /// Cache persistence happens before any decoding, so a later decode
    /// failure still leaves the raw bytes on disk. A cache-write failure is
    /// logged inside the cache and never alters the result.
    async fn perform(&self, request: FetchRequest) -> Result<Vec<u8>, FetchError> {
        let url = request.url.clone();
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let bytes = response.bytes().await?;

        if self.settings.save_to_cache() {
            self.cache.write(&url, &bytes);
        }

        Ok(bytes.to_vec())
    }
}
