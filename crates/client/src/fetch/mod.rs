//! HTTP fetch pipeline with per-call timeouts and body limits.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Safety Gates
//! - Every request carries its own timeout; a slow source never stalls others.
//! - Max redirects: 5
//! - Bodies are either rejected past a size limit or truncated to a prefix.
//!
//! Source adapters depend on the [`PageFetcher`] trait rather than on
//! [`FetchClient`] so tests can serve fixture documents.

pub mod url;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, StatusCode, Url, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, canonicalize, unwrap_redirect};

use pastehunt_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Ceiling for any single request; per-call timeouts are usually shorter (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: AppConfig::default().user_agent, timeout: Duration::from_millis(20000), max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), ..Default::default() }
    }
}

/// HTTP method of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// How to treat a body larger than the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLimit {
    /// Fail with `FETCH_TOO_LARGE`.
    Reject(usize),
    /// Keep the first N bytes and stop reading.
    Truncate(usize),
}

/// A single outbound request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub timeout: Duration,
    pub limit: BodyLimit,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            query: Vec::new(),
            form: Vec::new(),
            timeout,
            limit: BodyLimit::Reject(5 * 1024 * 1024),
        }
    }

    pub fn post_form(url: impl Into<String>, form: &[(&str, &str)], timeout: Duration) -> Self {
        Self { method: Method::Post, form: to_pairs(form), ..Self::get(url, timeout) }
    }

    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = to_pairs(query);
        self
    }

    pub fn with_limit(mut self, limit: BodyLimit) -> Self {
        self.limit = limit;
        self
    }
}

fn to_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Whether the body was cut at a `BodyLimit::Truncate` limit
    pub truncated: bool,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Capability to perform one HTTP exchange.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a document. Non-2xx statuses are errors.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, Error>;
}

/// HTTP fetch client backed by reqwest.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn map_send_error(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{} timed out", url))
    } else {
        Error::HttpError(format!("network error: {}", err))
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut builder = match request.method {
            Method::Get => self.http.get(url.as_str()),
            Method::Post => self.http.post(url.as_str()).form(&request.form),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let mut response = builder
            .timeout(request.timeout)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| map_send_error(&url, e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} from {}", status.as_u16(), url)));
        }

        if let BodyLimit::Reject(max) = request.limit
            && let Some(len) = response.content_length()
            && len as usize > max
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, max)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut body = BytesMut::new();
        let mut truncated = false;

        while let Some(chunk) = response.chunk().await.map_err(|e| map_send_error(&url, e))? {
            match request.limit {
                BodyLimit::Reject(max) if body.len() + chunk.len() > max => {
                    return Err(Error::FetchTooLarge(format!("body exceeds {} bytes", max)));
                }
                BodyLimit::Truncate(max) if body.len() + chunk.len() > max => {
                    let room = max.saturating_sub(body.len());
                    body.extend_from_slice(&chunk[..room]);
                    truncated = true;
                    break;
                }
                _ => body.extend_from_slice(&chunk),
            }
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes, truncated: {})",
            url,
            final_url,
            fetch_ms,
            body.len(),
            truncated
        );

        Ok(FetchResponse { url, final_url, status, content_type, bytes: body.freeze(), truncated, fetch_ms })
    }
}
