//! Injected HTTP capability used for every Batchbook call.
//!
//! The adapter never talks to `reqwest` directly: it receives an
//! [`HttpClient`] so that lookups, creations and the validation probe can be
//! exercised against an in-memory double. [`ReqwestHttpClient`] is the
//! production implementation.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or its body could not be read.
    ///
    /// The URL is stripped from the wrapped error so query-string tokens
    /// never reach logs.
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The URL could not be built from the base and query parameters.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Status and decoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body decoded as JSON. Non-JSON bodies are kept as [`Value::String`],
    /// empty bodies as [`Value::Null`].
    pub body: Value,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET/POST capability with query parameters and JSON bodies.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be completed. A non-2xx
    /// status is not an error at this layer.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, HttpError>;

    /// Send a POST request with query parameters and a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be completed. A non-2xx
    /// status is not an error at this layer.
    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    inner: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, HttpError> {
        let target = build_url(url, query)?;
        debug!(method = "GET", url, "sending request");
        let response = self
            .inner
            .get(target)
            .send()
            .await
            .map_err(|e| HttpError::Request(e.without_url()))?;
        read_response(response).await
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpResponse, HttpError> {
        let target = build_url(url, query)?;
        debug!(method = "POST", url, "sending request");
        let response = self
            .inner
            .post(target)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::Request(e.without_url()))?;
        read_response(response).await
    }
}

fn build_url(url: &str, query: &[(&str, &str)]) -> Result<url::Url, HttpError> {
    url::Url::parse_with_params(url, query).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| HttpError::Request(e.without_url()))?;
    Ok(HttpResponse {
        status,
        body: decode_body(text),
    })
}

/// Decode a raw body into JSON, falling back to a string value.
#[doc(hidden)]
pub fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

/// Secrets shorter than this are only redacted as `auth_token=` values.
pub const MIN_LITERAL_SECRET_CHARS: usize = 8;

/// Collapse, redact and truncate an error body before it is surfaced.
///
/// Any `auth_token=...` query value is replaced by `[REDACTED]`, as is every
/// literal occurrence of `secret` when it is at least
/// [`MIN_LITERAL_SECRET_CHARS`] long.
pub fn sanitize_error_body(raw: &str, secret: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let secret = secret.trim();
    let mut sanitized = if secret.chars().count() < MIN_LITERAL_SECRET_CHARS {
        collapsed
    } else {
        collapsed.replace(secret, "[REDACTED]")
    };
    if let Ok(regex) = Regex::new(r"auth_token=[^&\s'\x22]+") {
        sanitized = regex
            .replace_all(&sanitized, "auth_token=[REDACTED]")
            .into_owned();
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}
