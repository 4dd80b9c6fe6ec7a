/// Question-answering service client implementation.
///
/// This module provides `QaClient` for making synchronous HTTP requests to the service,
/// along with the error type, the `QaTransport` seam and the builder used to configure it.
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL used when neither the builder nor `QA_ENDPOINT` provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Characters left unescaped in a query component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors that can occur when talking to the question-answering service.
#[derive(Debug, Error)]
pub enum QaError {
    /// Network-related errors (connection failures, DNS resolution, body reads)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx status from `/health` or `/add`
    #[error("HTTP error: status {status}")]
    Http { status: u16, body: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl QaError {
    /// Classifies a reqwest failure as a timeout or a plain network error.
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            QaError::Timeout(error)
        } else {
            QaError::Network(error)
        }
    }
}

/// An HTTP response with its body read as text, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response, filling the status text from the canonical reason phrase.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub doc_count: u64,
}

/// A document to ingest through `POST /add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub id: String,
    pub text: String,
    pub meta: serde_json::Map<String, serde_json::Value>,
}

/// Payload returned by `POST /add`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddReceipt {
    pub ok: bool,
    #[serde(default)]
    pub count: u64,
}

/// Percent-encodes a string for use as a single URL query component.
///
/// Every byte outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8, so
/// spaces become `%20` and reserved characters such as `&`, `=` and `+` survive
/// the round trip.
///
/// # Examples
///
/// ```
/// use qask::endpoint::encode_query_component;
///
/// assert_eq!(encode_query_component("a b&c"), "a%20b%26c");
/// ```
pub fn encode_query_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_COMPONENT).to_string()
}

/// Builder for constructing `QaClient` instances.
///
/// # Examples
///
/// ```
/// use qask::endpoint::QaClientBuilder;
///
/// let client = QaClientBuilder::new()
///     .base_url("http://localhost:8001")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8001");
/// ```
#[derive(Debug, Default)]
pub struct QaClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl QaClientBuilder {
    /// Creates a new `QaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the service (e.g., "http://localhost:8001").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a whole-request timeout. Without one, requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `QaClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `QA_ENDPOINT` is consulted, falling back to
    /// [`DEFAULT_BASE_URL`]. If `timeout()` was not called, `QA_TIMEOUT_SECS` is
    /// consulted; when it is unset or unparsable no timeout is applied.
    ///
    /// # Errors
    ///
    /// Returns `QaError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<QaClient, QaError> {
        // Determine base URL: use builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("QA_ENDPOINT").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = self.timeout.or_else(|| {
            std::env::var("QA_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        });

        reqwest::Url::parse(&base_url)
            .map_err(|e| QaError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // reqwest's blocking client defaults to a 30s timeout; replace it explicitly
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QaError::Network)?;

        Ok(QaClient {
            client,
            base_url,
            timeout,
        })
    }
}

/// Trait for issuing question requests.
///
/// This trait lets the query controller run against a canned transport in tests.
pub trait QaTransport: Send + Sync {
    /// Returns the full request URL used for `query`.
    fn query_url(&self, query: &str) -> String;

    /// Sends `query` to the `/qa` endpoint and returns the response with its body
    /// read as text, whatever the status code.
    ///
    /// Only transport failures are errors; HTTP failures come back as a `RawResponse`.
    fn fetch_answer(&self, query: &str) -> Result<RawResponse, QaError>;
}

/// Synchronous HTTP client for the question-answering service.
///
/// Construct it with `QaClientBuilder`. Requests are never retried.
#[derive(Debug, Clone)]
pub struct QaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl QaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Checks service health via `GET /health`.
    pub fn health(&self) -> Result<ServiceHealth, QaError> {
        let url = format!("{}/health", self.base_url);
        tracing::debug!(%url, "checking service health");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(QaError::from_transport)?;

        read_json(response)
    }

    /// Ingests one document via `POST /add`.
    pub fn add_document(&self, document: &NewDocument) -> Result<AddReceipt, QaError> {
        let url = format!("{}/add", self.base_url);
        tracing::debug!(%url, id = %document.id, "adding document");

        let response = self
            .client
            .post(&url)
            .json(document)
            .send()
            .map_err(QaError::from_transport)?;

        read_json(response)
    }
}

impl QaTransport for QaClient {
    fn query_url(&self, query: &str) -> String {
        format!("{}/qa?q={}", self.base_url, encode_query_component(query))
    }

    fn fetch_answer(&self, query: &str) -> Result<RawResponse, QaError> {
        let url = self.query_url(query);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(QaError::from_transport)?;

        let status = response.status();
        // Body is read as text so non-JSON error bodies stay inspectable
        let body = response.text().map_err(QaError::from_transport)?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Reads a JSON body, mapping non-2xx statuses to `QaError::Http`.
fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, QaError> {
    let status = response.status();
    let body = response.text().map_err(QaError::from_transport)?;

    if !status.is_success() {
        return Err(QaError::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(QaError::Serialization)
}
