//! HTTP transport implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use serde_json::Value;
use tracing::debug;

use crate::{config::ClientConfig, error::TransportError};

/// Outgoing request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path relative to the base URL
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// POST with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Response as received, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Parsed body: `null` when empty, a JSON string when not JSON
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

/// Why a transport produced no response
#[derive(Debug)]
pub enum TransportFailure {
    /// Request left the process but nothing came back
    NoResponse { cause: String, timed_out: bool },
    /// Request was never sent
    NotSent(TransportError),
}

/// Mockable transport trait
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and hand back the response, 2xx or not
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a new transport with configuration
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let headers = default_headers(&config)?;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create a transport with default configuration
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(ClientConfig::default())
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
        let url = self
            .config
            .endpoint(&request.path)
            .parse::<url::Url>()
            .map_err(|e| TransportFailure::NotSent(TransportError::InvalidUrl(e.to_string())))?;

        debug!("HTTP {}: {}", request.method, url);

        let mut builder = self.inner.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(classify)?;

        Ok(RawResponse::new(status, parse_body(&bytes)))
    }
}

/// Create a shared transport (Arc-wrapped for cloning)
pub fn shared_transport(config: ClientConfig) -> Result<Arc<dyn Transport>, TransportError> {
    Ok(Arc::new(HttpTransport::new(config)?))
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    for (name, value) in &config.headers {
        let invalid = |reason: String| TransportError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Builder errors never left the process; everything else did
fn classify(err: reqwest::Error) -> TransportFailure {
    if err.is_builder() {
        TransportFailure::NotSent(TransportError::Request(err))
    } else {
        TransportFailure::NoResponse {
            timed_out: err.is_timeout(),
            cause: err.to_string(),
        }
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
