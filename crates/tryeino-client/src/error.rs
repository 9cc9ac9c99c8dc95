//! Client error types
//!
//! Every failure a caller sees is an [`ApiError`]. Failures that happen before
//! a request leaves the process keep their original [`TransportError`].

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Message used when a request was sent but no response arrived
pub const NETWORK_ERROR_MESSAGE: &str = "network connection failed, check network or server status";

/// Normalized client error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("{message}")]
    Server {
        status: StatusCode,
        message: String,
        /// Raw response body
        data: Value,
    },

    /// Request was sent but no response arrived
    #[error("{message}")]
    Network {
        message: String,
        cause: String,
        /// Gave up waiting rather than failing to connect
        timed_out: bool,
    },

    /// Request could not be built or sent
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Operation-level message used when nothing richer is available
    #[error("{0}")]
    Domain(String),
}

/// Failures that prevent a request from being sent
#[derive(Debug, Error)]
pub enum TransportError {
    /// Endpoint URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Default header name or value is not valid HTTP
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body did not match the expected shape
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request could not be constructed by the HTTP stack
    #[error(transparent)]
    Request(reqwest::Error),

    /// Request refused by the transport without further detail
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Build a server error from a status and raw body
    pub fn server(status: StatusCode, data: Value) -> Self {
        ApiError::Server {
            message: status_message(status, &data),
            status,
            data,
        }
    }

    /// Build a network error from the underlying cause
    pub fn network(cause: impl Into<String>, timed_out: bool) -> Self {
        ApiError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            cause: cause.into(),
            timed_out,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, if a response was received
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Server { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Whether the request was sent but never answered
    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Replace an empty message with `fallback`, keeping everything else
    pub fn or_fallback(self, fallback: &str) -> Self {
        if self.to_string().is_empty() {
            ApiError::Domain(fallback.to_string())
        } else {
            self
        }
    }
}

/// Pick the message for a non-2xx response
///
/// 400, 500 and unmapped statuses prefer the server's `error` text; 502, 503
/// and 504 always use a fixed message.
pub fn status_message(status: StatusCode, data: &Value) -> String {
    let server_text = || {
        data.get("error")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    };

    match status {
        StatusCode::BAD_REQUEST => {
            server_text().unwrap_or_else(|| "invalid request parameters".to_string())
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            server_text().unwrap_or_else(|| "internal server error".to_string())
        }
        StatusCode::BAD_GATEWAY => "gateway error".to_string(),
        StatusCode::SERVICE_UNAVAILABLE => "service unavailable".to_string(),
        StatusCode::GATEWAY_TIMEOUT => "request timed out".to_string(),
        other => server_text()
            .unwrap_or_else(|| format!("request failed (status {})", other.as_u16())),
    }
}
