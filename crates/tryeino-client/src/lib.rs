//! HTTP client for the tryEino question-answering API
//!
//! Wraps a configured transport, logs every call, and normalizes failures
//! into [`ApiError`].
//!
//! ## Features
//!
//! - **Trait-based transport**: swap in a fake via [`Transport`]
//! - **Configurable**: base URL, timeout, default headers
//! - **Interceptors**: logging hooks around every request
//! - **Uniform errors**: server, network and transport failures in one enum
//!
//! ```rust,no_run
//! use tryeino_client::{ClientConfig, RequestClient};
//!
//! async fn ask() -> tryeino_client::Result<serde_json::Value> {
//!     let config = ClientConfig::new().with_base_url("http://localhost:8080/api");
//!     let client = RequestClient::new(config)?;
//!     client.ask_question("What is Milvus?").await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod transport;

pub use client::RequestClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result, TransportError};
pub use middleware::{Interceptor, InterceptorChain, LoggingInterceptor};
pub use models::{ChatAnswer, DocumentUploaded};
pub use transport::{
    shared_transport, ApiRequest, HttpTransport, RawResponse, Transport, TransportFailure,
};

/// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
