//! Request/response interceptors

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    error::ApiError,
    transport::{ApiRequest, RawResponse},
};

/// Hook invoked around every dispatched request
///
/// Hooks observe only; they return nothing and cannot change the outcome.
pub trait Interceptor: Send + Sync {
    /// Called before the request is handed to the transport
    fn on_request(&self, _request: &ApiRequest) {}

    /// Called for every response received, whatever its status
    fn on_response(&self, _response: &RawResponse) {}

    /// Called once a failure has been normalized
    fn on_error(&self, _error: &ApiError) {}
}

impl<T: Interceptor + ?Sized> Interceptor for Arc<T> {
    fn on_request(&self, request: &ApiRequest) {
        (**self).on_request(request);
    }

    fn on_response(&self, response: &RawResponse) {
        (**self).on_response(response);
    }

    fn on_error(&self, error: &ApiError) {
        (**self).on_error(error);
    }
}

/// Logs every request, response and failure through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn on_request(&self, request: &ApiRequest) {
        debug!("Sending request: {} {}", request.method, request.path);
    }

    fn on_response(&self, response: &RawResponse) {
        debug!("Received response: {} {}", response.status.as_u16(), response.body);
    }

    fn on_error(&self, error: &ApiError) {
        match error {
            ApiError::Network {
                cause,
                timed_out: true,
                ..
            } => warn!("Request timed out, no response: {cause}"),
            ApiError::Network { cause, .. } => warn!("Request failed, no response: {cause}"),
            other => warn!("Request failed: {other}"),
        }
    }
}

/// Runs interceptors in insertion order
#[derive(Default)]
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Chain with only the logging interceptor installed
    pub fn with_logging() -> Self {
        let mut chain = Self::default();
        chain.push(LoggingInterceptor);
        chain
    }

    /// Append an interceptor
    pub fn push(&mut self, interceptor: impl Interceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn request(&self, request: &ApiRequest) {
        for interceptor in &self.interceptors {
            interceptor.on_request(request);
        }
    }

    pub fn response(&self, response: &RawResponse) {
        for interceptor in &self.interceptors {
            interceptor.on_response(response);
        }
    }

    pub fn error(&self, error: &ApiError) {
        for interceptor in &self.interceptors {
            interceptor.on_error(error);
        }
    }
}
