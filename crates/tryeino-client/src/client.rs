//! Request client: dispatch, normalization and the API operations

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::{ApiError, Result, TransportError},
    middleware::{Interceptor, InterceptorChain},
    models::{
        AskQuestionRequest, UploadDocumentRequest, CHAT_PATH, DOCUMENTS_PATH, PROBE_QUESTION,
    },
    transport::{ApiRequest, HttpTransport, Transport, TransportFailure},
};

/// Fallback message for a failed upload
pub const UPLOAD_FAILED: &str = "document upload failed";

/// Fallback message for a failed question
pub const QUESTION_FAILED: &str = "question request failed";

/// Client for the document question-answering API
///
/// Holds one transport for its whole lifetime. Share it by reference or wrap
/// it in an `Arc`; concurrent calls are independent.
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    interceptors: InterceptorChain,
}

impl RequestClient {
    /// Create a client over the HTTP transport
    ///
    /// No network activity happens here.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client over any transport, with request logging installed
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            interceptors: InterceptorChain::with_logging(),
        }
    }

    /// Append an interceptor after the ones already installed
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Send a request and normalize any failure
    ///
    /// Returns the parsed body of a 2xx response.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<Value> {
        self.interceptors.request(&request);

        let outcome = match self.transport.send(request).await {
            Ok(response) => {
                self.interceptors.response(&response);
                if response.status.is_success() {
                    Ok(response.body)
                } else {
                    Err(ApiError::server(response.status, response.body))
                }
            }
            Err(TransportFailure::NoResponse { cause, timed_out }) => {
                Err(ApiError::network(cause, timed_out))
            }
            Err(TransportFailure::NotSent(err)) => Err(ApiError::Transport(err)),
        };

        if let Err(err) = &outcome {
            self.interceptors.error(err);
        }

        outcome
    }

    /// POST a JSON body and decode the 2xx reply
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(TransportError::Encode)?;
        let reply = self.dispatch(ApiRequest::post(path, body)).await?;

        serde_json::from_value(reply).map_err(|e| TransportError::Decode(e).into())
    }

    /// Upload a document for indexing
    ///
    /// Title and content are not validated locally. The reply body is returned
    /// as parsed; decode it into [`crate::DocumentUploaded`] if that shape is
    /// expected.
    pub async fn upload_document(&self, title: &str, content: &str) -> Result<Value> {
        let request = UploadDocumentRequest {
            title: title.to_string(),
            content: content.to_string(),
        };

        self.post_json(DOCUMENTS_PATH, &request)
            .await
            .map_err(|e| e.or_fallback(UPLOAD_FAILED))
    }

    /// Ask a question against the uploaded documents
    ///
    /// Returns the parsed reply body, usually a [`crate::ChatAnswer`].
    pub async fn ask_question(&self, question: &str) -> Result<Value> {
        let request = AskQuestionRequest {
            question: question.to_string(),
        };

        self.post_json(CHAT_PATH, &request)
            .await
            .map_err(|e| e.or_fallback(QUESTION_FAILED))
    }

    /// Probe the chat endpoint
    ///
    /// Any 2xx counts as connected, whatever the body says. Failures are
    /// reported as `false` and never returned.
    pub async fn check_connection(&self) -> bool {
        let probe = ApiRequest::post(CHAT_PATH, json!({ "question": PROBE_QUESTION }));

        match self.dispatch(probe).await {
            Ok(_) => true,
            Err(err) => {
                debug!("Connection probe failed: {err}");
                false
            }
        }
    }
}
