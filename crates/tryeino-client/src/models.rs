//! Wire types for the document and chat endpoints

use serde::{Deserialize, Serialize};

/// Endpoint accepting new documents
pub const DOCUMENTS_PATH: &str = "/documents";

/// Endpoint answering questions
pub const CHAT_PATH: &str = "/chat";

/// Question sent by [`crate::RequestClient::check_connection`]
pub const PROBE_QUESTION: &str = "test";

/// Body of a document upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDocumentRequest {
    pub title: String,
    pub content: String,
}

/// Body of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

/// Server reply to a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUploaded {
    pub message: String,
    /// Number of chunks the document was split into
    pub chunks: usize,
    pub title: String,
}

/// Server reply to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub question: String,
    pub answer: String,
}
