use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub question: String,
    /// Serialized as `null` until the backend has issued an identity.
    pub session_id: Option<String>,
}

/// Successful `POST /chat` reply. Only `answer` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub memory_content: Option<String>,
    #[serde(default)]
    pub memory_buffer_length: Option<u64>,
}
