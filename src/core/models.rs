use serde::{Deserialize, Serialize};

/// Text returned to callers in place of a generated answer when a request fails.
pub const FALLBACK_RESPONSE: &str = "An error occurred while processing your request.";

/// Request body as sent by clients. Every field is optional here so that a
/// missing `user_query` can be reported separately from malformed JSON.
#[derive(Debug, Default, Deserialize)]
pub struct RawQueryRequest {
    pub user_query: Option<String>,
    #[serde(rename = "sessionId", alias = "session_id")]
    pub session_id: Option<String>,
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub user_query: String,
    pub session_id: Option<String>,
}

/// A cited source document, unique by `uri` within a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub uri: String,
    pub snippet: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presigned_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub generated_response: String,
    pub detailed_references: Vec<Reference>,
    #[serde(rename = "urlExpirationTime")]
    pub url_expiration_time: String,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub generated_response: String,
    pub detailed_references: Vec<Reference>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            error: error.into(),
            generated_response: FALLBACK_RESPONSE.to_string(),
            detailed_references: Vec::new(),
            session_id,
        }
    }
}
