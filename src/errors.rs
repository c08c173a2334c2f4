use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to query knowledge base: {0}")]
    KnowledgeBaseError(String),

    #[error("Failed to sign object URL: {0}")]
    SigningError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl QueryError {
    /// HTTP status code reported to the caller for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::ParseError(_) | QueryError::MissingField(_) => 400,
            QueryError::KnowledgeBaseError(_)
            | QueryError::SigningError(_)
            | QueryError::ConfigError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(error: serde_json::Error) -> Self {
        QueryError::ParseError(format!("Invalid JSON: {error}"))
    }
}

impl From<base64::DecodeError> for QueryError {
    fn from(error: base64::DecodeError) -> Self {
        QueryError::ParseError(format!("Invalid base64 body: {error}"))
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(error: anyhow::Error) -> Self {
        // Alternate form keeps the whole context chain.
        QueryError::KnowledgeBaseError(format!("{error:#}"))
    }
}
