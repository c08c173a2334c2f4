use rag_query::errors::QueryError;
use std::error::Error;

#[test]
fn test_query_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync>(_: &T) {}

    let error = QueryError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_query_error_display() {
    let error = QueryError::MissingField("user_query".to_string());
    assert_eq!(format!("{error}"), "Missing required field: user_query");

    let error = QueryError::KnowledgeBaseError("throttled".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to query knowledge base: throttled"
    );

    let error = QueryError::SigningError("no credentials".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to sign object URL: no credentials"
    );
}

#[test]
fn test_status_codes_split_client_and_server_errors() {
    assert_eq!(QueryError::ParseError(String::new()).status_code(), 400);
    assert_eq!(QueryError::MissingField(String::new()).status_code(), 400);
    assert_eq!(QueryError::KnowledgeBaseError(String::new()).status_code(), 500);
    assert_eq!(QueryError::SigningError(String::new()).status_code(), 500);
    assert_eq!(QueryError::ConfigError(String::new()).status_code(), 500);
}

#[test]
fn test_query_error_from_conversions() {
    let err = anyhow::anyhow!("upstream exploded");
    match QueryError::from(err) {
        QueryError::KnowledgeBaseError(msg) => assert!(msg.contains("upstream exploded")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    match QueryError::from(json_err) {
        QueryError::ParseError(msg) => assert!(msg.starts_with("Invalid JSON")),
        other => panic!("Unexpected error type: {other:?}"),
    }
}

#[test]
fn test_anyhow_context_chain_is_kept() {
    let err = anyhow::anyhow!("ThrottlingException").context("RetrieveAndGenerate request failed");
    match QueryError::from(err) {
        QueryError::KnowledgeBaseError(msg) => {
            assert_eq!(msg, "RetrieveAndGenerate request failed: ThrottlingException");
        }
        other => panic!("Unexpected error type: {other:?}"),
    }
}
