/// rag-query - A Lambda backend that answers questions from a Bedrock knowledge base.
///
/// The API Lambda receives a query over API Gateway (or a direct invocation),
/// runs Bedrock `RetrieveAndGenerate` against the configured knowledge base,
/// ranks the cited source documents, and returns them with presigned S3
/// download links.
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - Bedrock Agent Runtime for retrieval-augmented generation
/// - S3 presigned URLs for time-limited access to cited documents
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use rag_query::api::QueryHandler;
/// use rag_query::core::config::AppConfig;
/// use rag_query::knowledge_base::BedrockKnowledgeBase;
/// use rag_query::storage::S3UrlSigner;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     rag_query::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let shared = aws_config::load_from_env().await;
///     let handler = QueryHandler::new(
///         config,
///         Box::new(BedrockKnowledgeBase::from_conf(&shared)),
///         Box::new(S3UrlSigner::from_conf(&shared)),
///     );
///
///     let payload = serde_json::json!({ "user_query": "What is the refund policy?" });
///     let response = rag_query::api::handler::process_event(&handler, &payload).await;
///     println!("{response}");
///     Ok(())
/// }
/// ```
pub mod api;
pub mod core;
pub mod errors;
pub mod knowledge_base;
pub mod storage;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs. The level is taken from `RUST_LOG` and
/// defaults to `info`. Call once at cold start.
///
/// # Example
///
/// ```
/// rag_query::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
