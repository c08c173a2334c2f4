use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use rag_query::api::{self, QueryHandler};
use rag_query::core::config::AppConfig;
use rag_query::knowledge_base::BedrockKnowledgeBase;
use rag_query::storage::S3UrlSigner;
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    rag_query::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!(
        knowledge_base_id = %config.knowledge_base_id,
        number_of_results = config.number_of_results,
        url_expiration_secs = config.url_expiration_secs,
        "Configuration loaded"
    );

    let shared = aws_config::load_from_env().await;
    let query_handler = QueryHandler::new(
        config,
        Box::new(BedrockKnowledgeBase::from_conf(&shared)),
        Box::new(S3UrlSigner::from_conf(&shared)),
    );

    let query_handler = &query_handler;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        api::handler(query_handler, event).await
    }))
    .await
}
