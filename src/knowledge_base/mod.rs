//! Retrieve-and-generate against a managed knowledge base
//!
//! The handler talks to the knowledge base through the [`KnowledgeBase`] trait.
//! Citation data is mapped into the provider-neutral types below before any
//! ranking happens, so reference handling does not depend on the AWS SDK.

pub mod bedrock;
pub mod references;

use async_trait::async_trait;

use crate::errors::QueryError;

pub use bedrock::BedrockKnowledgeBase;
pub use references::extract_references;

/// Parameters of one retrieve-and-generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub query: String,
    pub session_id: Option<String>,
    pub knowledge_base_id: String,
    pub model_arn: String,
    pub number_of_results: i32,
}

/// A passage the model cited while generating the answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedPassage {
    /// `s3://` location of the backing object, if the source lives in S3.
    pub s3_uri: Option<String>,
    pub text: Option<String>,
    pub score: Option<f64>,
}

/// One citation: a span of generated text and the passages backing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Citation {
    pub retrieved_references: Vec<RetrievedPassage>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    pub citations: Vec<Citation>,
    /// Session id issued (or continued) by the service.
    pub session_id: Option<String>,
}

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn retrieve_and_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, QueryError>;
}
