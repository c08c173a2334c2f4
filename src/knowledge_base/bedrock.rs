//! Bedrock Agent Runtime implementation of [`KnowledgeBase`]

use async_trait::async_trait;
use anyhow::Context;
use aws_sdk_bedrockagentruntime::Client as BedrockClient;
use aws_sdk_bedrockagentruntime::types::{
    Citation as SdkCitation, KnowledgeBaseRetrievalConfiguration,
    KnowledgeBaseRetrieveAndGenerateConfiguration, KnowledgeBaseVectorSearchConfiguration,
    RetrieveAndGenerateConfiguration, RetrieveAndGenerateInput, RetrieveAndGenerateType,
    RetrievedReference,
};
use aws_smithy_types::Document;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{Citation, GenerationRequest, GenerationResult, KnowledgeBase, RetrievedPassage};
use crate::errors::QueryError;

/// Metadata key carrying a passage's relevance score, when the service reports one.
const SCORE_METADATA_KEY: &str = "score";

pub struct BedrockKnowledgeBase {
    client: BedrockClient,
}

impl BedrockKnowledgeBase {
    #[must_use]
    pub fn new(client: BedrockClient) -> Self {
        Self { client }
    }

    /// Builds a client from a loaded shared AWS configuration.
    #[must_use]
    pub fn from_conf(shared: &aws_config::SdkConfig) -> Self {
        Self::new(BedrockClient::new(shared))
    }
}

#[async_trait]
impl KnowledgeBase for BedrockKnowledgeBase {
    async fn retrieve_and_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, QueryError> {
        let input = RetrieveAndGenerateInput::builder()
            .text(&request.query)
            .build()
            .map_err(|e| QueryError::KnowledgeBaseError(format!("input: {e}")))?;

        let configuration = build_configuration(request)?;

        debug!(
            knowledge_base_id = %request.knowledge_base_id,
            number_of_results = request.number_of_results,
            has_session = request.session_id.is_some(),
            "Calling RetrieveAndGenerate"
        );

        let output = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(configuration)
            .set_session_id(request.session_id.clone())
            .send()
            .await
            .context("RetrieveAndGenerate request failed")?;

        let text = output
            .output()
            .map(|o| o.text().to_string())
            .unwrap_or_default();
        let citations: Vec<Citation> = output.citations().iter().map(map_citation).collect();

        info!(
            citations = citations.len(),
            session_id = %output.session_id(),
            "RetrieveAndGenerate completed"
        );

        Ok(GenerationResult {
            text,
            citations,
            session_id: Some(output.session_id().to_string()),
        })
    }
}

fn build_configuration(
    request: &GenerationRequest,
) -> Result<RetrieveAndGenerateConfiguration, QueryError> {
    let retrieval = KnowledgeBaseRetrievalConfiguration::builder()
        .vector_search_configuration(
            KnowledgeBaseVectorSearchConfiguration::builder()
                .number_of_results(request.number_of_results)
                .build(),
        )
        .build();

    let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
        .knowledge_base_id(&request.knowledge_base_id)
        .model_arn(&request.model_arn)
        .retrieval_configuration(retrieval)
        .build()
        .map_err(|e| {
            QueryError::KnowledgeBaseError(format!("knowledge base configuration: {e}"))
        })?;

    RetrieveAndGenerateConfiguration::builder()
        .r#type(RetrieveAndGenerateType::KnowledgeBase)
        .knowledge_base_configuration(knowledge_base)
        .build()
        .map_err(|e| QueryError::KnowledgeBaseError(format!("configuration: {e}")))
}

fn map_citation(citation: &SdkCitation) -> Citation {
    Citation {
        retrieved_references: citation
            .retrieved_references()
            .iter()
            .map(map_reference)
            .collect(),
    }
}

fn map_reference(reference: &RetrievedReference) -> RetrievedPassage {
    RetrievedPassage {
        s3_uri: reference
            .location()
            .and_then(|l| l.s3_location())
            .and_then(|s3| s3.uri())
            .map(ToString::to_string),
        text: reference
            .content()
            .map(|c| c.text().to_string()),
        score: reference.metadata().and_then(score_from_metadata),
    }
}

fn score_from_metadata(metadata: &HashMap<String, Document>) -> Option<f64> {
    let score: f64 = match metadata.get(SCORE_METADATA_KEY)? {
        Document::Number(n) => n.to_f64_lossy(),
        Document::String(s) => s.parse().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockagentruntime::types::{
        RetrievalResultContent, RetrievalResultLocation, RetrievalResultLocationType,
        RetrievalResultS3Location,
    };
    use aws_smithy_types::Number;

    fn request() -> GenerationRequest {
        GenerationRequest {
            query: "What is the refund policy?".to_string(),
            session_id: None,
            knowledge_base_id: "KB123".to_string(),
            model_arn: "arn:aws:bedrock:us-east-1::foundation-model/anthropic.claude-v2"
                .to_string(),
            number_of_results: 10,
        }
    }

    #[test]
    fn configuration_targets_knowledge_base_and_model() {
        let cfg = build_configuration(&request()).unwrap();
        assert_eq!(cfg.r#type(), &RetrieveAndGenerateType::KnowledgeBase);

        let kb = cfg.knowledge_base_configuration().unwrap();
        assert_eq!(kb.knowledge_base_id(), "KB123");
        assert!(kb.model_arn().starts_with("arn:aws:bedrock"));
        assert!(kb.retrieval_configuration().is_some());
    }

    #[test]
    fn score_is_read_from_numeric_or_string_metadata() {
        let mut metadata = HashMap::new();
        metadata.insert(
            SCORE_METADATA_KEY.to_string(),
            Document::Number(Number::Float(0.75)),
        );
        assert_eq!(score_from_metadata(&metadata), Some(0.75));

        metadata.insert(
            SCORE_METADATA_KEY.to_string(),
            Document::String("0.5".to_string()),
        );
        assert_eq!(score_from_metadata(&metadata), Some(0.5));

        metadata.insert(SCORE_METADATA_KEY.to_string(), Document::Bool(true));
        assert_eq!(score_from_metadata(&metadata), None);

        assert_eq!(score_from_metadata(&HashMap::new()), None);
    }

    #[test]
    fn non_finite_scores_are_ignored() {
        let mut metadata = HashMap::new();
        for raw in ["NaN", "inf", "-infinity"] {
            metadata.insert(
                SCORE_METADATA_KEY.to_string(),
                Document::String(raw.to_string()),
            );
            assert_eq!(score_from_metadata(&metadata), None, "{raw}");
        }

        metadata.insert(
            SCORE_METADATA_KEY.to_string(),
            Document::Number(Number::Float(f64::NAN)),
        );
        assert_eq!(score_from_metadata(&metadata), None);
    }

    #[test]
    fn sdk_citation_maps_to_passages() {
        let s3_reference = RetrievedReference::builder()
            .content(
                RetrievalResultContent::builder()
                    .text("  Refunds are issued within 30 days. ")
                    .build(),
            )
            .location(
                RetrievalResultLocation::builder()
                    .r#type(RetrievalResultLocationType::S3)
                    .s3_location(
                        RetrievalResultS3Location::builder()
                            .uri("s3://kb-docs/policies/refunds.pdf")
                            .build(),
                    )
                    .build()
                    .unwrap(),
            )
            .metadata(SCORE_METADATA_KEY, Document::Number(Number::Float(0.82)))
            .build();
        let bare_reference = RetrievedReference::builder().build();

        let citation = SdkCitation::builder()
            .retrieved_references(s3_reference)
            .retrieved_references(bare_reference)
            .build();

        let mapped = map_citation(&citation);
        assert_eq!(mapped.retrieved_references.len(), 2);

        let passage = &mapped.retrieved_references[0];
        assert_eq!(
            passage.s3_uri.as_deref(),
            Some("s3://kb-docs/policies/refunds.pdf")
        );
        assert_eq!(
            passage.text.as_deref(),
            Some("  Refunds are issued within 30 days. ")
        );
        assert_eq!(passage.score, Some(0.82));

        assert_eq!(mapped.retrieved_references[1], RetrievedPassage::default());
    }
}
