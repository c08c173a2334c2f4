//! Answering a validated query: generation, reference ranking and link signing.

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::config::AppConfig;
use crate::core::models::{QueryRequest, QueryResponse, Reference};
use crate::errors::QueryError;
use crate::knowledge_base::{GenerationRequest, KnowledgeBase, extract_references};
use crate::storage::UrlSigner;

/// Holds the collaborators needed to answer queries. Built once per cold start.
pub struct QueryHandler {
    config: AppConfig,
    knowledge_base: Box<dyn KnowledgeBase>,
    signer: Box<dyn UrlSigner>,
}

impl QueryHandler {
    #[must_use]
    pub fn new(
        config: AppConfig,
        knowledge_base: Box<dyn KnowledgeBase>,
        signer: Box<dyn UrlSigner>,
    ) -> Self {
        Self {
            config,
            knowledge_base,
            signer,
        }
    }

    /// # Errors
    ///
    /// Returns `QueryError::KnowledgeBaseError` if the retrieve-and-generate
    /// call fails. Signing failures only drop the affected reference.
    pub async fn answer(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let generation = GenerationRequest {
            query: request.user_query.clone(),
            session_id: request.session_id.clone(),
            knowledge_base_id: self.config.knowledge_base_id.clone(),
            model_arn: self.config.model_arn.clone(),
            number_of_results: self.config.number_of_results,
        };

        let result = self.knowledge_base.retrieve_and_generate(&generation).await?;

        let references = extract_references(&result.citations);
        info!(
            count = references.len(),
            uris = ?references.iter().map(|r| r.uri.as_str()).collect::<Vec<_>>(),
            "Extracted references"
        );

        let expires_in = Duration::from_secs(self.config.url_expiration_secs);
        let detailed_references = self.sign_references(references, expires_in).await;

        Ok(QueryResponse {
            query: request.user_query.clone(),
            generated_response: result.text,
            detailed_references,
            url_expiration_time: expiration_timestamp(expires_in)?,
            session_id: result.session_id.or_else(|| request.session_id.clone()),
        })
    }

    /// Attaches a presigned URL to each reference, dropping those that fail.
    /// Order is preserved.
    async fn sign_references(
        &self,
        references: Vec<Reference>,
        expires_in: Duration,
    ) -> Vec<Reference> {
        let total = references.len();
        let signed: Vec<Reference> = join_all(references.into_iter().map(|mut reference| {
            async move {
                match self.signer.presign(&reference.uri, expires_in).await {
                    Ok(url) => {
                        reference.presigned_url = Some(url);
                        Some(reference)
                    }
                    Err(e) => {
                        warn!(uri = %reference.uri, error = %e, "Dropping unsignable reference");
                        None
                    }
                }
            }
        }))
        .await
        .into_iter()
        .flatten()
        .collect();

        if signed.len() < total {
            warn!(
                signed = signed.len(),
                dropped = total - signed.len(),
                "Some references could not be signed"
            );
        }
        signed
    }
}

/// RFC 3339 UTC time at which links issued now stop working.
///
/// # Errors
///
/// Returns `QueryError::ConfigError` if `expires_in` does not fit a timestamp.
pub fn expiration_timestamp(expires_in: Duration) -> Result<String, QueryError> {
    let delta = chrono::Duration::from_std(expires_in)
        .map_err(|e| QueryError::ConfigError(format!("URL expiration out of range: {e}")))?;
    let expires_at = Utc::now()
        .checked_add_signed(delta)
        .ok_or_else(|| QueryError::ConfigError("URL expiration out of range".to_string()))?;
    Ok(expires_at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn expiration_is_one_hour_ahead() {
        let ts = expiration_timestamp(Duration::from_secs(3600)).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&ts).unwrap();
        let ahead = parsed.with_timezone(&Utc) - Utc::now();
        assert!(ahead.num_seconds() > 3590 && ahead.num_seconds() <= 3600);
        assert!(ts.ends_with('Z'));
    }
}
