use std::collections::HashSet;

use super::Citation;
use crate::core::models::Reference;

/// Collects one reference per unique S3 location across all citations.
///
/// The first occurrence of a location wins; later duplicates are dropped along
/// with their snippet and score. Passages without an S3 location are skipped.
/// The result is ordered by score, highest first, and equal scores keep the
/// order in which they were first seen. Non-finite scores count as `0`.
#[must_use]
pub fn extract_references(citations: &[Citation]) -> Vec<Reference> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut references: Vec<Reference> = Vec::new();

    for passage in citations.iter().flat_map(|c| c.retrieved_references.iter()) {
        let Some(uri) = passage.s3_uri.as_deref() else {
            continue;
        };
        if !seen.insert(uri) {
            continue;
        }

        references.push(Reference {
            uri: uri.to_string(),
            snippet: passage.text.as_deref().unwrap_or("").trim().to_string(),
            score: passage.score.filter(|s| s.is_finite()).unwrap_or(0.0),
            presigned_url: None,
        });
    }

    // sort_by is stable
    references.sort_by(|a, b| b.score.total_cmp(&a.score));
    references
}
