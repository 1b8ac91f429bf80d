//! Semantic-similarity collaborator seam.
//!
//! Embedding-based similarity is the only genuine suspension point in the
//! pipeline, so it is modeled as an async call behind a bounded timeout.
//! On timeout or failure the pipeline continues on literal signals alone;
//! the degradation surfaces as reduced confidence, never as a failed run.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::core::input::tokenize;

/// Boxed similarity future, so implementations stay object-safe without
/// an async-trait dependency.
pub type SimilarityFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<f64>> + Send + 'a>>;

/// An embedding-similarity collaborator. Returns a score in [0, 1].
pub trait SemanticMatcher: Send + Sync {
    fn similarity<'a>(&'a self, resume: &'a str, job_description: &'a str)
        -> SimilarityFuture<'a>;
}

/// Call the matcher under a bounded timeout.
///
/// `None` means the semantic signal is unavailable (timeout, error, or
/// a non-finite result); callers fall back to literal matching.
pub async fn similarity_with_timeout(
    matcher: &dyn SemanticMatcher,
    resume: &str,
    job_description: &str,
    timeout_ms: u64,
) -> Option<f64> {
    let call = matcher.similarity(resume, job_description);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(Ok(similarity)) if similarity.is_finite() => Some(similarity.clamp(0.0, 1.0)),
        Ok(Ok(similarity)) => {
            log::warn!("semantic matcher returned non-finite {}; ignoring", similarity);
            None
        }
        Ok(Err(error)) => {
            log::warn!("semantic matcher failed: {:#}; falling back to literal", error);
            None
        }
        Err(_) => {
            log::warn!(
                "semantic matcher timed out after {}ms; falling back to literal",
                timeout_ms
            );
            None
        }
    }
}

/// Offline fallback matcher: token-set Jaccard overlap stands in for an
/// embedding similarity. Deterministic and instant.
pub struct LiteralOnlyMatcher;

impl SemanticMatcher for LiteralOnlyMatcher {
    fn similarity<'a>(
        &'a self,
        resume: &'a str,
        job_description: &'a str,
    ) -> SimilarityFuture<'a> {
        let score = jaccard_similarity(resume, job_description);
        Box::pin(std::future::ready(Ok(score)))
    }
}

fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: std::collections::HashSet<String> = tokenize(a).into_iter().collect();
    let set_b: std::collections::HashSet<String> = tokenize(b).into_iter().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count() as f64;
    let union = set_a.union(&set_b).count() as f64;
    intersection / union
}
