//! Exact cosine-similarity ranking over a [`VectorStore`].

use async_trait::async_trait;
use tracing::{debug, error};

use crate::document::Candidate;
use crate::error::{RagError, Result};
use crate::vectorstore::{SimilarityIndex, VectorStore};

/// Compute cosine similarity between two vectors of equal length.
///
/// Returns `None` if either vector has zero magnitude, since the angle is
/// undefined in that case.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

/// Score every entry of `store` against `query` and sort best first.
///
/// The sort is stable, so entries with equal scores stay in store order.
///
/// # Errors
///
/// - [`RagError::DimensionMismatch`] if `query` has the wrong length.
/// - [`RagError::DegenerateQuery`] if `query` has zero magnitude.
/// - [`RagError::DegenerateVector`] for the first stored entry with zero magnitude.
pub fn rank_exact(store: &VectorStore, query: &[f32]) -> Result<Vec<Candidate>> {
    if query.len() != store.dimensions() {
        return Err(RagError::DimensionMismatch {
            expected: store.dimensions(),
            actual: query.len(),
        });
    }
    if query.iter().all(|x| *x == 0.0) {
        return Err(RagError::DegenerateQuery);
    }

    let mut scored = Vec::with_capacity(store.len());
    for (position, (id, vector)) in store.entries().enumerate() {
        let score = cosine_similarity(query, vector).ok_or_else(|| {
            error!(id = %id, position, "zero-norm vector in store");
            RagError::DegenerateVector { id: id.clone(), position }
        })?;
        scored.push(Candidate { id: id.clone(), score, position });
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(scored)
}

#[async_trait]
impl SimilarityIndex for VectorStore {
    async fn rank(&self, query: &[f32], limit: usize) -> Result<Vec<Candidate>> {
        let mut ranked = rank_exact(self, query)?;
        ranked.truncate(limit);
        debug!(store_size = self.len(), returned = ranked.len(), "ranked store");
        Ok(ranked)
    }

    fn len(&self) -> usize {
        VectorStore::len(self)
    }
}
