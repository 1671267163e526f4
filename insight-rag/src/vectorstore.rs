//! The vector store and the similarity-index trait that ranks against it.

use async_trait::async_trait;

use crate::document::{Candidate, RecordId};
use crate::error::{RagError, Result};

/// An index that ranks stored entries by similarity to a query vector.
///
/// [`VectorStore`] implements this with exact brute-force cosine similarity.
/// The query engine only depends on this trait, so a different index can be
/// substituted as long as it honors the same ordering contract.
///
/// # Example
///
/// ```rust,ignore
/// use insight_rag::{SimilarityIndex, VectorStore};
///
/// let ranked = store.rank(&query_embedding, 20).await?;
/// assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
/// ```
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Rank stored entries against `query`, returning at most `limit` candidates.
    ///
    /// Results are ordered by descending score; entries with equal scores
    /// keep their store order.
    async fn rank(&self, query: &[f32], limit: usize) -> Result<Vec<Candidate>>;

    /// Number of entries in the index.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identifiers and their embeddings, kept as two aligned sequences.
///
/// `ids()[i]` and `vectors()[i]` always describe the same record, and every
/// vector has exactly [`dimensions()`](VectorStore::dimensions) components.
/// The store also remembers which model produced the vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    model: String,
    dimensions: usize,
    ids: Vec<RecordId>,
    vectors: Vec<Vec<f32>>,
}

impl VectorStore {
    /// Create an empty store for vectors of the given model and length.
    pub fn new(model: impl Into<String>, dimensions: usize) -> Self {
        Self { model: model.into(), dimensions, ids: Vec::new(), vectors: Vec::new() }
    }

    /// Assemble a store from parallel sequences, checking their alignment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::AlignmentError`] if the sequences differ in length
    /// and [`RagError::DimensionMismatch`] if any vector has the wrong length.
    pub fn from_parts(
        model: impl Into<String>,
        dimensions: usize,
        ids: Vec<RecordId>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if ids.len() != vectors.len() {
            return Err(RagError::AlignmentError { ids: ids.len(), vectors: vectors.len() });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(RagError::DimensionMismatch { expected: dimensions, actual: bad.len() });
        }
        Ok(Self { model: model.into(), dimensions, ids, vectors })
    }

    /// Append one entry.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `vector` has the wrong length.
    pub fn push(&mut self, id: RecordId, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        self.ids.push(id);
        self.vectors.push(vector);
        Ok(())
    }

    /// Name of the model that produced the vectors.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Length of every vector in the store.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Stored identifiers, in store order.
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Stored vectors, in store order.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Iterate over `(id, vector)` pairs in store order.
    pub fn entries(&self) -> impl Iterator<Item = (&RecordId, &[f32])> {
        self.ids.iter().zip(self.vectors.iter().map(Vec::as_slice))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
