//! Vector store construction: records → batch embedding → aligned store.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::document::Record;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::storage::save_store;
use crate::vectorstore::VectorStore;

/// Builds a [`VectorStore`] from corpus records.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use insight_rag::{HashingEmbeddingProvider, StoreBuilder};
///
/// let builder = StoreBuilder::new(Arc::new(HashingEmbeddingProvider::new(384)));
/// let store = builder.build_and_persist(&corpus.records, "semantic_vectors.json".as_ref()).await?;
/// ```
pub struct StoreBuilder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl StoreBuilder {
    /// Create a builder that encodes with `provider`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Encode `records` into a new store.
    ///
    /// Records with empty or whitespace-only text are skipped. All remaining
    /// texts are encoded with a single batch call, so `ids()[i]` and
    /// `vectors()[i]` of the result always come from the same record.
    /// Records whose text encodes to a zero vector are skipped with a warning.
    /// Duplicate identifiers are kept as separate entries.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if encoding fails,
    /// [`RagError::EmbeddingError`] if it returns the wrong number of vectors,
    /// and [`RagError::DimensionMismatch`] if a vector has the wrong length.
    pub async fn build(&self, records: &[Record]) -> Result<VectorStore> {
        let model = self.provider.model_name().to_string();
        let mut store = VectorStore::new(&model, self.provider.dimensions());

        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        let mut usable = Vec::with_capacity(records.len());
        for record in records {
            if record.text.trim().is_empty() {
                debug!(id = %record.id, "skipping record without text");
                continue;
            }
            if !seen.insert(&record.id) {
                warn!(id = %record.id, "duplicate record id; keeping both entries");
                duplicates += 1;
            }
            usable.push(record);
        }
        let skipped = records.len() - usable.len();

        if usable.is_empty() {
            info!(skipped, "built empty vector store");
            return Ok(store);
        }

        let texts: Vec<&str> = usable.iter().map(|r| r.text.as_str()).collect();
        info!(count = texts.len(), model = %model, "encoding records");
        let vectors = self.provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during store build");
        })?;

        if vectors.len() != usable.len() {
            error!(expected = usable.len(), actual = vectors.len(), "encoder returned wrong count");
            return Err(RagError::EmbeddingError {
                provider: model,
                message: format!("returned {} vectors for {} texts", vectors.len(), usable.len()),
            });
        }

        let mut degenerate = 0usize;
        for (record, vector) in usable.into_iter().zip(vectors) {
            if vector.iter().all(|x| *x == 0.0) {
                warn!(id = %record.id, "skipping record that encodes to a zero vector");
                degenerate += 1;
                continue;
            }
            store.push(record.id.clone(), vector)?;
        }
        let skipped = skipped + degenerate;

        info!(entries = store.len(), skipped, duplicates, "built vector store");
        Ok(store)
    }

    /// Build a store and persist it at `path`.
    ///
    /// Nothing is written unless the whole build succeeds, and the previous
    /// store at `path` is replaced atomically.
    pub async fn build_and_persist(&self, records: &[Record], path: &Path) -> Result<VectorStore> {
        let store = self.build(records).await?;
        save_store(&store, path).await?;
        Ok(store)
    }
}
