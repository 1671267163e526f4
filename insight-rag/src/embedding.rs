//! Embedding provider trait for generating vector embeddings from text.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::Result;
use crate::hashing::HashingEmbeddingProvider;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific encoder model behind a unified async
/// interface. A provider is constructed once per process and shared behind an
/// `Arc`; model loading never happens per query. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) implementation calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends that support
/// native batching should override it.
///
/// Implementations must return vectors in input order, each of length
/// [`dimensions`](EmbeddingProvider::dimensions), and must be deterministic
/// for a given model version.
///
/// # Example
///
/// ```rust,ignore
/// use insight_rag::{EmbeddingProvider, HashingEmbeddingProvider};
///
/// let provider = HashingEmbeddingProvider::new(384);
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding for better throughput.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Return the name of the model, recorded in every store this provider builds.
    fn model_name(&self) -> &str;
}

/// Construct the provider selected by `config`.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`](crate::RagError::ConfigError) if the
/// backend is not compiled in, or an
/// [`EmbeddingError`](crate::RagError::EmbeddingError) if the backend cannot
/// be initialized.
pub fn provider_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.backend {
        EmbeddingBackend::Hashing => Ok(Arc::new(
            HashingEmbeddingProvider::new(config.dimensions).with_model(&config.model),
        )),
        #[cfg(feature = "openai")]
        EmbeddingBackend::OpenAi => {
            let provider =
                crate::openai::OpenAIEmbeddingProvider::from_env_var(&config.api_key_env)?
                    .with_model(&config.model);
            let provider = if config.request_dimensions {
                provider.with_dimensions(config.dimensions)
            } else {
                provider.with_expected_dimensions(config.dimensions)
            };
            let provider = match &config.base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            };
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "openai"))]
        EmbeddingBackend::OpenAi => Err(crate::error::RagError::ConfigError(
            "embedding.backend = \"openai\" requires the `openai` feature".to_string(),
        )),
    }
}
