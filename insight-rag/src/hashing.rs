//! Deterministic feature-hashing embedding provider.
//!
//! [`HashingEmbeddingProvider`] maps each lowercase alphanumeric token of the
//! input to a signed bucket of a fixed-size vector and L2-normalizes the
//! result. Texts that share vocabulary score high under cosine similarity.
//! It needs no model download or network access, which makes it the default
//! backend for offline use and tests.

use async_trait::async_trait;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Model name recorded in stores built by this provider.
pub const DEFAULT_MODEL: &str = "feature-hashing-v1";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// An [`EmbeddingProvider`] that hashes tokens into a fixed number of buckets.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
    model: String,
}

impl HashingEmbeddingProvider {
    /// Create a provider producing vectors of length `dimensions`.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, model: DEFAULT_MODEL.to_string() }
    }

    /// Override the model name recorded in built stores.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        if self.dimensions == 0 {
            return vector;
        }

        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.encode(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(provider = "hashing", batch_size = texts.len(), "embedding batch");
        Ok(texts.iter().map(|text| self.encode(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_same_vector() {
        let provider = HashingEmbeddingProvider::new(64);
        let a = provider.embed("Government safety regulation").await.unwrap();
        let b = provider.embed("government SAFETY regulation").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let provider = HashingEmbeddingProvider::new(32);
        let v = provider.embed("jobs skills automation").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn text_without_tokens_is_the_zero_vector() {
        let provider = HashingEmbeddingProvider::new(16);
        let v = provider.embed("  ?! ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn batch_matches_single_embeddings_in_order() {
        let provider = HashingEmbeddingProvider::new(48);
        let batch = provider.embed_batch(&["market revenue", "nhs policy"]).await.unwrap();
        assert_eq!(batch[0], provider.embed("market revenue").await.unwrap());
        assert_eq!(batch[1], provider.embed("nhs policy").await.unwrap());
    }
}
