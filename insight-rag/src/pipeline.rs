//! Query engine orchestrator.
//!
//! The [`QueryEngine`] answers natural-language queries by composing an
//! [`EmbeddingProvider`], a [`SimilarityIndex`], a [`RecordResolver`], and a
//! [`CandidateFilter`]: encode → rank → filter → resolve.
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_rag::{Config, QueryEngine, provider_from_config};
//!
//! let config = Config::load("insight.toml".as_ref())?;
//! let provider = provider_from_config(&config.embedding)?;
//! let engine = QueryEngine::open(&config, provider).await?;
//!
//! let result = engine.query("What are the risks to patient safety?", None).await?;
//! for hit in &result.hits {
//!     println!("[{}] {:.4} {}", hit.record.zone, hit.score, hit.record.text);
//! }
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{Config, QueryConfig};
use crate::corpus::load_corpus;
use crate::document::{QueryResult, QueryStatus};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::filter::CandidateFilter;
use crate::resolver::{RecordCatalog, RecordResolver};
use crate::storage::load_store;
use crate::vectorstore::{SimilarityIndex, VectorStore};

/// The query engine.
///
/// Holds no mutable state, so one engine can serve concurrent queries.
/// Construct one with [`QueryEngine::open()`] or [`QueryEngine::builder()`].
pub struct QueryEngine {
    config: QueryConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    resolver: Arc<dyn RecordResolver>,
    filter: CandidateFilter,
}

impl QueryEngine {
    /// Create a new [`QueryEngineBuilder`].
    pub fn builder() -> QueryEngineBuilder {
        QueryEngineBuilder::default()
    }

    /// Open the persisted store and corpus named by `config`.
    ///
    /// The store must have been built by the same model as `provider`, and
    /// the corpus is loaded once into an in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreNotFound`] if no store has been built yet,
    /// [`RagError::ModelMismatch`] if the store was built by a different
    /// model, or the corpus loader's error.
    pub async fn open(config: &Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;

        let store = load_store(&config.store.path).await?;
        check_compatible(&store, provider.as_ref())?;

        let corpus = load_corpus(&config.corpus.dir)?;
        let catalog = RecordCatalog::new(corpus.records);

        info!(
            store = %config.store.path.display(),
            entries = store.len(),
            records = catalog.len(),
            model = store.model(),
            "opened query engine"
        );

        Self::builder()
            .config(config.query.clone())
            .embedding_provider(provider)
            .index(Arc::new(store))
            .resolver(Arc::new(catalog))
            .build()
    }

    /// Return a reference to the query configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the similarity index.
    pub fn index(&self) -> &Arc<dyn SimilarityIndex> {
        &self.index
    }

    /// Answer a query with at most `top_k` results.
    ///
    /// `top_k` defaults to the configured value. The look-ahead window is
    /// `max(lookahead, top_k)` candidates; noise is skipped within it and the
    /// result is never padded, so fewer than `top_k` hits (or none) are
    /// returned with [`QueryStatus::InsufficientMatches`] when the window
    /// runs out.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyQuery`] for blank text (before the encoder is
    /// called), [`RagError::ConfigError`] if `top_k` is zero, the encoder's
    /// error, or [`RagError::DegenerateQuery`] if the query encodes to a zero
    /// vector.
    pub async fn query(&self, text: &str, top_k: Option<usize>) -> Result<QueryResult> {
        if text.trim().is_empty() {
            return Err(RagError::EmptyQuery);
        }
        let top_k = top_k.unwrap_or(self.config.top_k);
        if top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }

        // 1. Encode the query
        let query_embedding = self.embedding_provider.embed(text).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;

        // 2. Rank the look-ahead window
        let window = self.filter.window(top_k);
        let ranked = self.index.rank(&query_embedding, window).await.inspect_err(|e| {
            error!(error = %e, "ranking failed");
        })?;

        // 3. Filter noise and resolve records
        let outcome = self.filter.filter(&ranked, top_k, self.resolver.as_ref());

        let status = if outcome.accepted.len() >= top_k {
            QueryStatus::Complete
        } else {
            QueryStatus::InsufficientMatches
        };

        info!(
            requested = top_k,
            hits = outcome.accepted.len(),
            rejected = outcome.rejected,
            unresolved = outcome.unresolved.len(),
            examined = outcome.examined,
            "query completed"
        );

        Ok(QueryResult {
            query: text.to_string(),
            requested: top_k,
            hits: outcome.accepted,
            unresolved: outcome.unresolved,
            status,
        })
    }
}

/// Check that `store` was built by the same model as `provider`.
///
/// # Errors
///
/// Returns [`RagError::ModelMismatch`] if the model names or dimensions differ.
pub fn check_compatible(store: &VectorStore, provider: &dyn EmbeddingProvider) -> Result<()> {
    if store.model() == provider.model_name() && store.dimensions() == provider.dimensions() {
        return Ok(());
    }
    error!(
        stored = store.model(),
        stored_dimensions = store.dimensions(),
        provider = provider.model_name(),
        provider_dimensions = provider.dimensions(),
        "store was built by a different model"
    );
    Err(RagError::ModelMismatch {
        stored: store.model().to_string(),
        stored_dimensions: store.dimensions(),
        provider: provider.model_name().to_string(),
        provider_dimensions: provider.dimensions(),
    })
}

/// Builder for constructing a [`QueryEngine`].
///
/// `embedding_provider`, `index`, and `resolver` are required; `config`
/// defaults to [`QueryConfig::default()`].
///
/// # Example
///
/// ```rust,ignore
/// let engine = QueryEngine::builder()
///     .config(QueryConfig::builder().top_k(5).build()?)
///     .embedding_provider(Arc::new(embedder))
///     .index(Arc::new(store))
///     .resolver(Arc::new(RecordCatalog::new(records)))
///     .build()?;
/// ```
#[derive(Default)]
pub struct QueryEngineBuilder {
    config: Option<QueryConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn SimilarityIndex>>,
    resolver: Option<Arc<dyn RecordResolver>>,
}

impl QueryEngineBuilder {
    /// Set the query configuration.
    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the similarity index.
    pub fn index(mut self, index: Arc<dyn SimilarityIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the record resolver.
    pub fn resolver(mut self, resolver: Arc<dyn RecordResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the [`QueryEngine`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or
    /// the query configuration is invalid.
    pub fn build(self) -> Result<QueryEngine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::ConfigError("index is required".to_string()))?;
        let resolver = self
            .resolver
            .ok_or_else(|| RagError::ConfigError("resolver is required".to_string()))?;
        let filter = CandidateFilter::from_config(&config);

        Ok(QueryEngine { config, embedding_provider, index, resolver, filter })
    }
}
