//! Semantic retrieval over an enriched text corpus.
//!
//! This crate provides:
//! - Corpus loading from directories of JSON unit files
//! - Keyword-based zone enrichment, validation reports, and zone statistics
//! - Vector store construction and atomic persistence
//! - Exact cosine ranking behind the [`SimilarityIndex`] trait
//! - Noise filtering over a look-ahead window and record resolution
//! - The [`QueryEngine`] tying encode → rank → filter → resolve together
//!
//! Embeddings come from an [`EmbeddingProvider`]. The offline
//! [`HashingEmbeddingProvider`] is always available; an OpenAI-compatible
//! HTTP provider is available behind the `openai` feature.

mod audit;
mod builder;
mod config;
mod corpus;
mod document;
mod embedding;
mod error;
mod filter;
mod hashing;
#[cfg(feature = "openai")]
mod openai;
mod pipeline;
mod ranking;
mod resolver;
mod storage;
mod vectorstore;
mod zone;

pub use audit::{MAX_LISTED_ISSUES, ValidationReport, ZoneStats, validate_dir};
pub use builder::StoreBuilder;
pub use config::{
    Config, CorpusConfig, DEFAULT_NOISE_MARKERS, EmbeddingBackend, EmbeddingConfig, QueryConfig,
    QueryConfigBuilder, StoreConfig, ZoneConfig, ZoneRule,
};
pub use corpus::{Corpus, discover_json_files, load_corpus, read_units};
pub use document::{
    Candidate, Hit, QueryResult, QueryStatus, Record, RecordId, UnresolvedHit, Zone,
};
pub use embedding::{EmbeddingProvider, provider_from_config};
pub use error::{RagError, Result};
pub use filter::{CandidateFilter, FilterOutcome, NoiseFilter};
pub use hashing::HashingEmbeddingProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{QueryEngine, QueryEngineBuilder, check_compatible};
pub use ranking::{cosine_similarity, rank_exact};
pub use resolver::{RecordCatalog, RecordResolver};
pub use storage::{FORMAT_VERSION, load_store, save_store};
pub use vectorstore::{SimilarityIndex, VectorStore};
pub use zone::{EnrichSummary, ZoneClassifier, enrich_dir};
