//! Error types for the `insight-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::RecordId;

/// Errors that can occur while building or querying a vector store.
#[derive(Debug, Error)]
pub enum RagError {
    /// No persisted store exists at the configured location.
    #[error("Vector store not found at {path:?}; run `insight build` first")]
    StoreNotFound {
        /// The path that was expected to hold the store.
        path: PathBuf,
    },

    /// The persisted `ids` and `vectors` arrays have different lengths.
    #[error("Vector store is corrupt: {ids} ids but {vectors} vectors")]
    AlignmentError {
        /// Number of identifiers in the store.
        ids: usize,
        /// Number of vectors in the store.
        vectors: usize,
    },

    /// A stored vector has zero magnitude, so its cosine similarity is undefined.
    #[error("Degenerate (zero-norm) vector for record '{id}' at position {position}")]
    DegenerateVector {
        /// The identifier of the offending entry.
        id: RecordId,
        /// Index of the entry in the store.
        position: usize,
    },

    /// The query encoded to a zero-norm vector.
    #[error("Degenerate (zero-norm) query vector")]
    DegenerateQuery,

    /// Two vectors that must be compared have different lengths.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality required by the store or provider.
        expected: usize,
        /// The dimensionality that was encountered.
        actual: usize,
    },

    /// The store was built with a different encoder than the one serving queries.
    #[error("Store was built with model '{stored}' ({stored_dimensions}d) but the provider is '{provider}' ({provider_dimensions}d)")]
    ModelMismatch {
        /// Model recorded in the store.
        stored: String,
        /// Dimensions recorded in the store.
        stored_dimensions: usize,
        /// Model reported by the embedding provider.
        provider: String,
        /// Dimensions reported by the embedding provider.
        provider_dimensions: usize,
    },

    /// An identifier in the store has no matching record in the corpus.
    #[error("Record '{id}' not found in corpus (removed or renamed since the store was built)")]
    RecordNotFound {
        /// The identifier that could not be resolved.
        id: RecordId,
    },

    /// The query text was empty or whitespace-only.
    #[error("Query text must not be empty")]
    EmptyQuery,

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Reading or writing the persisted store failed.
    #[error("Vector store I/O failed at {path:?}: {source}")]
    StoreIo {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The persisted store could not be encoded or decoded.
    #[error("Vector store at {path:?} is malformed: {message}")]
    StoreFormat {
        /// The file involved.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// A corpus file or directory could not be read or parsed.
    #[error("Corpus error at {path:?}: {message}")]
    CorpusError {
        /// The file or directory involved.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read config file at {path:?}")]
    ReadConfig {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
    #[error("Failed to parse config file at {path:?}")]
    ParseConfig {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying parse error.
        source: toml::de::Error,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
