//! Configuration for the corpus, store, encoder, query engine, and zone rules.
//!
//! Every path and keyword list the engine uses lives here and is passed to the
//! components at construction. A [`Config`] is usually read from a TOML file
//! with [`Config::load`]; any section or field left out falls back to its
//! default.
//!
//! ```toml
//! [corpus]
//! dir = "data/enriched"
//!
//! [store]
//! path = "semantic_vectors.json"
//!
//! [embedding]
//! backend = "hashing"
//! dimensions = 384
//!
//! [query]
//! top_k = 3
//! lookahead = 20
//! noise_markers = ["Copyright", "Licensed under"]
//!
//! [[zones.rules]]
//! zone = "A"
//! keywords = ["policy", "regulation"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::Zone;
use crate::error::{RagError, Result};
use crate::hashing;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where enriched corpus files live.
    pub corpus: CorpusConfig,
    /// Where the vector store is persisted.
    pub store: StoreConfig,
    /// Which encoder to use.
    pub embedding: EmbeddingConfig,
    /// Query-time parameters.
    pub query: QueryConfig,
    /// Zone classification rules.
    pub zones: ZoneConfig,
}

impl Config {
    /// Read, parse, and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ReadConfig`] or [`RagError::ParseConfig`] if the
    /// file cannot be read or parsed, and [`RagError::ConfigError`] if a value
    /// is out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|source| RagError::ReadConfig { path: path.to_path_buf(), source })?;
        let config: Config = toml::from_str(&raw)
            .map_err(|source| RagError::ParseConfig { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every section holds usable values.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimensions == 0 {
            return Err(RagError::ConfigError(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(RagError::ConfigError("embedding.model must be non-empty".to_string()));
        }
        self.query.validate()?;
        self.zones.validate()
    }
}

/// Location of the enriched corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding the enriched JSON files.
    pub dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("data/enriched") }
    }
}

/// Location of the persisted vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the store file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("semantic_vectors.json") }
    }
}

/// Available encoder backends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// [`HashingEmbeddingProvider`](crate::HashingEmbeddingProvider), offline.
    #[default]
    Hashing,
    /// An OpenAI-compatible `/v1/embeddings` endpoint (requires the `openai` feature).
    OpenAi,
}

/// Encoder selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which backend to construct.
    pub backend: EmbeddingBackend,
    /// Model name; recorded in the store and checked when it is loaded.
    pub model: String,
    /// Length of every vector the model produces.
    pub dimensions: usize,
    /// Override for the embeddings endpoint (OpenAI-compatible servers).
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Send `dimensions` with each request so the server truncates vectors.
    pub request_dimensions: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hashing,
            model: hashing::DEFAULT_MODEL.to_string(),
            dimensions: 384,
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_dimensions: false,
        }
    }
}

/// Markers that identify boilerplate text out of the box.
pub const DEFAULT_NOISE_MARKERS: [&str; 6] =
    ["Copyright", "Licensed under", "http://", "NVIDIA", "Apache", "coding=utf-8"];

/// Query-time parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of results returned when the caller does not ask for a specific count.
    pub top_k: usize,
    /// Number of ranked candidates examined before giving up.
    pub lookahead: usize,
    /// Case-sensitive substrings that mark a text as boilerplate.
    pub noise_markers: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            lookahead: 20,
            noise_markers: DEFAULT_NOISE_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl QueryConfig {
    /// Create a new builder for constructing a [`QueryConfig`].
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::ConfigError("query.top_k must be greater than zero".to_string()));
        }
        if self.lookahead == 0 {
            return Err(RagError::ConfigError(
                "query.lookahead must be greater than zero".to_string(),
            ));
        }
        if self.noise_markers.iter().any(|m| m.is_empty()) {
            return Err(RagError::ConfigError(
                "query.noise_markers must not contain empty strings".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`QueryConfig`].
#[derive(Debug, Clone, Default)]
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Set the default number of results.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the look-ahead window.
    pub fn lookahead(mut self, window: usize) -> Self {
        self.config.lookahead = window;
        self
    }

    /// Replace the noise denylist.
    pub fn noise_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.noise_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Build the [`QueryConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `lookahead == 0`
    /// - a noise marker is the empty string
    pub fn build(self) -> Result<QueryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// One keyword rule: a text containing any keyword belongs to `zone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneRule {
    /// The zone assigned on a match.
    pub zone: Zone,
    /// Keywords, matched case-insensitively as substrings.
    pub keywords: Vec<String>,
}

impl ZoneRule {
    fn new(zone: Zone, keywords: &[&str]) -> Self {
        Self { zone, keywords: keywords.iter().map(|k| k.to_string()).collect() }
    }
}

/// Ordered zone rules; earlier rules take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    /// Rules in precedence order.
    pub rules: Vec<ZoneRule>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ZoneRule::new(
                    Zone::A,
                    &[
                        "policy",
                        "regulation",
                        "government",
                        "safety",
                        "nhs",
                        "ethical",
                        "public",
                        "standard",
                    ],
                ),
                ZoneRule::new(
                    Zone::B,
                    &[
                        "investment",
                        "market",
                        "startups",
                        "revenue",
                        "sector",
                        "industry",
                        "business",
                        "economy",
                    ],
                ),
                ZoneRule::new(
                    Zone::C,
                    &[
                        "jobs",
                        "skills",
                        "automation",
                        "workforce",
                        "education",
                        "training",
                        "employment",
                    ],
                ),
            ],
        }
    }
}

impl ZoneConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.zone == Zone::Uncategorized {
                return Err(RagError::ConfigError(
                    "zones.rules must not target the Uncategorized zone".to_string(),
                ));
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(RagError::ConfigError(format!(
                    "zones.rules for zone {} contain an empty keyword",
                    rule.zone
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config: Config = toml::from_str(
            r#"
            [query]
            top_k = 5

            [store]
            path = "/tmp/store.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.query.top_k, 5);
        assert_eq!(config.query.lookahead, 20);
        assert_eq!(config.query.noise_markers.len(), DEFAULT_NOISE_MARKERS.len());
        assert_eq!(config.store.path, PathBuf::from("/tmp/store.json"));
        assert_eq!(config.zones.rules.len(), 3);
    }

    #[test]
    fn openai_backend_parses() {
        let config: Config = toml::from_str(
            r#"
            [embedding]
            backend = "openai"
            model = "text-embedding-3-small"
            dimensions = 1536
            "#,
        )
        .unwrap();
        assert_eq!(config.embedding.backend, EmbeddingBackend::OpenAi);
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        let err = QueryConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn builder_rejects_empty_noise_marker() {
        let err = QueryConfig::builder().noise_markers(["Copyright", ""]).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(_)));
    }

    #[test]
    fn uncategorized_rule_is_rejected() {
        let mut config = Config::default();
        config.zones.rules.push(ZoneRule::new(Zone::Uncategorized, &["misc"]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/insight.toml")).unwrap_err();
        assert!(matches!(err, RagError::ReadConfig { .. }));
    }
}
