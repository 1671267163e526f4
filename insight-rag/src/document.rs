//! Data types for records, identifiers, zones, and query results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a [`Record`].
///
/// Corpus files encode identifiers as JSON integers, floats, or strings.
/// All are normalized to one canonical string form on ingestion, so `7`
/// and `"7"` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawRecordId", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from its canonical string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecordId {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl From<RawRecordId> for RecordId {
    fn from(raw: RawRecordId) -> Self {
        match raw {
            RawRecordId::Signed(id) => id.into(),
            RawRecordId::Unsigned(id) => id.into(),
            // Whole floats print without a fraction, so `2.0` and `2` name the same record.
            RawRecordId::Float(id) => RecordId(id.to_string()),
            RawRecordId::Text(id) => id.into(),
        }
    }
}

/// Coarse topical zone assigned to a record by keyword rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Zone {
    /// Public policy, regulation, and safety.
    A,
    /// Business, investment, and markets.
    B,
    /// Labor, skills, and employment.
    C,
    /// No zone rule matched.
    #[default]
    Uncategorized,
}

impl Zone {
    /// Every zone, in precedence order.
    pub const ALL: [Zone; 4] = [Zone::A, Zone::B, Zone::C, Zone::Uncategorized];

    /// Parse a label as written in corpus files.
    pub fn from_label(label: &str) -> Option<Zone> {
        Zone::ALL.into_iter().find(|zone| zone.as_str() == label)
    }

    /// Return the label used in corpus files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::A => "A",
            Zone::B => "B",
            Zone::C => "C",
            Zone::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enriched text unit from the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique identifier within the corpus.
    pub id: RecordId,
    /// The text body.
    pub text: String,
    /// Zone label assigned during enrichment.
    pub zone: Zone,
}

impl Record {
    /// Create a record.
    pub fn new(id: impl Into<RecordId>, text: impl Into<String>, zone: Zone) -> Self {
        Self { id: id.into(), text: text.into(), zone }
    }
}

/// A stored identifier paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The stored identifier.
    pub id: RecordId,
    /// Cosine similarity to the query vector.
    pub score: f32,
    /// Index of the entry in the store.
    pub position: usize,
}

/// An accepted result of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// The resolved record.
    pub record: Record,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
    /// 1-based position of the candidate in the ranked list.
    pub rank: usize,
}

/// A ranked candidate whose identifier could not be mapped back to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedHit {
    /// The identifier found in the store.
    pub id: RecordId,
    /// Cosine similarity to the query.
    pub score: f32,
    /// 1-based position of the candidate in the ranked list.
    pub rank: usize,
    /// Why resolution failed.
    pub reason: String,
}

/// Whether a query collected as many results as were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// `requested` results were accepted.
    Complete,
    /// The look-ahead window ran out first; the result set is partial or empty.
    InsufficientMatches,
}

/// The outcome of a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The query text as submitted.
    pub query: String,
    /// The number of results that were requested.
    pub requested: usize,
    /// Accepted results, best first.
    pub hits: Vec<Hit>,
    /// Candidates that were ranked but could not be resolved.
    pub unresolved: Vec<UnresolvedHit>,
    /// Whether `hits` reached `requested`.
    pub status: QueryStatus,
}

impl QueryResult {
    /// Returns `true` if no results were accepted.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
