//! Mapping from stored identifiers back to corpus records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{info, warn};

use crate::document::{Record, RecordId};
use crate::error::{RagError, Result};

/// Resolves an identifier found in the vector store to its full record.
pub trait RecordResolver: Send + Sync {
    /// Look up the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RecordNotFound`] if the record was removed or
    /// renamed after the store was built.
    fn resolve(&self, id: &RecordId) -> Result<&Record>;
}

/// An in-memory `id -> record` map built once from the corpus.
///
/// When the corpus holds the same identifier more than once, the first
/// occurrence in corpus order wins.
#[derive(Debug, Clone, Default)]
pub struct RecordCatalog {
    records: HashMap<RecordId, Record>,
}

impl RecordCatalog {
    /// Build a catalog from records in corpus order.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        let mut map = HashMap::new();
        let mut duplicates = 0usize;
        for record in records {
            match map.entry(record.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(_) => {
                    warn!(id = %record.id, "duplicate record id; keeping first occurrence");
                    duplicates += 1;
                }
            }
        }
        info!(records = map.len(), duplicates, "built record catalog");
        Self { records: map }
    }

    /// Return the record for `id`, if any.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordResolver for RecordCatalog {
    fn resolve(&self, id: &RecordId) -> Result<&Record> {
        self.get(id).ok_or_else(|| RagError::RecordNotFound { id: id.clone() })
    }
}
