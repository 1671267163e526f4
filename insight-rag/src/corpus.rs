//! Loading text units from a directory of JSON files.
//!
//! A corpus directory may hold any number of `*.json` files, in nested
//! directories too. Each file contains a single unit object or an array of
//! them, and the whole directory is treated as one flat collection in file
//! name order. A unit looks like:
//!
//! ```json
//! { "id": 12, "text_preview": "Government safety regulation ...", "metadata": { "zone": "A" } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::document::{Record, RecordId, Zone};
use crate::error::{RagError, Result};

/// Records loaded from a corpus directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    /// Records in corpus order.
    pub records: Vec<Record>,
    /// Number of JSON files read.
    pub files: usize,
    /// Number of units skipped because they had no usable identifier.
    pub skipped: usize,
}

#[derive(Deserialize)]
struct RawUnit {
    id: Option<RecordId>,
    text_preview: Option<String>,
    text: Option<String>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Deserialize)]
struct RawMetadata {
    zone: Option<String>,
}

fn corpus_error(path: &Path, message: impl Into<String>) -> RagError {
    RagError::CorpusError { path: path.to_path_buf(), message: message.into() }
}

/// List every `*.json` file under `dir`, sorted by path. Symbolic links are
/// followed.
///
/// # Errors
///
/// Returns [`RagError::CorpusError`] if `dir` does not exist or is not a
/// directory, or if any entry below it cannot be read (unreadable
/// directories, dangling links, link loops).
pub fn discover_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(corpus_error(dir, "corpus directory not found"));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir);
            warn!(path = %path.display(), error = %e, "corpus walk failed");
            corpus_error(path, e.to_string())
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Read the units of one corpus file.
///
/// A file holding an array yields its elements; any other JSON value is
/// treated as a single unit.
pub fn read_units(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| corpus_error(path, e.to_string()))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| corpus_error(path, format!("invalid JSON: {e}")))?;
    Ok(match value {
        Value::Array(units) => units,
        other => vec![other],
    })
}

fn parse_unit(path: &Path, index: usize, unit: Value) -> Option<Record> {
    let raw: RawUnit = match serde_json::from_value(unit) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(file = %path.display(), index, error = %e, "skipping malformed unit");
            return None;
        }
    };
    let Some(id) = raw.id else {
        warn!(file = %path.display(), index, "skipping unit without id");
        return None;
    };

    let zone = raw
        .metadata
        .and_then(|m| m.zone)
        .map(|label| {
            Zone::from_label(&label).unwrap_or_else(|| {
                warn!(%id, label = %label, "unknown zone label; treating as Uncategorized");
                Zone::Uncategorized
            })
        })
        .unwrap_or_default();

    let text = raw.text_preview.or(raw.text).unwrap_or_default();
    Some(Record { id, text, zone })
}

/// Load every record under `dir`.
///
/// Units without an identifier are skipped with a warning. Units without
/// text are kept with empty text; the store builder decides what to do with
/// them.
///
/// # Errors
///
/// Returns [`RagError::CorpusError`] if the directory is missing or a file
/// cannot be read or is not valid JSON.
pub fn load_corpus(dir: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::default();

    for path in discover_json_files(dir)? {
        let units = read_units(&path)?;
        corpus.files += 1;
        for (index, unit) in units.into_iter().enumerate() {
            match parse_unit(&path, index, unit) {
                Some(record) => corpus.records.push(record),
                None => corpus.skipped += 1,
            }
        }
    }

    info!(
        dir = %dir.display(),
        files = corpus.files,
        records = corpus.records.len(),
        skipped = corpus.skipped,
        "loaded corpus"
    );
    Ok(corpus)
}
