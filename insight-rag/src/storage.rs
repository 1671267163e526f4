//! Durable storage for a [`VectorStore`].
//!
//! The store is a single JSON document holding the model name, the vector
//! dimensionality, and the aligned `ids` and `vectors` arrays. Saving writes a
//! sibling temporary file, syncs it, and renames it over the target, so a
//! failed rebuild never leaves a half-written store where a valid one was.
//! Rebuilding while another process serves queries from the same path is the
//! caller's responsibility to avoid; readers see either the old or new file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::document::RecordId;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Version written to, and required from, every store file.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StoreFileRef<'a> {
    format_version: u32,
    model: &'a str,
    dimensions: usize,
    ids: &'a [RecordId],
    vectors: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct StoreFile {
    format_version: u32,
    model: String,
    dimensions: usize,
    ids: Vec<RecordId>,
    vectors: Vec<Vec<f32>>,
}

fn io_error(path: &Path, source: std::io::Error) -> RagError {
    RagError::StoreIo { path: path.to_path_buf(), source }
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| RagError::StoreFormat {
            path: path.to_path_buf(),
            message: "store path has no file name".to_string(),
        })?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Persist `store` at `path`, atomically replacing any previous store.
///
/// # Errors
///
/// Returns [`RagError::StoreIo`] if the file cannot be written or renamed and
/// [`RagError::StoreFormat`] if the store cannot be encoded.
pub async fn save_store(store: &VectorStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| io_error(parent, e))?;
    }

    let file = StoreFileRef {
        format_version: FORMAT_VERSION,
        model: store.model(),
        dimensions: store.dimensions(),
        ids: store.ids(),
        vectors: store.vectors(),
    };
    let data = serde_json::to_vec(&file).map_err(|e| RagError::StoreFormat {
        path: path.to_path_buf(),
        message: format!("serialization failed: {e}"),
    })?;

    let temp = temp_path(path)?;
    if let Err(e) = write_synced(&temp, &data).await {
        error!(path = %temp.display(), error = %e, "failed to write temporary store file");
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(io_error(&temp, e));
    }

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        error!(path = %path.display(), error = %e, "failed to move store into place");
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(io_error(path, e));
    }

    info!(path = %path.display(), entries = store.len(), bytes = data.len(), "saved vector store");
    Ok(())
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

/// Load a store previously written by [`save_store`].
///
/// # Errors
///
/// - [`RagError::StoreNotFound`] if nothing exists at `path`.
/// - [`RagError::AlignmentError`] if `ids` and `vectors` differ in length.
/// - [`RagError::DimensionMismatch`] if a vector's length differs from the recorded dimensions.
/// - [`RagError::StoreFormat`] if the file is not a valid store.
/// - [`RagError::StoreIo`] for other read failures.
pub async fn load_store(path: &Path) -> Result<VectorStore> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            RagError::StoreNotFound { path: path.to_path_buf() }
        } else {
            io_error(path, e)
        }
    })?;

    let file: StoreFile = serde_json::from_slice(&data).map_err(|e| RagError::StoreFormat {
        path: path.to_path_buf(),
        message: format!("parse failed: {e}"),
    })?;

    if file.format_version != FORMAT_VERSION {
        return Err(RagError::StoreFormat {
            path: path.to_path_buf(),
            message: format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                file.format_version
            ),
        });
    }
    if file.vectors.iter().flatten().any(|x| !x.is_finite()) {
        return Err(RagError::StoreFormat {
            path: path.to_path_buf(),
            message: "vectors contain non-finite values".to_string(),
        });
    }

    let store = VectorStore::from_parts(file.model, file.dimensions, file.ids, file.vectors)
        .inspect_err(|e| error!(path = %path.display(), error = %e, "refusing corrupt store"))?;

    info!(
        path = %path.display(),
        entries = store.len(),
        model = store.model(),
        dimensions = store.dimensions(),
        "loaded vector store"
    );
    Ok(store)
}
