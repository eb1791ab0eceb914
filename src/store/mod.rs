//! Local config folder.
//!
//! One pretty-printed JSON array per object kind (`monitors.json`,
//! `dashboards.json`). A missing file is reported as `None`, which is
//! distinct from a file holding `[]`.

mod file;

pub use file::{atomic_write, ensure_gitignore, gitignore_content};

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{all_kinds, collection_from_value, ConfigCollection, ConfigObject, ObjectKind};

/// Local state: each kind's collection, or `None` when its file is absent.
pub type LocalSnapshot = BTreeMap<ObjectKind, Option<ConfigCollection>>;

/// Path of the file holding `kind` inside `dir`.
#[must_use]
pub fn kind_path(kind: ObjectKind, dir: &Path) -> PathBuf {
    dir.join(kind.file_name())
}

/// Read one kind's collection.
///
/// # Errors
///
/// Returns [`Error::CorruptLocalFile`] if the file exists but isn't a JSON
/// array of objects, or [`Error::Io`] if it can't be read.
pub fn read(kind: ObjectKind, dir: &Path) -> Result<Option<ConfigCollection>> {
    let path = kind_path(kind, dir);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let corrupt = |message: String| Error::CorruptLocalFile {
        path: path.clone(),
        message,
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    let collection = collection_from_value(value).map_err(corrupt)?;

    debug!(kind = %kind, path = %path.display(), count = collection.len(), "Read local config");
    Ok(Some(collection))
}

/// Read one kind's collection, treating a missing file as an error.
///
/// # Errors
///
/// Returns [`Error::MissingLocalFile`] if the file doesn't exist, otherwise
/// the same errors as [`read`].
pub fn read_required(kind: ObjectKind, dir: &Path) -> Result<ConfigCollection> {
    read(kind, dir)?.ok_or_else(|| Error::MissingLocalFile {
        path: kind_path(kind, dir),
    })
}

/// Overwrite one kind's file with `collection`, creating `dir` if needed.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write(kind: ObjectKind, dir: &Path, collection: &[ConfigObject]) -> Result<PathBuf> {
    let path = kind_path(kind, dir);
    let mut content = serde_json::to_string_pretty(collection)?;
    content.push('\n');

    atomic_write(&path, &content)?;
    debug!(kind = %kind, path = %path.display(), count = collection.len(), "Wrote local config");

    Ok(path)
}

/// Read every registered kind.
///
/// Absent files are logged and reported as `None`; a corrupt file aborts.
///
/// # Errors
///
/// Returns the first read error other than "not found".
pub fn read_all(dir: &Path) -> Result<LocalSnapshot> {
    let mut snapshot = LocalSnapshot::new();

    for kind in all_kinds() {
        let collection = read(kind, dir)?;
        if collection.is_none() {
            warn!(file = %kind.file_name(), dir = %dir.display(), "No local file - skipping");
        }
        snapshot.insert(kind, collection);
    }

    Ok(snapshot)
}

/// Write every kind of a remote snapshot, returning the written paths in order.
///
/// # Errors
///
/// Stops at the first failed write; files written before it stay written.
pub fn write_all(
    dir: &Path,
    snapshot: &BTreeMap<ObjectKind, ConfigCollection>,
) -> Result<Vec<PathBuf>> {
    snapshot
        .iter()
        .map(|(kind, collection)| write(*kind, dir, collection))
        .collect()
}
