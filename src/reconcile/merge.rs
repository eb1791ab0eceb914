//! Upsert-by-identity for single-object saves.

use serde::{Deserialize, Serialize};

use crate::model::{object_id, ConfigCollection, ConfigObject};

/// What to do when the incoming object's id is already in the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnConflict {
    /// Replace the existing entry in place.
    #[default]
    Overwrite,
    /// Leave the existing entry as it is and discard the incoming object.
    Keep,
    /// Remove the existing entry and discard the incoming object too.
    ///
    /// This is what declining the overwrite prompt used to do; it is only
    /// reachable through `fetch --drop-on-decline`.
    DropExisting,
}

/// Outcome of [`merge_object`], for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    Appended,
    Overwritten,
    Kept,
    Dropped,
}

/// Upsert `updated` into a copy of `existing`, keyed by id.
///
/// Untouched objects keep their relative order. An overwritten object takes
/// the position of the one it replaces; a new one is appended. Only the
/// first entry with a matching id is considered.
#[must_use]
pub fn merge_object(
    existing: &[ConfigObject],
    updated: &ConfigObject,
    on_conflict: OnConflict,
) -> (ConfigCollection, MergeOutcome) {
    let updated_id = object_id(updated);
    let position = updated_id
        .as_deref()
        .and_then(|id| existing.iter().position(|o| object_id(o).as_deref() == Some(id)));

    let Some(position) = position else {
        let mut merged = existing.to_vec();
        merged.push(updated.clone());
        return (merged, MergeOutcome::Appended);
    };

    let mut merged = existing.to_vec();
    let outcome = match on_conflict {
        OnConflict::Overwrite => {
            merged[position] = updated.clone();
            MergeOutcome::Overwritten
        }
        OnConflict::Keep => MergeOutcome::Kept,
        OnConflict::DropExisting => {
            merged.remove(position);
            MergeOutcome::Dropped
        }
    };

    (merged, outcome)
}

/// Whether `collection` already holds an object with `updated`'s id.
#[must_use]
pub fn contains_id(collection: &[ConfigObject], updated: &ConfigObject) -> bool {
    object_id(updated).is_some_and(|id| {
        collection
            .iter()
            .any(|o| object_id(o).as_deref() == Some(id.as_str()))
    })
}
