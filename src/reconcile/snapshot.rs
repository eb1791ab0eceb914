//! Live remote snapshot.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{all_kinds, object_id, ConfigCollection, ObjectKind};
use crate::remote::RemoteGateway;

/// Remote state: every registered kind's full collection.
pub type RemoteSnapshot = BTreeMap<ObjectKind, ConfigCollection>;

/// One completed detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub kind: ObjectKind,
    /// 1-based position in the list.
    pub index: usize,
    pub total: usize,
    pub label: String,
}

/// Fetch the full remote state.
///
/// Kinds whose list endpoint only returns summaries get one `get` per entry,
/// in list order, and `on_progress` fires after each one completes.
///
/// # Errors
///
/// Any gateway failure aborts the whole fetch: a partial snapshot would make
/// a later diff or save silently drop objects.
pub fn fetch_remote_snapshot(
    gateway: &dyn RemoteGateway,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<RemoteSnapshot> {
    let mut snapshot = RemoteSnapshot::new();

    for kind in all_kinds() {
        let collection = fetch_kind(gateway, kind, on_progress)?;
        info!(kind = %kind, count = collection.len(), "Fetched remote config");
        snapshot.insert(kind, collection);
    }

    Ok(snapshot)
}

/// Fetch one kind's full collection.
///
/// # Errors
///
/// Returns the first gateway failure, or [`Error::Remote`] if a summary
/// entry has no id to fetch.
pub fn fetch_kind(
    gateway: &dyn RemoteGateway,
    kind: ObjectKind,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<ConfigCollection> {
    let listed = gateway.list(kind)?;
    if !kind.info().list_is_summary {
        return Ok(listed);
    }

    let total = listed.len();
    let label_field = kind.info().label_field;
    let mut details = Vec::with_capacity(total);

    for (position, summary) in listed.iter().enumerate() {
        let id = object_id(summary).ok_or_else(|| Error::Remote {
            status: 200,
            message: format!("{kind} list entry {position} has no id"),
        })?;

        debug!(kind = %kind, id = %id, "Fetching detail");
        details.push(gateway.get(kind, &id)?);

        let label = summary
            .get(label_field)
            .and_then(|v| v.as_str())
            .map_or_else(|| id.clone(), ToString::to_string);
        on_progress(Progress {
            kind,
            index: position + 1,
            total,
            label,
        });
    }

    Ok(details)
}
