//! Local → remote push.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{object_id, ConfigObject, ObjectKind};
use crate::remote::RemoteGateway;

/// One update ready to send: the target id and the stripped payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedUpdate {
    /// Captured before stripping; `None` if the object had no id.
    pub id: Option<String>,
    pub payload: ConfigObject,
}

/// Counts from a push.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PushStats {
    pub kind: Option<ObjectKind>,
    pub updated: usize,
}

/// Copy each object with the kind's rejected fields removed, keeping order.
#[must_use]
pub fn prepare_push(kind: ObjectKind, collection: &[ConfigObject]) -> Vec<PreparedUpdate> {
    let strip = kind.info().strip_on_push;

    collection
        .iter()
        .map(|object| {
            let id = object_id(object);
            let payload = object
                .iter()
                .filter(|(key, _)| !strip.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            PreparedUpdate { id, payload }
        })
        .collect()
}

/// Send every object of `collection` as an update, in order.
///
/// `on_updated` is called with the id after each successful update.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] before sending anything if an object
/// has no id. A remote failure stops the push; updates already sent are not
/// rolled back.
pub fn push_collection(
    gateway: &dyn RemoteGateway,
    kind: ObjectKind,
    collection: &[ConfigObject],
    on_updated: &mut dyn FnMut(&str),
) -> Result<PushStats> {
    let prepared = prepare_push(kind, collection);

    if let Some(position) = prepared.iter().position(|p| p.id.is_none()) {
        return Err(Error::InvalidArgument(format!(
            "{} entry {position} has no id; it can't be pushed as an update",
            kind.file_name()
        )));
    }

    let mut stats = PushStats {
        kind: Some(kind),
        updated: 0,
    };

    for update in prepared {
        let id = update.id.unwrap_or_default();
        debug!(kind = %kind, id = %id, "Pushing update");
        gateway.update(kind, &id, &update.payload)?;
        stats.updated += 1;
        on_updated(&id);
    }

    info!(kind = %kind, updated = stats.updated, "Pushed local config");
    Ok(stats)
}
