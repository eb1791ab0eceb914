//! Structural diff between local and remote snapshots.
//!
//! Objects are paired by id, then compared field by field. A delta describes
//! what would have to change locally to match the remote.

use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};

use super::snapshot::RemoteSnapshot;
use crate::model::{object_id, ConfigObject, ObjectKind};
use crate::store::LocalSnapshot;

/// Longest rendered value before `print_diff` truncates it.
const MAX_VALUE_CHARS: usize = 80;

/// One difference between a local and a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    /// Present remotely, missing locally.
    Added { path: String, value: Value },
    /// Present locally, missing remotely.
    Removed { path: String, value: Value },
    /// Same path, different leaf values.
    Changed {
        path: String,
        local: Value,
        remote: Value,
    },
    /// Same objects, different order.
    Reordered,
}

/// Differences for one kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindDelta {
    /// No local file existed; the local side was diffed as empty.
    pub local_missing: bool,
    pub changes: Vec<Change>,
}

impl KindDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Differences for every kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffResult {
    pub kinds: BTreeMap<ObjectKind, KindDelta>,
}

impl DiffResult {
    /// True iff every kind's local collection equals its remote one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(KindDelta::is_empty)
    }

    /// Total number of changes across kinds.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.kinds.values().map(|d| d.changes.len()).sum()
    }
}

/// Diff every kind of `remote` against `local`. Neither input is modified.
///
/// An absent local file diffs as an empty collection.
#[must_use]
pub fn diff(local: &LocalSnapshot, remote: &RemoteSnapshot) -> DiffResult {
    let kinds = remote
        .iter()
        .map(|(kind, remote_objects)| {
            let local_objects = local.get(kind).and_then(Option::as_ref);
            let delta = KindDelta {
                local_missing: local_objects.is_none(),
                changes: diff_collection(
                    *kind,
                    local_objects.map_or(&[][..], Vec::as_slice),
                    remote_objects,
                ),
            };
            (*kind, delta)
        })
        .collect();

    DiffResult { kinds }
}

/// Diff two collections of the same kind.
#[must_use]
pub fn diff_collection(
    kind: ObjectKind,
    local: &[ConfigObject],
    remote: &[ConfigObject],
) -> Vec<Change> {
    let prefix = kind.plural_key();
    let local_ids: Vec<Option<String>> = local.iter().map(object_id).collect();
    let mut local_taken = vec![false; local.len()];
    let mut pairs: Vec<(Option<usize>, usize)> = Vec::with_capacity(remote.len());

    for (remote_index, remote_object) in remote.iter().enumerate() {
        let local_index = match object_id(remote_object) {
            Some(id) => local_ids
                .iter()
                .enumerate()
                .position(|(i, local_id)| !local_taken[i] && local_id.as_deref() == Some(id.as_str())),
            // Objects without an id can only pair up by position.
            None => (remote_index < local.len()
                && !local_taken[remote_index]
                && local_ids[remote_index].is_none())
            .then_some(remote_index),
        };
        if let Some(i) = local_index {
            local_taken[i] = true;
        }
        pairs.push((local_index, remote_index));
    }

    let mut changes = Vec::new();

    for (i, object) in local.iter().enumerate() {
        if !local_taken[i] {
            changes.push(Change::Removed {
                path: object_path(prefix, local_ids[i].as_deref(), i),
                value: Value::Object(object.clone()),
            });
        }
    }

    for &(local_index, remote_index) in &pairs {
        let remote_object = &remote[remote_index];
        let path = object_path(prefix, object_id(remote_object).as_deref(), remote_index);
        match local_index {
            Some(i) => diff_maps(&path, &local[i], remote_object, &mut changes),
            None => changes.push(Change::Added {
                path,
                value: Value::Object(remote_object.clone()),
            }),
        }
    }

    let matched_order: Vec<usize> = pairs.iter().filter_map(|(l, _)| *l).collect();
    if matched_order.windows(2).any(|w| w[0] > w[1]) {
        changes.push(Change::Reordered);
    }

    changes
}

fn object_path(prefix: &str, id: Option<&str>, index: usize) -> String {
    match id {
        Some(id) => format!("{prefix}[{id}]"),
        None => format!("{prefix}[#{index}]"),
    }
}

fn diff_maps(path: &str, local: &Map<String, Value>, remote: &Map<String, Value>, out: &mut Vec<Change>) {
    for (key, local_value) in local {
        let child = format!("{path}.{key}");
        match remote.get(key) {
            Some(remote_value) => diff_values(&child, local_value, remote_value, out),
            None => out.push(Change::Removed {
                path: child,
                value: local_value.clone(),
            }),
        }
    }

    for (key, remote_value) in remote {
        if !local.contains_key(key) {
            out.push(Change::Added {
                path: format!("{path}.{key}"),
                value: remote_value.clone(),
            });
        }
    }
}

fn diff_values(path: &str, local: &Value, remote: &Value, out: &mut Vec<Change>) {
    match (local, remote) {
        (Value::Object(l), Value::Object(r)) => diff_maps(path, l, r, out),
        (Value::Array(l), Value::Array(r)) => {
            for i in 0..l.len().max(r.len()) {
                let child = format!("{path}[{i}]");
                match (l.get(i), r.get(i)) {
                    (Some(lv), Some(rv)) => diff_values(&child, lv, rv, out),
                    (Some(lv), None) => out.push(Change::Removed {
                        path: child,
                        value: lv.clone(),
                    }),
                    (None, Some(rv)) => out.push(Change::Added {
                        path: child,
                        value: rv.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        _ if local == remote => {}
        _ => out.push(Change::Changed {
            path: path.to_string(),
            local: local.clone(),
            remote: remote.clone(),
        }),
    }
}

/// Compact single-line rendering, truncated for the console.
fn render_value(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > MAX_VALUE_CHARS {
        let truncated: String = text.chars().take(MAX_VALUE_CHARS).collect();
        format!("{truncated}...")
    } else {
        text
    }
}

/// Print a diff to stdout in a human-readable format.
pub fn print_diff(result: &DiffResult) {
    for (kind, delta) in &result.kinds {
        if delta.is_empty() {
            continue;
        }

        println!(
            "{} {} ({} change{})",
            kind.emoji(),
            kind.plural_key().bold().underline(),
            delta.changes.len(),
            if delta.changes.len() == 1 { "" } else { "s" }
        );
        if delta.local_missing {
            println!("  {}", format!("No local {} - diffing against nothing", kind.file_name()).dimmed());
        }

        for change in &delta.changes {
            match change {
                Change::Added { path, value } => {
                    println!("  {} {path}: {}", "+".green().bold(), render_value(value).green());
                }
                Change::Removed { path, value } => {
                    println!("  {} {path}: {}", "-".red().bold(), render_value(value).red());
                }
                Change::Changed { path, local, remote } => {
                    println!(
                        "  {} {path}: {} -> {}",
                        "~".yellow().bold(),
                        render_value(local).red(),
                        render_value(remote).green()
                    );
                }
                Change::Reordered => {
                    println!("  {} {}", "~".yellow().bold(), "order differs".yellow());
                }
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> ConfigObject {
        value.as_object().cloned().unwrap()
    }

    fn monitors() -> Vec<ConfigObject> {
        vec![
            obj(json!({"id": 1, "name": "cpu", "options": {"thresholds": {"critical": 90}}})),
            obj(json!({"id": 2, "name": "mem", "tags": ["a", "b"]})),
        ]
    }

    fn snapshots(
        local: Option<Vec<ConfigObject>>,
        remote: Vec<ConfigObject>,
    ) -> (LocalSnapshot, RemoteSnapshot) {
        let mut l = LocalSnapshot::new();
        let mut r = RemoteSnapshot::new();
        l.insert(ObjectKind::Monitor, local);
        r.insert(ObjectKind::Monitor, remote);
        l.insert(ObjectKind::Dashboard, Some(vec![]));
        r.insert(ObjectKind::Dashboard, vec![]);
        (l, r)
    }

    #[test]
    fn test_equal_snapshots_have_no_diff() {
        let (local, remote) = snapshots(Some(monitors()), monitors());
        let result = diff(&local, &remote);
        assert!(result.is_empty());
        assert_eq!(result.change_count(), 0);
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let reordered_fields = vec![
            obj(json!({"options": {"thresholds": {"critical": 90}}, "name": "cpu", "id": 1})),
            obj(json!({"tags": ["a", "b"], "id": 2, "name": "mem"})),
        ];
        let (local, remote) = snapshots(Some(reordered_fields), monitors());
        assert!(diff(&local, &remote).is_empty());
    }

    #[test]
    fn test_single_nested_field_change() {
        let mut edited = monitors();
        edited[0]["options"]["thresholds"]["critical"] = json!(95);
        let (local, remote) = snapshots(Some(edited), monitors());

        let result = diff(&local, &remote);
        assert!(!result.is_empty());
        assert!(result.kinds[&ObjectKind::Dashboard].is_empty());
        assert_eq!(
            result.kinds[&ObjectKind::Monitor].changes,
            vec![Change::Changed {
                path: "monitors[1].options.thresholds.critical".to_string(),
                local: json!(95),
                remote: json!(90),
            }]
        );
    }

    #[test]
    fn test_added_and_removed_objects() {
        let local = vec![monitors()[0].clone(), obj(json!({"id": 3, "name": "disk"}))];
        let changes = diff_collection(ObjectKind::Monitor, &local, &monitors());

        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], Change::Removed { path, .. } if path == "monitors[3]"));
        assert!(matches!(&changes[1], Change::Added { path, .. } if path == "monitors[2]"));
    }

    #[test]
    fn test_array_length_change() {
        let mut edited = monitors();
        edited[1]["tags"] = json!(["a"]);
        let changes = diff_collection(ObjectKind::Monitor, &edited, &monitors());

        assert_eq!(
            changes,
            vec![Change::Added {
                path: "monitors[2].tags[1]".to_string(),
                value: json!("b"),
            }]
        );
    }

    #[test]
    fn test_removed_field() {
        let mut edited = monitors();
        edited[1].insert("message".to_string(), json!("@pagerduty"));
        let changes = diff_collection(ObjectKind::Monitor, &edited, &monitors());

        assert!(matches!(&changes[..], [Change::Removed { path, .. }] if path == "monitors[2].message"));
    }

    #[test]
    fn test_reordered_objects() {
        let mut swapped = monitors();
        swapped.reverse();
        let changes = diff_collection(ObjectKind::Monitor, &swapped, &monitors());
        assert_eq!(changes, vec![Change::Reordered]);
    }

    #[test]
    fn test_string_and_numeric_ids_pair_up() {
        let local = vec![obj(json!({"id": "1", "name": "cpu"}))];
        let remote = vec![obj(json!({"id": 1, "name": "cpu"}))];
        let changes = diff_collection(ObjectKind::Monitor, &local, &remote);

        // Paired by identity, so only the id field itself differs.
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], Change::Changed { path, .. } if path == "monitors[1].id"));
    }

    #[test]
    fn test_objects_without_id_pair_by_position() {
        let local = vec![obj(json!({"name": "a"}))];
        let remote = vec![obj(json!({"name": "b"}))];
        let changes = diff_collection(ObjectKind::Dashboard, &local, &remote);

        assert_eq!(
            changes,
            vec![Change::Changed {
                path: "dashboards[#0].name".to_string(),
                local: json!("a"),
                remote: json!("b"),
            }]
        );
    }

    #[test]
    fn test_absent_local_diffs_as_empty() {
        let (local, remote) = snapshots(None, monitors());
        let result = diff(&local, &remote);

        let delta = &result.kinds[&ObjectKind::Monitor];
        assert!(delta.local_missing);
        assert_eq!(delta.changes.len(), 2);
        assert!(delta.changes.iter().all(|c| matches!(c, Change::Added { .. })));
    }

    #[test]
    fn test_absent_local_and_empty_remote_is_no_diff() {
        let (local, remote) = snapshots(None, vec![]);
        assert!(diff(&local, &remote).is_empty());
    }

    #[test]
    fn test_diff_does_not_mutate_inputs() {
        let (local, remote) = snapshots(Some(vec![]), monitors());
        let (local_before, remote_before) = (local.clone(), remote.clone());

        let _ = diff(&local, &remote);

        assert_eq!(local, local_before);
        assert_eq!(remote, remote_before);
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let change = Change::Changed {
            path: "monitors[1].name".to_string(),
            local: json!("a"),
            remote: json!("b"),
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["op"], "changed");
        assert_eq!(value["path"], "monitors[1].name");
    }

    #[test]
    fn test_render_value_truncates() {
        let long = json!("x".repeat(200));
        let rendered = render_value(&long);
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.chars().count(), MAX_VALUE_CHARS + 3);
    }
}
