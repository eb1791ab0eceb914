//! Diff command implementation.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::commands::{connect, fetch_snapshot, resolve_folder};
use crate::cli::Cli;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::reconcile::{diff, print_diff, DiffResult};
use crate::remote::RemoteGateway;
use crate::store;

/// Output for diff command.
#[derive(Serialize)]
struct DiffOutput<'a> {
    folder: String,
    identical: bool,
    change_count: usize,
    diff: &'a DiffResult,
}

/// Execute diff command.
///
/// # Errors
///
/// Returns an error if the remote fetch fails or a local file is corrupt.
pub fn execute(
    cli: &Cli,
    folder: Option<&Path>,
    prompter: &mut dyn Prompter,
    json: bool,
) -> Result<()> {
    let folder = resolve_folder(cli, folder)?;

    if !json {
        println!("🐶 Generating diff of Datadog config from {} -> remote...", folder.display());
    }

    let client = connect(cli, prompter)?;
    let result = run(&client, &folder, !json && !cli.quiet)?;

    if json {
        let output = DiffOutput {
            folder: folder.display().to_string(),
            identical: result.is_empty(),
            change_count: result.change_count(),
            diff: &result,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if result.is_empty() {
        println!("No difference - nothing to do!");
    } else {
        print_diff(&result);
        let count = result.change_count();
        println!(
            "{}",
            format!("{count} difference{} between local and remote", if count == 1 { "" } else { "s" })
                .yellow()
        );
    }

    Ok(())
}

/// Fetch the remote state and diff it against the local files in `folder`.
///
/// # Errors
///
/// Returns an error if the fetch fails or a local file can't be parsed.
pub fn run(gateway: &dyn RemoteGateway, folder: &Path, show_progress: bool) -> Result<DiffResult> {
    let local = store::read_all(folder)?;
    let remote = fetch_snapshot(gateway, show_progress)?;

    Ok(diff(&local, &remote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{ConfigObject, ObjectKind};
    use crate::remote::fake::FakeGateway;
    use crate::reconcile::Change;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn obj(value: Value) -> ConfigObject {
        value.as_object().cloned().unwrap()
    }

    fn monitors() -> Vec<ConfigObject> {
        vec![obj(json!({"id": 1, "name": "cpu", "query": "avg:cpu > 90"}))]
    }

    #[test]
    fn test_identical_folder_has_no_diff() {
        let temp = TempDir::new().unwrap();
        store::write(ObjectKind::Monitor, temp.path(), &monitors()).unwrap();
        store::write(ObjectKind::Dashboard, temp.path(), &[]).unwrap();

        let gateway = FakeGateway::new().with_objects(ObjectKind::Monitor, monitors());
        let result = run(&gateway, temp.path(), false).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_remote_edit_shows_up() {
        let temp = TempDir::new().unwrap();
        store::write(ObjectKind::Monitor, temp.path(), &monitors()).unwrap();
        store::write(ObjectKind::Dashboard, temp.path(), &[]).unwrap();

        let remote = vec![obj(json!({"id": 1, "name": "cpu", "query": "avg:cpu > 95"}))];
        let gateway = FakeGateway::new().with_objects(ObjectKind::Monitor, remote);
        let result = run(&gateway, temp.path(), false).unwrap();

        assert_eq!(result.change_count(), 1);
        assert!(matches!(
            &result.kinds[&ObjectKind::Monitor].changes[0],
            Change::Changed { path, .. } if path.ends_with(".query")
        ));
    }

    #[test]
    fn test_missing_local_file_diffs_as_empty() {
        let temp = TempDir::new().unwrap();
        store::write(ObjectKind::Dashboard, temp.path(), &[]).unwrap();

        let gateway = FakeGateway::new().with_objects(ObjectKind::Monitor, monitors());
        let result = run(&gateway, temp.path(), false).unwrap();

        let delta = &result.kinds[&ObjectKind::Monitor];
        assert!(delta.local_missing);
        assert!(matches!(delta.changes[0], Change::Added { .. }));
    }

    #[test]
    fn test_corrupt_local_file_aborts_before_fetch() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("monitors.json"), "{not json").unwrap();

        let gateway = FakeGateway::new();
        let err = run(&gateway, temp.path(), false).unwrap_err();

        assert!(matches!(err, Error::CorruptLocalFile { .. }));
        assert!(gateway.calls().is_empty());
    }
}
