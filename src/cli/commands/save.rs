//! Save command implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::commands::{config_dir, connect, fetch_snapshot, resolve_folder};
use crate::cli::{Cli, StorageLocation};
use crate::error::Result;
use crate::model::ObjectKind;
use crate::prompt::Prompter;
use crate::remote::RemoteGateway;
use crate::store;

/// Output for save command.
#[derive(Debug, Serialize)]
pub struct SaveOutput {
    pub folder: String,
    pub files: Vec<String>,
    pub counts: BTreeMap<ObjectKind, usize>,
}

/// Execute save command.
///
/// # Errors
///
/// Returns an error if the remote fetch or any file write fails.
pub fn execute(
    cli: &Cli,
    folder: Option<&Path>,
    location: StorageLocation,
    prompter: &mut dyn Prompter,
    json: bool,
) -> Result<()> {
    if location == StorageLocation::S3 {
        if json {
            let output = serde_json::json!({
                "success": false,
                "location": location.to_string(),
                "message": "Saving all config to S3 is not yet supported",
            });
            println!("{output}");
        } else {
            println!("Saving all config to S3 is not yet supported! :(");
        }
        return Ok(());
    }

    let folder = resolve_folder(cli, folder)?;
    // The config directory also holds the credentials; keep them out of git.
    let protect = folder == config_dir(cli)?;

    if !json {
        println!("🐶 Saving Datadog config to {}... (this might take a while)", folder.display());
    }

    let client = connect(cli, prompter)?;
    let output = run(&client, &folder, protect, !json && !cli.quiet)?;

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("💾 Saved configs to {}:", output.folder);
        for file in &output.files {
            println!("  - {file}");
        }
        println!("✨ All done! ✨");
    }

    Ok(())
}

/// Fetch the full remote state and write one file per kind into `folder`.
///
/// With `protect` set, a `.gitignore` that only admits `*.json` files is
/// written alongside.
///
/// # Errors
///
/// Returns the first fetch or write failure. Nothing is written if the fetch fails.
pub fn run(
    gateway: &dyn RemoteGateway,
    folder: &Path,
    protect: bool,
    show_progress: bool,
) -> Result<SaveOutput> {
    let snapshot = fetch_snapshot(gateway, show_progress)?;

    if protect {
        store::ensure_gitignore(folder)?;
    }
    let paths: Vec<PathBuf> = store::write_all(folder, &snapshot)?;
    info!(folder = %folder.display(), files = paths.len(), "Saved remote config");

    Ok(SaveOutput {
        folder: folder.display().to_string(),
        files: paths.iter().map(|p| p.display().to_string()).collect(),
        counts: snapshot.iter().map(|(kind, c)| (*kind, c.len())).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigObject;
    use crate::remote::fake::FakeGateway;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn obj(value: Value) -> ConfigObject {
        value.as_object().cloned().unwrap()
    }

    fn gateway() -> FakeGateway {
        FakeGateway::new()
            .with_objects(
                ObjectKind::Monitor,
                vec![obj(json!({"id": 1, "name": "cpu", "query": "avg:cpu > 90"}))],
            )
            .with_objects(
                ObjectKind::Dashboard,
                vec![obj(json!({"id": "abc", "title": "Overview", "widgets": []}))],
            )
    }

    #[test]
    fn test_save_writes_full_objects() {
        let temp = TempDir::new().unwrap();
        let output = run(&gateway(), temp.path(), false, false).unwrap();

        assert_eq!(output.files.len(), 2);
        assert_eq!(output.counts[&ObjectKind::Monitor], 1);

        let dashboards = store::read_required(ObjectKind::Dashboard, temp.path()).unwrap();
        // Full definition, not the list summary
        assert_eq!(dashboards[0]["widgets"], json!([]));
        assert!(!temp.path().join(".gitignore").exists());
    }

    #[test]
    fn test_save_into_config_dir_writes_gitignore() {
        let temp = TempDir::new().unwrap();
        run(&gateway(), temp.path(), true, false).unwrap();

        let gitignore = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains("!*.json"));
    }

    #[test]
    fn test_failed_fetch_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let gateway = gateway().failing_get("abc");

        assert!(run(&gateway, temp.path(), true, false).is_err());
        assert!(!temp.path().join(ObjectKind::Monitor.file_name()).exists());
    }
}
