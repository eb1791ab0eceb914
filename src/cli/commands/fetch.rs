//! Fetch command implementation.
//!
//! Pulls one remote object into its kind's existing local file, replacing a
//! local copy with the same id in place or appending a new one.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::commands::{connect, resolve_folder};
use crate::cli::Cli;
use crate::error::Result;
use crate::model::ObjectKind;
use crate::prompt::Prompter;
use crate::reconcile::{contains_id, merge_object, MergeOutcome, OnConflict};
use crate::remote::RemoteGateway;
use crate::store;

/// How to treat an existing local copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Overwrite without asking.
    pub overwrite: bool,
    /// Declining the overwrite removes the existing copy too.
    pub drop_on_decline: bool,
}

/// Output for fetch command.
#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub kind: ObjectKind,
    pub id: String,
    pub outcome: MergeOutcome,
    pub path: String,
}

/// Execute fetch command.
///
/// # Errors
///
/// Returns an error for an unknown kind, a missing or corrupt local file, or
/// a failed remote fetch.
pub fn execute(
    cli: &Cli,
    kind: &str,
    id: &str,
    folder: Option<&Path>,
    options: FetchOptions,
    prompter: &mut dyn Prompter,
    json: bool,
) -> Result<()> {
    let kind: ObjectKind = kind.parse()?;
    let folder = resolve_folder(cli, folder)?;
    // Fail on a missing file before asking for credentials.
    store::read_required(kind, &folder)?;

    let client = connect(cli, prompter)?;
    let output = run(&client, kind, id, &folder, options, prompter)?;

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let message = match output.outcome {
        MergeOutcome::Appended => format!("Added {kind} {id} to {}", output.path),
        MergeOutcome::Overwritten => format!("Updated {kind} {id} in {}", output.path),
        MergeOutcome::Kept => format!("Kept the existing local copy of {kind} {id}"),
        MergeOutcome::Dropped => format!("Removed {kind} {id} from {}", output.path),
    };
    println!("{} {message}", kind.emoji());

    Ok(())
}

/// Fetch `id` and merge it into the local file of `kind`.
///
/// If the id is already present and `overwrite` isn't set, the prompter is
/// asked; declining keeps the local copy unless `drop_on_decline` is set.
/// The file is left untouched when nothing changes.
///
/// # Errors
///
/// Returns [`crate::Error::MissingLocalFile`] if the kind's file doesn't
/// exist, or the gateway/prompt/write error.
pub fn run(
    gateway: &dyn RemoteGateway,
    kind: ObjectKind,
    id: &str,
    folder: &Path,
    options: FetchOptions,
    prompter: &mut dyn Prompter,
) -> Result<FetchOutput> {
    let existing = store::read_required(kind, folder)?;
    let object = gateway.get(kind, id)?;

    let on_conflict = if !contains_id(&existing, &object) || options.overwrite {
        OnConflict::Overwrite
    } else if prompter.confirm(&format!(
        "{kind} {id} already exists in {}. Overwrite it?",
        kind.file_name()
    ))? {
        OnConflict::Overwrite
    } else if options.drop_on_decline {
        OnConflict::DropExisting
    } else {
        OnConflict::Keep
    };

    let (merged, outcome) = merge_object(&existing, &object, on_conflict);
    let path = if outcome == MergeOutcome::Kept {
        store::kind_path(kind, folder)
    } else {
        store::write(kind, folder, &merged)?
    };
    info!(kind = %kind, id, outcome = ?outcome, "Merged remote object");

    Ok(FetchOutput {
        kind,
        id: id.to_string(),
        outcome,
        path: path.display().to_string(),
    })
}
