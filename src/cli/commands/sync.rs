//! Sync command implementation.
//!
//! Pushes local files up to Datadog as updates. Remote objects that have no
//! local counterpart are left alone, and nothing is ever created or deleted.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::commands::{connect, resolve_folder};
use crate::cli::Cli;
use crate::error::Result;
use crate::model::ObjectKind;
use crate::prompt::Prompter;
use crate::reconcile::{push_collection, PushStats};
use crate::remote::RemoteGateway;
use crate::store;

/// Asked before a full sync unless `--yes` is given.
pub const CONFIRM_QUESTION: &str = "Are you sure you wish to sync Datadog config from the files on disk? \
     This will clobber over any changes someone else has made!!";

/// Output for sync command.
#[derive(Debug, Default, Serialize)]
pub struct SyncOutput {
    /// False when the confirmation was declined.
    pub pushed: bool,
    pub kinds: Vec<PushStats>,
}

/// Execute sync command.
///
/// # Errors
///
/// Returns an error for an unknown `-c` config type, a missing or corrupt
/// local file, or a rejected update.
pub fn execute(
    cli: &Cli,
    location: Option<&Path>,
    config: Option<&str>,
    yes: bool,
    prompter: &mut dyn Prompter,
    json: bool,
) -> Result<()> {
    // Validate before touching credentials or the network.
    let single = config.map(ObjectKind::from_plural_key).transpose()?;
    let folder = resolve_folder(cli, location)?;

    let quiet = json || cli.quiet;

    let client = connect(cli, prompter)?;
    let output = match single {
        Some(kind) => run_single(&client, &folder, kind, quiet)?,
        None => run(&client, &folder, yes, prompter, quiet)?,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else if output.pushed {
        println!("✨ All done! ✨");
    } else {
        println!("✨ Not pushing any changes today! ✨");
    }

    Ok(())
}

/// Push one kind's file. The file must exist.
///
/// # Errors
///
/// Returns [`crate::Error::MissingLocalFile`] if the file is absent, or the
/// first failed update.
pub fn run_single(
    gateway: &dyn RemoteGateway,
    folder: &Path,
    kind: ObjectKind,
    quiet: bool,
) -> Result<SyncOutput> {
    let collection = store::read_required(kind, folder)?;

    if !quiet {
        println!("🚀 Pushing {} config to Datadog...", kind.plural_key());
    }
    let stats = push_collection(gateway, kind, &collection, &mut |id| {
        if !quiet {
            println!("  {} {} {id}", "✓".green(), kind.singular());
        }
    })?;

    Ok(SyncOutput {
        pushed: true,
        kinds: vec![stats],
    })
}

/// Push every non-empty local file after confirmation.
///
/// Absent or empty files are skipped. Kinds are pushed in registry order.
///
/// # Errors
///
/// Returns an error if prompting fails, a local file is corrupt, or an
/// update is rejected. Updates already sent stay applied.
pub fn run(
    gateway: &dyn RemoteGateway,
    folder: &Path,
    yes: bool,
    prompter: &mut dyn Prompter,
    quiet: bool,
) -> Result<SyncOutput> {
    if !yes && !prompter.confirm(CONFIRM_QUESTION)? {
        return Ok(SyncOutput::default());
    }

    let local = store::read_all(folder)?;
    let mut output = SyncOutput {
        pushed: true,
        kinds: Vec::new(),
    };

    for (kind, collection) in local {
        let Some(collection) = collection.filter(|c| !c.is_empty()) else {
            if !quiet {
                println!("{}", format!("No {} to push - skipping", kind.plural_key()).dimmed());
            }
            continue;
        };

        if !quiet {
            println!("🚀 Pushing {} {}...", collection.len(), kind.plural_key());
        }
        let stats = push_collection(gateway, kind, &collection, &mut |id| {
            if !quiet {
                println!("  {} {} {id}", "✓".green(), kind.singular());
            }
        })?;
        output.kinds.push(stats);
    }

    Ok(output)
}
