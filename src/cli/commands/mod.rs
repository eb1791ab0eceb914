//! Command implementations.
//!
//! Each command has an `execute` entry point that resolves paths and builds
//! the Datadog client, and a `run` function that does the work against any
//! [`RemoteGateway`] so it can be exercised without the network.

pub mod completions;
pub mod configure;
pub mod diff;
pub mod fetch;
pub mod list;
pub mod save;
pub mod sync;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::Cli;
use crate::config::{resolve_api_host, resolve_config_dir, resolve_credentials, CREDENTIALS_FILE};
use crate::error::{Error, Result};
use crate::model::ObjectKind;
use crate::prompt::Prompter;
use crate::reconcile::{fetch_remote_snapshot, Progress, RemoteSnapshot};
use crate::remote::{DatadogClient, RemoteGateway};

/// Resolve the config directory from `--config-dir` / `DOGHOUSE_DIR` / home.
pub(crate) fn config_dir(cli: &Cli) -> Result<PathBuf> {
    resolve_config_dir(cli.config_dir.as_deref())
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

/// The folder a command works on: the one given, or the config directory.
pub(crate) fn resolve_folder(cli: &Cli, folder: Option<&Path>) -> Result<PathBuf> {
    match folder {
        Some(folder) => Ok(folder.to_path_buf()),
        None => config_dir(cli),
    }
}

/// Build a Datadog client, bootstrapping credentials if none are stored.
pub(crate) fn connect(cli: &Cli, prompter: &mut dyn Prompter) -> Result<DatadogClient> {
    let credentials_path = config_dir(cli)?.join(CREDENTIALS_FILE);
    let credentials = resolve_credentials(
        &credentials_path,
        cli.api_key.as_deref(),
        cli.app_key.as_deref(),
        prompter,
    )?;

    Ok(DatadogClient::new(&resolve_api_host(cli.api_host.as_deref()), credentials)?
        .with_credentials_file(credentials_path))
}

/// Fetch the remote snapshot, drawing a progress bar for detail fetches.
pub(crate) fn fetch_snapshot(
    gateway: &dyn RemoteGateway,
    show_progress: bool,
) -> Result<RemoteSnapshot> {
    let mut bar: Option<(ObjectKind, ProgressBar)> = None;

    let result = fetch_remote_snapshot(gateway, &mut |progress: Progress| {
        if !show_progress {
            return;
        }
        if bar.as_ref().is_none_or(|(kind, _)| *kind != progress.kind) {
            if let Some((_, done)) = bar.take() {
                done.finish_and_clear();
            }
            bar = Some((progress.kind, new_bar(progress.kind, progress.total)));
        }
        if let Some((_, bar)) = &bar {
            bar.set_message(progress.label);
            bar.set_position(u64::try_from(progress.index).unwrap_or(u64::MAX));
        }
    });

    if let Some((_, bar)) = bar {
        bar.finish_and_clear();
    }

    result
}

fn new_bar(kind: ObjectKind, total: usize) -> ProgressBar {
    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    let style = ProgressStyle::with_template(&format!(
        "{} {{bar:30.cyan/blue}} {{pos}}/{{len}} {{wide_msg}}",
        kind.emoji()
    ))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    bar.set_style(style);
    bar
}
