//! Configure command implementation.

use crate::cli::commands::config_dir;
use crate::cli::Cli;
use crate::config::{bootstrap_credentials, CREDENTIALS_FILE};
use crate::error::Result;
use crate::prompt::Prompter;

/// Execute configure command.
///
/// Writes `config.yml`, prompting for any key not given on the command line.
/// An existing file is replaced.
///
/// # Errors
///
/// Returns an error if prompting fails, a key is empty, or the file can't be written.
pub fn execute(cli: &Cli, prompter: &mut dyn Prompter, json: bool) -> Result<()> {
    let path = config_dir(cli)?.join(CREDENTIALS_FILE);

    bootstrap_credentials(&path, cli.api_key.as_deref(), cli.app_key.as_deref(), prompter)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "path": path.display().to_string(),
        });
        println!("{output}");
    } else {
        println!("💾 Saved credentials to {}", path.display());
    }

    Ok(())
}
