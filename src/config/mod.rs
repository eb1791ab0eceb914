//! Configuration management.
//!
//! This module resolves the Doghouse config directory, the Datadog API host,
//! and the API/APP key pair.
//!
//! # Layout
//!
//! Everything lives under a single per-user directory, `~/.doghouse/`:
//! - `config.yml`: credentials (`api_key`, `app_key`)
//! - `monitors.json`, `dashboards.json`: the default export folder

use crate::error::{Error, Result};
use crate::prompt::Prompter;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Credential file name inside the config directory.
pub const CREDENTIALS_FILE: &str = "config.yml";

/// Datadog API host used when `DATADOG_HOST` is unset.
pub const DEFAULT_API_HOST: &str = "https://api.datadoghq.com";

/// Get the global Doghouse directory location (`~/.doghouse/`).
#[must_use]
pub fn global_doghouse_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".doghouse"))
}

/// Resolve the config directory.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `DOGHOUSE_DIR` environment variable
/// 3. Global location: `~/.doghouse/`
#[must_use]
pub fn resolve_config_dir(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(dir) = std::env::var("DOGHOUSE_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    global_doghouse_dir()
}

/// Path of the credential file in the resolved config directory.
#[must_use]
pub fn credentials_path() -> Option<PathBuf> {
    resolve_config_dir(None).map(|dir| dir.join(CREDENTIALS_FILE))
}

/// Resolve the Datadog API host.
///
/// Priority: explicit value > `DATADOG_HOST` > [`DEFAULT_API_HOST`].
/// Trailing slashes are trimmed.
#[must_use]
pub fn resolve_api_host(explicit: Option<&str>) -> String {
    let host = explicit
        .map(ToString::to_string)
        .or_else(|| std::env::var("DATADOG_HOST").ok())
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

    host.trim().trim_end_matches('/').to_string()
}

/// Datadog API/APP key pair, as stored in `config.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
}

/// Load credentials from `path`.
///
/// Returns `Ok(None)` if the file doesn't exist or is empty.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file can't be read or isn't valid YAML
/// with both keys.
pub fn load_credentials(path: &Path) -> Result<Option<Credentials>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {e}", path.display()))
    })?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
}

/// Write credentials to `path`, creating the parent directory.
///
/// # Errors
///
/// Returns an error if the directory or file can't be written.
pub fn save_credentials(path: &Path, credentials: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Config(format!("Failed to create config directory: {e}"))
        })?;
    }

    let content = serde_yaml::to_string(credentials)?;
    fs::write(path, content).map_err(|e| {
        Error::Config(format!("Failed to write {}: {e}", path.display()))
    })?;

    debug!(path = %path.display(), "Wrote credentials");
    Ok(())
}

/// Create the credential file, prompting for whichever key wasn't given.
///
/// # Errors
///
/// Returns an error if prompting or writing fails, or if a key ends up empty.
pub fn bootstrap_credentials(
    path: &Path,
    api_key: Option<&str>,
    app_key: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<Credentials> {
    let api_key = match api_key {
        Some(key) => key.to_string(),
        None => prompter.input("Please enter your API Key")?,
    };
    let app_key = match app_key {
        Some(key) => key.to_string(),
        None => prompter.input("Please enter your APP Key")?,
    };

    if api_key.trim().is_empty() || app_key.trim().is_empty() {
        return Err(Error::Config("API and APP keys must not be empty".to_string()));
    }

    let credentials = Credentials { api_key, app_key };
    save_credentials(path, &credentials)?;
    info!(path = %path.display(), "Created credential file");

    Ok(credentials)
}

/// Resolve the credentials to use for API calls.
///
/// Priority:
/// 1. Both keys given explicitly (flags or `DD_API_KEY`/`DD_APP_KEY`)
/// 2. The credential file, with any explicit key taking precedence
/// 3. Interactive bootstrap, which also writes the credential file
///
/// # Errors
///
/// Returns an error if the credential file is unreadable or bootstrap fails.
pub fn resolve_credentials(
    path: &Path,
    api_key: Option<&str>,
    app_key: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<Credentials> {
    if let (Some(api_key), Some(app_key)) = (api_key, app_key) {
        return Ok(Credentials {
            api_key: api_key.to_string(),
            app_key: app_key.to_string(),
        });
    }

    match load_credentials(path)? {
        Some(stored) => Ok(Credentials {
            api_key: api_key.map_or(stored.api_key, ToString::to_string),
            app_key: app_key.map_or(stored.app_key, ToString::to_string),
        }),
        None => bootstrap_credentials(path, api_key, app_key, prompter),
    }
}
