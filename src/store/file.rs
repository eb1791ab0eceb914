//! Atomic file operations for the local config folder.
//!
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - `.gitignore` bootstrap for the config folder

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.json.tmp` extension)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Generate .gitignore content for a Doghouse config folder.
///
/// Whitelist pattern: the folder doubles as the credential location, so
/// everything is ignored except the exported JSON files.
#[must_use]
pub fn gitignore_content() -> &'static str {
    r"# Doghouse config folder
# Whitelist pattern: ignore everything except exported JSON config

# Ignore everything by default (config.yml holds API keys)
*

# Allow .gitignore itself
!.gitignore

# Allow exported monitors/dashboards
!*.json
"
}

/// Ensure .gitignore exists in the config folder.
///
/// If the file already exists it is not modified.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn ensure_gitignore(dir: &Path) -> Result<()> {
    let gitignore_path = dir.join(".gitignore");

    if gitignore_path.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)?;

    let mut file = File::create(&gitignore_path)?;
    file.write_all(gitignore_content().as_bytes())?;
    file.sync_all()?;

    Ok(())
}
