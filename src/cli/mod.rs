//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Doghouse - Datadog monitors and dashboards as code
#[derive(Parser, Debug)]
#[command(name = "doghouse", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory holding config.yml and the default export (default: ~/.doghouse)
    #[arg(long, global = true, env = "DOGHOUSE_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Datadog API host (default: https://api.datadoghq.com)
    #[arg(long, global = true, env = "DATADOG_HOST")]
    pub api_host: Option<String>,

    /// Datadog API key (overrides config.yml)
    #[arg(long, global = true, env = "DD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Datadog application key (overrides config.yml)
    #[arg(long, global = true, env = "DD_APP_KEY", hide_env_values = true)]
    pub app_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no logging, errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save all remote monitors and dashboards to local files
    Save {
        /// Folder to write to (default: the config directory)
        folder: Option<PathBuf>,

        /// Where to store the config
        #[arg(short, long, value_enum, default_value_t)]
        location: StorageLocation,
    },

    /// Show differences between local files and Datadog
    Diff {
        /// Folder holding the local config (default: the config directory)
        folder: Option<PathBuf>,
    },

    /// Push local files up to Datadog
    Sync {
        /// Folder holding the local config (default: the config directory)
        location: Option<PathBuf>,

        /// Sync a single config file up to Datadog (e.g. monitors)
        #[arg(short = 'c', long = "config")]
        config: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create the credential file
    Configure,

    /// List remote objects of one type
    List {
        /// Config type to list (monitors, dashboards)
        config_type: String,
    },

    /// Save a single remote object into its local file
    Fetch {
        /// Object type (monitor, dashboard)
        kind: String,

        /// Remote id of the object
        id: String,

        /// Folder holding the local config (default: the config directory)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Overwrite an existing local copy without asking
        #[arg(long)]
        overwrite: bool,

        /// When the overwrite is declined, remove the existing local copy
        #[arg(long, conflicts_with = "overwrite")]
        drop_on_decline: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where `save` writes to.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageLocation {
    /// Local files (commit them with git)
    #[default]
    #[value(alias = "git")]
    Disk,
    /// Amazon S3 (not supported yet)
    S3,
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disk => write!(f, "disk"),
            Self::S3 => write!(f, "s3"),
        }
    }
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_short_config_flag() {
        let cli = Cli::try_parse_from(["doghouse", "sync", "-c", "monitors", "./config"]).unwrap();
        match cli.command {
            Commands::Sync { location, config, yes } => {
                assert_eq!(location, Some(PathBuf::from("./config")));
                assert_eq!(config.as_deref(), Some("monitors"));
                assert!(!yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_save_location_defaults_to_disk() {
        let cli = Cli::try_parse_from(["doghouse", "save"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Save { folder: None, location: StorageLocation::Disk }
        ));

        let cli = Cli::try_parse_from(["doghouse", "save", "--location", "git"]).unwrap();
        assert!(matches!(cli.command, Commands::Save { location: StorageLocation::Disk, .. }));
    }

    #[test]
    fn test_configure_takes_key_flags() {
        let cli = Cli::try_parse_from([
            "doghouse",
            "configure",
            "--api-key",
            "abc",
            "--app-key",
            "def",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Configure));
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.app_key.as_deref(), Some("def"));
    }

    #[test]
    fn test_fetch_overwrite_conflicts_with_drop() {
        let result = Cli::try_parse_from([
            "doghouse",
            "fetch",
            "dashboard",
            "abc",
            "--overwrite",
            "--drop-on-decline",
        ]);
        assert!(result.is_err());
    }
}
