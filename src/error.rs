//! Error types for the Doghouse CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=credentials, 3=usage, 4=local files, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Doghouse operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Credentials (exit 2)
    Forbidden,
    ConfigError,

    // Usage (exit 3)
    UnknownKind,
    InvalidArgument,

    // Local files (exit 4)
    CorruptLocalFile,
    MissingLocalFile,

    // Remote (exit 5)
    RemoteError,
    HttpError,

    // I/O (exit 6)
    IoError,
    JsonError,
    YamlError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::ConfigError => "CONFIG_ERROR",
            Self::UnknownKind => "UNKNOWN_KIND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::CorruptLocalFile => "CORRUPT_LOCAL_FILE",
            Self::MissingLocalFile => "MISSING_LOCAL_FILE",
            Self::RemoteError => "REMOTE_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::Forbidden | Self::ConfigError => 2,
            Self::UnknownKind | Self::InvalidArgument => 3,
            Self::CorruptLocalFile | Self::MissingLocalFile => 4,
            Self::RemoteError | Self::HttpError => 5,
            Self::IoError | Self::JsonError | Self::YamlError => 6,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Doghouse operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Forbidden: Datadog rejected the API/APP key pair")]
    Forbidden {
        /// Credential file the rejected keys came from, when known.
        credentials: Option<PathBuf>,
    },

    #[error("Unknown config type: {name}")]
    UnknownKind { name: String, valid: Vec<String> },

    #[error("Corrupt local file {}: {message}", path.display())]
    CorruptLocalFile { path: PathBuf, message: String },

    #[error("Missing local file: {}", path.display())]
    MissingLocalFile { path: PathBuf },

    #[error("Datadog API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::UnknownKind { .. } => ErrorCode::UnknownKind,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::CorruptLocalFile { .. } => ErrorCode::CorruptLocalFile,
            Self::MissingLocalFile { .. } => ErrorCode::MissingLocalFile,
            Self::Remote { .. } => ErrorCode::RemoteError,
            Self::Http(_) => ErrorCode::HttpError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Yaml(_) => ErrorCode::YamlError,
            Self::Prompt(_) | Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Forbidden { credentials } => {
                let location = credentials
                    .clone()
                    .or_else(crate::config::credentials_path)
                    .map_or_else(
                        || "~/.doghouse/config.yml".to_string(),
                        |p| p.display().to_string(),
                    );
                Some(format!(
                    "Check the api_key/app_key in {location}, or run `doghouse configure`"
                ))
            }

            Self::UnknownKind { valid, .. } => {
                Some(format!("Valid config types: {}", valid.join(", ")))
            }

            Self::MissingLocalFile { .. } => {
                Some("Run `doghouse save` first to pull the remote config".to_string())
            }

            Self::CorruptLocalFile { .. } => Some(
                "The file must hold a JSON array of objects. Fix it by hand or re-run `doghouse save`"
                    .to_string(),
            ),

            Self::Config(_) | Self::Yaml(_) => {
                Some("Run `doghouse configure` to rewrite the credential file".to_string())
            }

            Self::Remote { .. }
            | Self::Http(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Prompt(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
