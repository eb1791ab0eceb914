//! Doghouse - Datadog monitors and dashboards as code
//!
//! This crate provides the core functionality for the `doghouse` CLI tool:
//! export remote config to JSON files, diff them against the live state,
//! and push local edits back.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Object kind registry and JSON object types
//! - [`store`] - Local JSON files, one per kind
//! - [`remote`] - Datadog HTTP gateway
//! - [`reconcile`] - Remote snapshot, diff, merge and push
//! - [`config`] - Config directory, API host and credentials
//! - [`prompt`] - Interactive confirmations and input
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod reconcile;
pub mod remote;
pub mod store;

pub use error::{Error, Result};
