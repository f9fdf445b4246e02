//! Storage linker.
//!
//! Exposes each local storage disk declared in `storage-link.toml` under the
//! application's public directory as a symbolic link, and removes those links
//! again on request.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: load `storage-link.toml` and extract the local disk catalog
//! - **[`resources`]**: the per-disk link primitive and link status inspection
//! - **[`linker`]**: batch reconciliation over a catalog
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod linker;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod prompt;
pub mod resources;
