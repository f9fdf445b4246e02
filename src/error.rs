//! Domain-specific error types for the storage linker.
//!
//! Library modules return typed errors ([`ConfigError`], [`LinkError`]) while
//! command handlers at the CLI boundary convert them to [`anyhow::Error`] via
//! the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError   : config file lookup, TOML parsing, link pattern validation
//! LinkError     : per-disk link failures and catalog-level conditions
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading the storage configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// The file contains invalid TOML or a value of the wrong type.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The link naming pattern lacks the `{disk}` placeholder.
    #[error("Invalid link pattern '{0}': must contain the {{disk}} placeholder")]
    InvalidPattern(String),

    /// The link pattern is absolute or climbs out with `..`.
    #[error("Invalid link pattern '{0}': must stay below the public directory")]
    PatternEscapesPublic(String),
}

/// Failures of a single link operation, plus the catalog-level conditions
/// the command harness reports.
///
/// Every variant is recoverable at disk granularity: one disk failing never
/// stops the remaining disks of a batch from being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The disk has no (or an empty) `root` entry.
    #[error("No root path configured for disk '{disk}'")]
    NoRootConfigured {
        /// Disk name.
        disk: String,
    },

    /// The disk name is empty or is not a single path component.
    #[error("Invalid disk name '{disk}': must be a single path component")]
    InvalidDiskName {
        /// Disk name as configured.
        disk: String,
    },

    /// The resolved root path does not exist.
    #[error("Target path does not exist: {}", .target.display())]
    TargetMissing {
        /// Disk name.
        disk: String,
        /// Resolved root path that was looked up.
        target: PathBuf,
    },

    /// Something already occupies the link path and `--force` was not given.
    #[error("Symlink already exists for '{disk}': {}", .link.display())]
    AlreadyExists {
        /// Disk name.
        disk: String,
        /// Occupied link path.
        link: PathBuf,
    },

    /// Deleting the old entry or creating the link failed.
    #[error("Failed to create symlink for '{disk}': {message}")]
    Filesystem {
        /// Disk name.
        disk: String,
        /// Underlying OS error message.
        message: String,
    },

    /// The requested disk is not a local disk in the catalog.
    #[error("Disk '{name}' not found. Available local disks: {}", .available.join(", "))]
    DiskNotFound {
        /// Requested name.
        name: String,
        /// Names present in the catalog, in catalog order.
        available: Vec<String>,
    },

    /// The configuration declares no local disks.
    #[error("No local disks found in your filesystem configuration")]
    EmptyCatalog,
}

impl LinkError {
    /// Short machine-friendly name of the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDiskName { .. } => "invalid disk name",
            Self::NoRootConfigured { .. } => "no root configured",
            Self::TargetMissing { .. } => "target missing",
            Self::AlreadyExists { .. } => "already exists",
            Self::Filesystem { .. } => "filesystem error",
            Self::DiskNotFound { .. } => "disk not found",
            Self::EmptyCatalog => "empty catalog",
        }
    }
}
