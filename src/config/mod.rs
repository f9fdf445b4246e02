//! Storage configuration loading.
pub mod disks;
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths::{AppPaths, DEFAULT_LINK_PATTERN, LinkNaming};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "storage-link.toml";

/// Default public root, relative to the base path.
pub const DEFAULT_PUBLIC_PATH: &str = "public";

/// On-disk shape of `storage-link.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    base_path: Option<PathBuf>,
    public_path: Option<PathBuf>,
    link_pattern: Option<String>,
    disks: toml::Table,
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `base_path`; relative values resolve against the working directory.
    pub base_path: Option<PathBuf>,
    /// Replaces `public_path`; relative values resolve against the base path.
    pub public_path: Option<PathBuf>,
}

/// Loaded storage configuration.
#[derive(Debug)]
pub struct Config {
    /// File the configuration was read from.
    pub source: PathBuf,
    /// Absolute application base path.
    pub base_path: PathBuf,
    /// Public root, absolute or relative to `base_path`.
    pub public_path: PathBuf,
    /// Link naming rule.
    pub naming: LinkNaming,
    /// Raw `disks` table, in file order.
    pub disks: toml::Table,
}

impl Config {
    /// Load the configuration from `path`, applying `overrides`.
    ///
    /// A relative `base_path` in the file is taken relative to the directory
    /// holding the file; without one, that directory is the base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not valid TOML,
    /// or declares a link pattern without the `{disk}` placeholder.
    pub fn load(path: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml_loader::load_config(path)?;
        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::from_raw(raw, path, config_dir, overrides)
    }

    /// Parse configuration from a string, resolving relative paths against
    /// `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML or the link pattern is
    /// invalid.
    pub fn parse(
        content: &str,
        config_dir: &Path,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let origin = config_dir.join(DEFAULT_CONFIG_FILE);
        let raw: RawConfig = toml_loader::parse_config(content, &origin)?;
        Self::from_raw(raw, &origin, config_dir, overrides)
    }

    fn from_raw(
        raw: RawConfig,
        source: &Path,
        config_dir: &Path,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let base_path = match (&overrides.base_path, raw.base_path) {
            (Some(cli), _) => absolutize(cli),
            (None, Some(file)) => absolutize(&config_dir.join(file)),
            (None, None) => absolutize(config_dir),
        };
        let public_path = overrides
            .public_path
            .clone()
            .or(raw.public_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_PATH));
        let naming =
            LinkNaming::new(raw.link_pattern.as_deref().unwrap_or(DEFAULT_LINK_PATTERN))?;

        Ok(Self {
            source: source.to_path_buf(),
            base_path,
            public_path,
            naming,
            disks: raw.disks,
        })
    }

    /// Path layout handed to the linker.
    #[must_use]
    pub fn app_paths(&self) -> AppPaths {
        AppPaths::new(
            self.base_path.clone(),
            &self.public_path,
            self.naming.clone(),
        )
    }

    /// Local disks declared in this configuration.
    #[must_use]
    pub fn catalog(&self) -> disks::Catalog {
        disks::list_local_disks(&self.disks)
    }
}

/// Make `path` absolute so link targets never depend on the link location,
/// canonicalizing when the path exists.
fn absolutize(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
