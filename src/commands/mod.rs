//! Top-level subcommand orchestration.
pub mod link;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::config::disks::Catalog;
use crate::config::{Config, DEFAULT_CONFIG_FILE, Overrides};
use crate::linker::Linker;
use crate::logging::Logger;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates configuration loading, catalog extraction and linker
/// construction so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
    /// Local disks, in configuration order.
    pub catalog: Catalog,
    /// Linker bound to the configured paths.
    pub linker: Linker,
}

impl CommandSetup {
    /// Load the configuration named by `global` and build the linker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is missing or invalid.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let path = global
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let overrides = Overrides {
            base_path: global.base_path.clone(),
            public_path: global.public_path.clone(),
        };

        log.stage("Loading configuration");
        let config = Config::load(path, &overrides)
            .with_context(|| format!("loading {}", path.display()))?;
        log.debug(&format!("config: {}", config.source.display()));
        log.debug(&format!("link pattern: {}", config.naming.pattern()));

        let catalog = config.catalog();
        let linker = Linker::new(config.app_paths());
        log.debug(&format!("base path: {}", linker.paths().base().display()));
        log.info(&format!(
            "{} local disk(s), public root {}",
            catalog.len(),
            linker.paths().public().display()
        ));

        Ok(Self {
            config,
            catalog,
            linker,
        })
    }
}
