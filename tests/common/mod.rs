// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed application tree and a fluent builder
// so each integration test can declare disks and roots without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use storage_linker::config::{Config, Overrides};
use storage_linker::linker::Linker;
use storage_linker::logging::Logger;

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
static CACHE_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// An isolated application tree backed by a [`tempfile::TempDir`].
///
/// Holds `storage-link.toml` at its root; the directory is deleted on drop.
pub struct IntegrationTestContext {
    /// Temporary application base directory.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Application base path.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of the generated config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("storage-link.toml")
    }

    /// Load the generated configuration without overrides.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_path(), &Overrides::default()).expect("load config")
    }

    /// Linker over the real filesystem for the generated configuration.
    pub fn linker(&self) -> Linker {
        Linker::new(self.load_config().app_paths())
    }

    /// Link path of `disk` under the configured layout.
    pub fn link_path(&self, disk: &str) -> PathBuf {
        self.linker().link_path(disk)
    }

    /// Logger whose cache directory lives inside this context's tempdir, so
    /// tests never create `~/.cache/storage-linker`.
    pub fn logger(&self) -> Logger {
        let cache = self.root.path().join(".cache");
        let _lock = CACHE_ENV_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::var_os("XDG_CACHE_HOME");
        // SAFETY: Protected by CACHE_ENV_MUTEX; restored before the lock is released.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", &cache);
        }
        let log = Logger::new("link");
        // SAFETY: Protected by CACHE_ENV_MUTEX.
        #[allow(unsafe_code)]
        unsafe {
            match previous {
                Some(value) => std::env::set_var("XDG_CACHE_HOME", value),
                None => std::env::remove_var("XDG_CACHE_HOME"),
            }
        }
        log
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    root: tempfile::TempDir,
    settings: String,
    toml: String,
}

impl TestContextBuilder {
    /// Begin building an empty application tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
            settings: String::new(),
            toml: String::new(),
        }
    }

    /// Set a top-level string key such as `public_path` or `link_pattern`.
    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        writeln!(self.settings, "{key} = \"{value}\"").expect("write toml");
        self
    }

    /// Declare a local disk whose root directory exists.
    pub fn with_local_disk(self, name: &str, root: &str) -> Self {
        std::fs::create_dir_all(self.root.path().join(root)).expect("create disk root");
        self.with_disk(name, "local", Some(root))
    }

    /// Declare a disk with any driver, without creating its root.
    ///
    /// `name` is written as a TOML key, so quote it for unusual names.
    pub fn with_disk(mut self, name: &str, driver: &str, root: Option<&str>) -> Self {
        writeln!(self.toml, "[disks.{name}]\ndriver = \"{driver}\"").expect("write toml");
        if let Some(root) = root {
            writeln!(self.toml, "root = \"{root}\"").expect("write toml");
        }
        self.toml.push('\n');
        self
    }

    /// Write the config file and return the context.
    pub fn build(self) -> IntegrationTestContext {
        let content = format!("{}\n{}", self.settings, self.toml);
        std::fs::write(self.root.path().join("storage-link.toml"), content)
            .expect("write storage-link.toml");
        IntegrationTestContext { root: self.root }
    }
}
