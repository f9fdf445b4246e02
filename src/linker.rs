//! Symlink reconciliation across a disk catalog.
//!
//! [`Linker`] turns catalog entries into [`DiskLink`]s using the configured
//! [`AppPaths`] and applies them one disk at a time, in catalog order.  A
//! failing disk never stops the rest of a batch, and nothing already linked
//! is rolled back.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::disks::{Catalog, DiskEntry};
use crate::error::LinkError;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::paths::AppPaths;
use crate::resources::{DiskLink, LinkChange, LinkStatus};

/// Options for link creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Delete whatever occupies the link path before linking.
    pub force: bool,
}

/// Result of one link operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Disk the operation was for.
    pub disk_name: String,
    /// Link path the operation targeted.
    pub link_path: PathBuf,
    /// Resolved root the link points to, when one is configured.
    pub target: Option<PathBuf>,
    /// What happened.
    pub result: Result<LinkChange, LinkError>,
}

impl OperationOutcome {
    /// Returns `true` if the link is in place after the operation.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Success/failure counts over a batch of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Operations that succeeded.
    pub succeeded: usize,
    /// Operations that failed.
    pub failed: usize,
}

impl Tally {
    /// Fold `outcomes` into counts.
    #[must_use]
    pub fn of(outcomes: &[OperationOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut tally, outcome| {
            if outcome.succeeded() {
                tally.succeeded += 1;
            } else {
                tally.failed += 1;
            }
            tally
        })
    }
}

/// A symlink removed by [`Linker::remove_all_links`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLink {
    /// Disk name.
    pub disk_name: String,
    /// Link path that was deleted.
    pub link_path: PathBuf,
}

/// Outcome of a removal pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Links deleted, in catalog order.
    pub removed: Vec<RemovedLink>,
    /// Links that were symlinks but could not be deleted.
    pub errors: Vec<LinkError>,
}

impl RemovalReport {
    /// Number of links deleted.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Creates, removes and inspects disk links under the public root.
#[derive(Debug, Clone)]
pub struct Linker {
    paths: AppPaths,
    fs: Arc<dyn FileSystemOps>,
}

impl Linker {
    /// Create a linker backed by the real filesystem.
    #[must_use]
    pub fn new(paths: AppPaths) -> Self {
        Self::with_fs_ops(paths, Arc::new(SystemFileSystemOps))
    }

    /// Create a linker with a custom [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(paths: AppPaths, fs: Arc<dyn FileSystemOps>) -> Self {
        Self { paths, fs }
    }

    /// Path layout in use.
    #[must_use]
    pub const fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Link path for a disk.
    #[must_use]
    pub fn link_path(&self, disk_name: &str) -> PathBuf {
        self.paths.link_path(disk_name)
    }

    /// Build the link description for a disk, resolving a relative root
    /// against the base path.  An empty root counts as none.
    #[must_use]
    pub fn disk_link(&self, disk_name: &str, root: Option<&Path>) -> DiskLink {
        let target = root
            .filter(|r| !r.as_os_str().is_empty())
            .map(|r| self.paths.resolve_root(r));
        DiskLink::new(disk_name.to_string(), target, self.link_path(disk_name))
    }

    /// Link one disk's root into the public directory.
    pub fn create_link(
        &self,
        disk_name: &str,
        root: Option<&Path>,
        options: LinkOptions,
    ) -> OperationOutcome {
        let link = self.disk_link(disk_name, root);
        let result = link.apply(self.fs.as_ref(), options.force);
        OperationOutcome {
            disk_name: link.disk,
            link_path: link.link,
            target: link.target,
            result,
        }
    }

    /// Link every disk in `catalog`, in order, without stopping at failures.
    pub fn create_all_links(
        &self,
        catalog: &Catalog,
        options: LinkOptions,
    ) -> Vec<OperationOutcome> {
        catalog
            .iter()
            .map(|disk| self.create_entry(disk, options))
            .collect()
    }

    /// Link a single disk looked up by name.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::DiskNotFound`] with the valid names, without
    /// touching the filesystem, when `disk_name` is not in `catalog`.
    pub fn create_link_for_named(
        &self,
        disk_name: &str,
        catalog: &Catalog,
        options: LinkOptions,
    ) -> Result<OperationOutcome, LinkError> {
        let disk = catalog
            .get(disk_name)
            .ok_or_else(|| LinkError::DiskNotFound {
                name: disk_name.to_string(),
                available: catalog.names(),
            })?;
        Ok(self.create_entry(disk, options))
    }

    /// Delete every catalog link path that is a symlink.
    ///
    /// Plain files and directories at a link path are left alone, as are
    /// absent paths.
    pub fn remove_all_links(&self, catalog: &Catalog) -> RemovalReport {
        let mut report = RemovalReport::default();
        for disk in catalog {
            let link = self.disk_link(&disk.name, disk.root());
            match link.remove(self.fs.as_ref()) {
                Ok(true) => report.removed.push(RemovedLink {
                    disk_name: link.disk,
                    link_path: link.link,
                }),
                Ok(false) => {}
                Err(e) => report.errors.push(e),
            }
        }
        report
    }

    /// Current status of a link path.
    pub fn inspect(&self, link_path: &Path) -> LinkStatus {
        crate::resources::inspect(self.fs.as_ref(), link_path)
    }

    fn create_entry(&self, disk: &DiskEntry, options: LinkOptions) -> OperationOutcome {
        self.create_link(&disk.name, disk.root(), options)
    }
}
