//! Disk catalog: the local disks declared in the storage configuration.
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Driver tag that marks a disk as backed by the local filesystem.
pub const LOCAL_DRIVER: &str = "local";

/// A named local disk and its configured root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskEntry {
    /// Disk name, unique within a catalog.
    pub name: String,
    /// Configured root, as written in the config (may be relative).
    pub root: Option<PathBuf>,
    /// Whether the disk uses the local driver.
    pub is_local: bool,
}

impl DiskEntry {
    /// Configured root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// Per-disk settings the catalog cares about; other keys are ignored.
#[derive(Debug, Deserialize)]
struct DiskSettings {
    driver: String,
    #[serde(default)]
    root: Option<String>,
}

/// Ordered collection of local disks, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<DiskEntry>,
}

impl Catalog {
    /// Returns `true` if the catalog holds no disks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of disks in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate the disks in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, DiskEntry> {
        self.entries.iter()
    }

    /// Look a disk up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DiskEntry> {
        self.entries.iter().find(|d| d.name == name)
    }

    /// Disk names in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.name.clone()).collect()
    }
}

impl FromIterator<DiskEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = DiskEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a DiskEntry;
    type IntoIter = std::slice::Iter<'a, DiskEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Filter the `disks` table down to local disks, preserving table order.
///
/// Entries that are not tables, lack a string `driver`, or carry a
/// non-string `root` are skipped rather than reported.  An empty `root`
/// string counts as no root.  Never touches the filesystem.
#[must_use]
pub fn list_local_disks(disks: &toml::Table) -> Catalog {
    disks
        .iter()
        .filter_map(|(name, value)| {
            let settings: DiskSettings = value.clone().try_into().ok()?;
            if settings.driver != LOCAL_DRIVER {
                return None;
            }
            Some(DiskEntry {
                name: name.clone(),
                root: settings
                    .root
                    .filter(|r| !r.is_empty())
                    .map(PathBuf::from),
                is_local: true,
            })
        })
        .collect()
}
