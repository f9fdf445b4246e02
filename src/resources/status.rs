//! Link status classification for display.
use std::fmt;
use std::path::Path;

use crate::operations::FileSystemOps;

/// Observed state of a link path.
///
/// Computed from the live filesystem each time; only used to annotate the
/// interactive table, never to decide whether to create or remove a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Nothing exists at the path.
    Absent,
    /// A symlink whose target exists.
    Linked,
    /// A symlink whose target does not exist.
    Broken,
    /// A regular file or directory that is not a symlink.
    Occupied,
}

impl LinkStatus {
    /// Human-readable label for tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Absent => "Not linked",
            Self::Linked => "Linked",
            Self::Broken => "Broken link",
            Self::Occupied => "File exists (not symlink)",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `link` from the current filesystem state.
///
/// Relative link targets are resolved against the link's parent directory,
/// the way the OS resolves them.
pub fn inspect(fs: &dyn FileSystemOps, link: &Path) -> LinkStatus {
    if !fs.entry_exists(link) {
        return LinkStatus::Absent;
    }
    if !fs.is_symlink(link) {
        return LinkStatus::Occupied;
    }
    let resolved = match fs.read_link(link) {
        Ok(target) if target.is_relative() => link
            .parent()
            .map_or_else(|| target.clone(), |dir| dir.join(&target)),
        Ok(target) => target,
        Err(_) => return LinkStatus::Broken,
    };
    if fs.exists(&resolved) {
        LinkStatus::Linked
    } else {
        LinkStatus::Broken
    }
}
