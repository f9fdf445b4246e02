//! Application path layout: base path, public root, and link naming.
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Placeholder replaced by the disk name in a link pattern.
pub const DISK_PLACEHOLDER: &str = "{disk}";

/// Default link location, relative to the public root.
pub const DEFAULT_LINK_PATTERN: &str = "storage/{disk}";

/// Rule that maps a disk name to its link path below the public root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use storage_linker::paths::LinkNaming;
///
/// let naming = LinkNaming::new("media/{disk}").unwrap();
/// assert_eq!(
///     naming.link_path(Path::new("/app/public"), "avatars"),
///     Path::new("/app/public/media/avatars"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNaming {
    pattern: String,
}

impl LinkNaming {
    /// Build a naming rule from a pattern containing [`DISK_PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when the placeholder is absent,
    /// since every disk would then map onto the same path, and
    /// [`ConfigError::PatternEscapesPublic`] when the pattern is absolute or
    /// contains `..`.
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if !pattern.contains(DISK_PLACEHOLDER) {
            return Err(ConfigError::InvalidPattern(pattern));
        }
        let stays_below = Path::new(&pattern)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !stays_below {
            return Err(ConfigError::PatternEscapesPublic(pattern));
        }
        Ok(Self { pattern })
    }

    /// The raw pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compute the link path for `disk` below `public_root`.
    #[must_use]
    pub fn link_path(&self, public_root: &Path, disk: &str) -> PathBuf {
        public_root.join(self.pattern.replace(DISK_PLACEHOLDER, disk))
    }
}

impl Default for LinkNaming {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_LINK_PATTERN.to_string(),
        }
    }
}

/// Returns `true` if `disk` is exactly one normal path component.
///
/// Together with a validated [`LinkNaming`] this keeps every link path
/// strictly below the public root.
#[must_use]
pub fn is_valid_disk_name(disk: &str) -> bool {
    let mut components = Path::new(disk).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !disk.contains(['/', '\\'])
}

/// Lexically normalize `path`: `.` is dropped and `..` removes the previous
/// component.  Symlinks are not resolved.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Resolved application directories passed explicitly to the linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    base: PathBuf,
    public: PathBuf,
    naming: LinkNaming,
}

impl AppPaths {
    /// Create a path layout. A relative `public` is taken relative to `base`.
    #[must_use]
    pub fn new(base: PathBuf, public: &Path, naming: LinkNaming) -> Self {
        let public = if public.is_absolute() {
            public.to_path_buf()
        } else {
            base.join(public)
        };
        Self {
            base,
            public,
            naming,
        }
    }

    /// Application base path; relative disk roots resolve against it.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Public root under which links are created.
    #[must_use]
    pub fn public(&self) -> &Path {
        &self.public
    }

    /// Link naming rule.
    #[must_use]
    pub const fn naming(&self) -> &LinkNaming {
        &self.naming
    }

    /// Link path for a disk.
    #[must_use]
    pub fn link_path(&self, disk: &str) -> PathBuf {
        self.naming.link_path(&self.public, disk)
    }

    /// Resolve a configured disk root. Absolute paths are returned unchanged,
    /// so resolving twice is a no-op.
    #[must_use]
    pub fn resolve_root(&self, root: &Path) -> PathBuf {
        if root.is_absolute() {
            root.to_path_buf()
        } else {
            self.base.join(root)
        }
    }
}
