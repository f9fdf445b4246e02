//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the linker can be unit-tested
//! without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem calls the linker makes.
///
/// Implement this trait to swap in a mock during unit tests, keeping link
/// logic independent of real I/O.  The production implementation is
/// [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if anything occupies `path`, including a broken symlink.
    ///
    /// Does not follow symlinks.
    fn entry_exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` exists after following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is itself a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove whatever occupies `path`.
    ///
    /// Symlinks and files are unlinked; real directories are removed with
    /// their contents.  A symlink to a directory never has its target touched.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_symlink() {
            remove_symlink(path, &meta)
        } else if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }
        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`; the
/// `FILE_ATTRIBUTE_DIRECTORY` bit tells them apart from file symlinks.
fn remove_symlink(path: &Path, meta: &std::fs::Metadata) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        if meta.file_attributes() & 0x10 != 0 {
            return std::fs::remove_dir(path);
        }
    }
    #[cfg(not(windows))]
    let _ = meta;
    std::fs::remove_file(path)
}

/// In-memory filesystem node held by [`MockFileSystemOps`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link to the given path.
    Symlink(PathBuf),
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure files, directories and symlinks with the builder-style
/// methods.  Every trait call increments [`call_count`](Self::call_count),
/// so tests can assert that a code path never touched the filesystem.
///
/// # Example
///
/// ```ignore
/// use storage_linker::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_dir("/app/storage/avatars")
///     .with_symlink("/app/public/storage/avatars", "/app/storage/avatars");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    entries: std::sync::Mutex<std::collections::BTreeMap<PathBuf, MockEntry>>,
    failing_symlinks: bool,
    failing_removes: std::collections::BTreeSet<PathBuf>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` as a regular file.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::File);
        self
    }

    /// Register `path` as a directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Dir);
        self
    }

    /// Register `path` as a symbolic link pointing to `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Symlink(target.into()));
        self
    }

    /// Make every [`FileSystemOps::symlink`] call fail with `PermissionDenied`.
    #[must_use]
    pub const fn with_failing_symlinks(mut self) -> Self {
        self.failing_symlinks = true;
        self
    }

    /// Make [`FileSystemOps::remove`] of `path` fail with `PermissionDenied`,
    /// leaving the entry in place.
    #[must_use]
    pub fn with_failing_remove(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_removes.insert(path.into());
        self
    }

    /// Return the total number of trait calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Return the entry currently stored at `path`, without counting a call.
    #[must_use]
    pub fn entry(&self, path: &Path) -> Option<MockEntry> {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .get(path)
            .cloned()
    }

    fn insert(&self, path: PathBuf, entry: MockEntry) {
        self.entries
            .lock()
            .expect("mock entries poisoned")
            .insert(path, entry);
    }

    fn tick(&self) {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn resolves(&self, path: &Path, depth: usize) -> bool {
        match self.entry(path) {
            None => false,
            Some(MockEntry::Symlink(target)) => depth > 0 && self.resolves(&target, depth - 1),
            Some(_) => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_exists(&self, path: &Path) -> bool {
        self.tick();
        self.entry(path).is_some()
    }

    fn exists(&self, path: &Path) -> bool {
        self.tick();
        self.resolves(path, 8)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.tick();
        matches!(self.entry(path), Some(MockEntry::Symlink(_)))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.tick();
        match self.entry(path) {
            Some(MockEntry::Symlink(target)) => Ok(target),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.tick();
        if self.failing_removes.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        let mut entries = self.entries.lock().expect("mock entries poisoned");
        match entries.remove(path) {
            Some(MockEntry::Dir) => {
                entries.retain(|p, _| !p.starts_with(path));
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.tick();
        if self.failing_symlinks {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        if self.entry(link).is_some() {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        self.insert(link.to_path_buf(), MockEntry::Symlink(target.to_path_buf()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.tick();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() || self.entry(ancestor).is_some() {
                continue;
            }
            self.insert(ancestor.to_path_buf(), MockEntry::Dir);
        }
        Ok(())
    }
}
