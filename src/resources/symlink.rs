//! Disk link resource.
use std::path::PathBuf;

use super::LinkChange;
use crate::error::LinkError;
use crate::operations::FileSystemOps;
use crate::paths::{is_valid_disk_name, normalize};

/// The public link for one disk: where it lives and what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskLink {
    /// Disk name.
    pub disk: String,
    /// Resolved root the link points to; `None` when no root is configured.
    pub target: Option<PathBuf>,
    /// Path of the symlink under the public root.
    pub link: PathBuf,
}

impl DiskLink {
    /// Create a disk link description.
    #[must_use]
    pub const fn new(disk: String, target: Option<PathBuf>, link: PathBuf) -> Self {
        Self { disk, target, link }
    }

    /// Create the link, replacing whatever occupies the link path when
    /// `force` is set.
    ///
    /// The occupancy check does not distinguish a valid link from a broken
    /// one, a plain file, or a directory: all of them block creation without
    /// `force`, and all of them are deleted with it.  The target itself is
    /// only ever checked for existence.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidDiskName`] or
    /// [`LinkError::NoRootConfigured`] without touching the filesystem,
    /// [`LinkError::TargetMissing`] or [`LinkError::AlreadyExists`] without
    /// side effects, and [`LinkError::Filesystem`] when the link path is the
    /// target or one of its ancestors, or when deletion or creation fails.
    pub fn apply(&self, fs: &dyn FileSystemOps, force: bool) -> Result<LinkChange, LinkError> {
        self.check_name()?;
        let Some(target) = &self.target else {
            return Err(LinkError::NoRootConfigured {
                disk: self.disk.clone(),
            });
        };

        if !fs.exists(target) {
            return Err(LinkError::TargetMissing {
                disk: self.disk.clone(),
                target: target.clone(),
            });
        }

        if normalize(target).starts_with(normalize(&self.link)) {
            return Err(LinkError::Filesystem {
                disk: self.disk.clone(),
                message: format!(
                    "link path {} would replace the disk root {}",
                    self.link.display(),
                    target.display()
                ),
            });
        }

        let mut change = LinkChange::Created;
        if fs.entry_exists(&self.link) {
            if !force {
                return Err(LinkError::AlreadyExists {
                    disk: self.disk.clone(),
                    link: self.link.clone(),
                });
            }
            fs.remove(&self.link).map_err(|e| self.fs_error(&e))?;
            change = LinkChange::Replaced;
        }

        if let Some(parent) = self.link.parent() {
            fs.create_dir_all(parent).map_err(|e| self.fs_error(&e))?;
        }
        fs.symlink(target, &self.link)
            .map_err(|e| self.fs_error(&e))?;

        Ok(change)
    }

    /// Delete the link path if, and only if, it is a symlink.
    ///
    /// Returns `Ok(false)` when the path is absent or holds a regular file
    /// or directory, which are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidDiskName`] without touching the
    /// filesystem, and [`LinkError::Filesystem`] if the symlink cannot be
    /// deleted.
    pub fn remove(&self, fs: &dyn FileSystemOps) -> Result<bool, LinkError> {
        self.check_name()?;
        if !fs.is_symlink(&self.link) {
            return Ok(false);
        }
        fs.remove(&self.link).map_err(|e| self.fs_error(&e))?;
        Ok(true)
    }

    fn check_name(&self) -> Result<(), LinkError> {
        if is_valid_disk_name(&self.disk) {
            Ok(())
        } else {
            Err(LinkError::InvalidDiskName {
                disk: self.disk.clone(),
            })
        }
    }

    fn fs_error(&self, err: &std::io::Error) -> LinkError {
        LinkError::Filesystem {
            disk: self.disk.clone(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::{MockEntry, MockFileSystemOps, SystemFileSystemOps};
    use std::path::Path;

    const TARGET: &str = "/app/storage/avatars";
    const LINK: &str = "/app/public/storage/avatars";

    fn avatars() -> DiskLink {
        DiskLink::new(
            "avatars".to_string(),
            Some(PathBuf::from(TARGET)),
            PathBuf::from(LINK),
        )
    }

    #[test]
    fn no_target_fails_without_filesystem_access() {
        let fs = MockFileSystemOps::new();
        let link = DiskLink::new("avatars".to_string(), None, PathBuf::from(LINK));
        let err = link.apply(&fs, true).unwrap_err();
        assert!(matches!(err, LinkError::NoRootConfigured { .. }));
        assert_eq!(fs.call_count(), 0);
    }

    #[test]
    fn missing_target_fails_without_side_effects() {
        let fs = MockFileSystemOps::new();
        let err = avatars().apply(&fs, true).unwrap_err();
        assert!(matches!(err, LinkError::TargetMissing { ref target, .. } if target == Path::new(TARGET)));
        assert!(fs.entry(Path::new(LINK)).is_none());
    }

    #[test]
    fn creates_link_when_path_free() {
        let fs = MockFileSystemOps::new().with_dir(TARGET);
        assert_eq!(avatars().apply(&fs, false).unwrap(), LinkChange::Created);
        assert_eq!(
            fs.entry(Path::new(LINK)),
            Some(MockEntry::Symlink(PathBuf::from(TARGET)))
        );
        assert_eq!(
            fs.entry(Path::new("/app/public/storage")),
            Some(MockEntry::Dir)
        );
    }

    #[test]
    fn broken_link_blocks_creation_without_force() {
        let fs = MockFileSystemOps::new()
            .with_dir(TARGET)
            .with_symlink(LINK, "/somewhere/else");
        let err = avatars().apply(&fs, false).unwrap_err();
        assert!(matches!(err, LinkError::AlreadyExists { .. }));
        assert_eq!(
            fs.entry(Path::new(LINK)),
            Some(MockEntry::Symlink(PathBuf::from("/somewhere/else")))
        );
    }

    #[test]
    fn plain_file_blocks_creation_without_force() {
        let fs = MockFileSystemOps::new().with_dir(TARGET).with_file(LINK);
        let err = avatars().apply(&fs, false).unwrap_err();
        assert!(matches!(err, LinkError::AlreadyExists { .. }));
        assert_eq!(fs.entry(Path::new(LINK)), Some(MockEntry::File));
    }

    #[test]
    fn force_replaces_any_occupant() {
        for occupant in [MockEntry::File, MockEntry::Dir, MockEntry::Symlink("/x".into())] {
            let fs = MockFileSystemOps::new().with_dir(TARGET);
            let fs = match occupant {
                MockEntry::File => fs.with_file(LINK),
                MockEntry::Dir => fs.with_dir(LINK),
                MockEntry::Symlink(t) => fs.with_symlink(LINK, t),
            };
            assert_eq!(avatars().apply(&fs, true).unwrap(), LinkChange::Replaced);
            assert_eq!(
                fs.entry(Path::new(LINK)),
                Some(MockEntry::Symlink(PathBuf::from(TARGET)))
            );
        }
    }

    #[test]
    fn symlink_failure_reports_filesystem_error() {
        let fs = MockFileSystemOps::new()
            .with_dir(TARGET)
            .with_failing_symlinks();
        let err = avatars().apply(&fs, false).unwrap_err();
        assert!(
            matches!(err, LinkError::Filesystem { ref message, .. } if message.contains("permission denied")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn force_delete_failure_keeps_occupant() {
        let fs = MockFileSystemOps::new()
            .with_dir(TARGET)
            .with_file(LINK)
            .with_failing_remove(LINK);
        let err = avatars().apply(&fs, true).unwrap_err();
        assert!(
            matches!(err, LinkError::Filesystem { ref message, .. } if message.contains("permission denied")),
            "unexpected error: {err:?}"
        );
        assert_eq!(fs.entry(Path::new(LINK)), Some(MockEntry::File));
    }

    #[test]
    fn link_path_over_target_is_refused_without_filesystem_changes() {
        for link in ["/app/storage/avatars", "/app/storage", "/app/public/../storage/./avatars"] {
            let fs = MockFileSystemOps::new().with_dir(TARGET);
            let disk = DiskLink::new(
                "avatars".to_string(),
                Some(PathBuf::from(TARGET)),
                PathBuf::from(link),
            );
            let err = disk.apply(&fs, true).unwrap_err();
            assert!(
                matches!(err, LinkError::Filesystem { ref message, .. } if message.contains("disk root")),
                "{link}: {err:?}"
            );
            assert_eq!(fs.entry(Path::new(TARGET)), Some(MockEntry::Dir));
        }
    }

    #[test]
    fn invalid_disk_name_fails_without_filesystem_access() {
        for name in ["", "..", "a/b"] {
            let fs = MockFileSystemOps::new().with_dir(TARGET);
            let disk = DiskLink::new(
                name.to_string(),
                Some(PathBuf::from(TARGET)),
                PathBuf::from("/app/public/storage").join(name),
            );
            assert!(matches!(
                disk.apply(&fs, true).unwrap_err(),
                LinkError::InvalidDiskName { .. }
            ));
            assert!(matches!(
                disk.remove(&fs).unwrap_err(),
                LinkError::InvalidDiskName { .. }
            ));
            assert_eq!(fs.call_count(), 0);
        }
    }

    #[test]
    fn remove_only_deletes_symlinks() {
        let fs = MockFileSystemOps::new().with_file(LINK);
        assert!(!avatars().remove(&fs).unwrap());
        assert_eq!(fs.entry(Path::new(LINK)), Some(MockEntry::File));

        let fs = MockFileSystemOps::new().with_symlink(LINK, TARGET);
        assert!(avatars().remove(&fs).unwrap());
        assert!(fs.entry(Path::new(LINK)).is_none());
    }

    #[test]
    fn remove_absent_is_noop() {
        let fs = MockFileSystemOps::new();
        assert!(!avatars().remove(&fs).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn real_apply_creates_working_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("storage").join("avatars");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("me.png"), b"png").unwrap();
        let link_path = dir.path().join("public").join("storage").join("avatars");

        let link = DiskLink::new("avatars".to_string(), Some(target), link_path.clone());
        assert_eq!(
            link.apply(&SystemFileSystemOps, false).unwrap(),
            LinkChange::Created
        );
        assert_eq!(std::fs::read(link_path.join("me.png")).unwrap(), b"png");
        assert_eq!(
            crate::resources::inspect(&SystemFileSystemOps, &link.link),
            crate::resources::LinkStatus::Linked
        );
    }

    #[cfg(unix)]
    #[test]
    fn real_force_never_deletes_the_root_it_links_to() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("precious.txt"), b"keep").unwrap();

        let link = DiskLink::new(
            "data".to_string(),
            Some(root.clone()),
            dir.path().join(".").join("data"),
        );
        let err = link.apply(&SystemFileSystemOps, true).unwrap_err();
        assert!(matches!(err, LinkError::Filesystem { .. }));
        assert!(!root.is_symlink());
        assert_eq!(std::fs::read(root.join("precious.txt")).unwrap(), b"keep");
    }

    #[cfg(unix)]
    #[test]
    fn real_force_over_directory_keeps_target_intact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), b"keep").unwrap();
        let link_path = dir.path().join("public").join("storage").join("disk");
        std::fs::create_dir_all(link_path.join("stale")).unwrap();

        let link = DiskLink::new("disk".to_string(), Some(target.clone()), link_path.clone());
        assert_eq!(
            link.apply(&SystemFileSystemOps, true).unwrap(),
            LinkChange::Replaced
        );
        assert!(link_path.is_symlink());
        assert_eq!(std::fs::read(target.join("keep.txt")).unwrap(), b"keep");
    }
}
