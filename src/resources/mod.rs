//! Link primitives: per-disk symlink reconciliation and status inspection.
pub mod status;
pub mod symlink;

pub use status::{LinkStatus, inspect};
pub use symlink::DiskLink;

/// Result of successfully applying a disk link.
///
/// # Examples
///
/// ```
/// use storage_linker::resources::LinkChange;
///
/// assert_ne!(LinkChange::Created, LinkChange::Replaced);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    /// Nothing occupied the link path; a new link was created.
    Created,
    /// An existing entry was deleted (`--force`) and the link recreated.
    Replaced,
}
