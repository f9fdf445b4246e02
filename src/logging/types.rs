//! Summary entry types recorded by the [`Logger`](super::Logger).

/// One per-disk result for summary reporting.
#[derive(Debug, Clone)]
pub struct SummaryEntry {
    /// Disk name.
    pub name: String,
    /// Final status of the operation.
    pub status: EntryStatus,
    /// Optional detail message (e.g., failure reason).
    pub message: Option<String>,
}

/// Status of a completed per-disk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// The operation completed successfully.
    Ok,
    /// The disk was selected but not processed (e.g., not a local disk).
    Skipped,
    /// The operation failed.
    Failed,
}
