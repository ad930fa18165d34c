//! Index entry representation
//!
//! Each entry in the index records a tracked file as a `(path, mode, oid)`
//! triple. Paths are relative to the repository root and use `/` separators.

use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct IndexEntry {
    /// File mode as staged
    pub mode: FileMode,
    /// Blob id of the staged content
    pub oid: ObjectId,
    /// File path relative to repository root
    pub path: PathBuf,
}

impl IndexEntry {
    /// Ancestor directories of the entry, outermost first
    ///
    /// `a/b/c` yields `[a, a/b]`; a top-level path yields nothing.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = self
            .path
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        dirs.reverse();

        dirs
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path.cmp(&other.path)
    }
}
