//! Index (staging area) data structures
//!
//! The index is persisted as a JSON array of `{mode, oid, path}` records.

pub mod entry_mode;
pub mod index_entry;

/// Index file name, relative to the `.git` directory
pub const INDEX_FILE_NAME: &str = "index.json";
