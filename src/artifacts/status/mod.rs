//! Working tree status inspection
//!
//! Compares the HEAD tree, the index and the working directory.
//!
//! - `file_change`: change kinds and their status labels
//! - `ignore_rules`: which untracked paths to leave out
//! - `inspector`: per-path comparisons
//! - `status_info`: the aggregated [`status_info::StatusReport`]

pub mod file_change;
pub mod ignore_rules;
pub mod inspector;
pub mod status_info;
