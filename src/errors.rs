//! Typed failures surfaced by repository operations
//!
//! Operations propagate `anyhow::Error`, but every failure a caller may want to
//! branch on is raised as a [`PitError`] so it can be recovered with
//! `error.downcast_ref::<PitError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PitError {
    /// No object file exists for the given OID
    #[error("object {oid} not found")]
    ObjectNotFound { oid: String },

    /// The object file could not be decompressed, its header is malformed,
    /// or the declared size does not match the body
    #[error("object {oid} is corrupt: {reason}")]
    CorruptObject { oid: String, reason: String },

    /// Nothing is staged, so no tree can be written
    #[error("nothing to commit: the index is empty")]
    EmptyIndex,

    #[error("unknown revision '{revision}'")]
    UnknownRevision { revision: String },

    #[error("short object id {revision} is ambiguous ({} candidates)", .candidates.len())]
    AmbiguousRevision {
        revision: String,
        candidates: Vec<String>,
    },

    #[error("author identity unknown: {missing} is not configured")]
    IdentityMissing { missing: &'static str },

    /// Tracked files differ from the HEAD commit
    #[error("your local changes to {} file(s) would be overwritten by checkout", .paths.len())]
    DirtyWorkdir { paths: Vec<PathBuf> },

    #[error("a branch named '{name}' already exists")]
    RefAlreadyExists { name: String },

    #[error("object {oid} is a {actual}, not a commit")]
    NotACommit { oid: String, actual: String },

    #[error("object {oid} is a {actual}, not a tree")]
    NotATree { oid: String, actual: String },

    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    #[error("pathspec '{}' did not match any files", .0.display())]
    PathNotFound(PathBuf),

    #[error("not a pit repository: {}", .0.display())]
    NotARepository(PathBuf),
}

/// Extracts the typed failure from an `anyhow` chain, if there is one.
pub fn pit_error(error: &anyhow::Error) -> Option<&PitError> {
    error.chain().find_map(|cause| cause.downcast_ref::<PitError>())
}
