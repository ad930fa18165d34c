//! Repository storage areas
//!
//! - `database`: content-addressed object store under `.git/objects`
//! - `index`: the staging area persisted as `.git/index.json`
//! - `refs`: branches, tags, `HEAD` and `packed-refs`
//! - `repository`: the handle tying the areas together
//! - `workspace`: the working directory

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
