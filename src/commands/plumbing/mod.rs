//! Plumbing commands
//!
//! Direct access to objects, the index and refs, used as building blocks by
//! the porcelain:
//!
//! - `cat-file`, `hash-object`: read and write single objects
//! - `write-tree`, `commit-tree`: turn the index into a tree and a commit
//! - `ls-tree`, `ls-files`: list tree and index contents
//! - `rev-parse`, `show-ref`: resolve and enumerate refs

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
pub mod write_tree;
