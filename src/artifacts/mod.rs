//! Data structures and algorithms operating on the storage areas
//!
//! - `branch`: branch names and revision resolution
//! - `checkout`: reset and checkout of commits into index and workspace
//! - `database`: entries of stored trees
//! - `identity`: author and committer resolution
//! - `index`: staged entries and file modes
//! - `objects`: blob, tree and commit objects
//! - `status`: comparison of HEAD, index and workspace

pub mod branch;
pub mod checkout;
pub mod database;
pub mod identity;
pub mod index;
pub mod objects;
pub mod status;
