//! Porcelain commands
//!
//! User-facing workflows composed from the storage areas and plumbing:
//!
//! - `init`: create the `.git` skeleton
//! - `add`, `rm`: stage and unstage files
//! - `commit`: record the index on the current branch
//! - `status`: compare HEAD, index and working directory
//! - `reset`, `checkout`: move HEAD and reload index and working directory
//! - `branch`, `log`: create branches and walk history

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod reset;
pub mod rm;
pub mod status;
