//! Command implementations, as methods on [`Repository`](crate::areas::repository::Repository)
//!
//! `plumbing` exposes objects, the index and refs one piece at a time;
//! `porcelain` builds the day-to-day workflows on top of it. Each command
//! has a value-returning method for library callers and a printing method
//! used by the binary.

pub mod plumbing;
pub mod porcelain;
