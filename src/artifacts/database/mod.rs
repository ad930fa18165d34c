//! Database entry types
//!
//! Entries read back out of stored trees, keyed by name or by flattened path.

pub mod database_entry;
