//! A minimal git-compatible version control storage engine

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
