//! Reset and checkout
//!
//! Moves HEAD, the index and the working directory between commits:
//!
//! - `migration`: plans and applies the workspace and index rewrite
//! - `conflict`: the dirty-workdir guard run before a checkout
//!
//! A checkout verifies the working directory before mutating anything.

pub mod conflict;
pub mod migration;

/// How far a reset reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    /// Move the branch only
    Soft,
    /// Also replace the index
    #[default]
    Mixed,
    /// Also rewrite the working directory
    Hard,
}

impl ResetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetMode::Soft => "soft",
            ResetMode::Mixed => "mixed",
            ResetMode::Hard => "hard",
        }
    }

    pub fn updates_index(&self) -> bool {
        !matches!(self, ResetMode::Soft)
    }

    pub fn updates_workspace(&self) -> bool {
        matches!(self, ResetMode::Hard)
    }
}

impl std::fmt::Display for ResetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
