//! Author and committer identity
//!
//! Each of `user.name` and `user.email` is looked up independently:
//!
//! 1. environment overrides (`GIT_AUTHOR_*`, falling back to `GIT_COMMITTER_*`)
//! 2. the repository's `.git/config`
//! 3. the global `~/.gitconfig`
//!
//! Timestamps come from `GIT_AUTHOR_DATE` / `GIT_COMMITTER_DATE` when set,
//! otherwise both roles share the current local time.

pub mod config;

use crate::artifacts::identity::config::GitConfig;
use crate::artifacts::objects::commit::Author;
use crate::errors::PitError;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};

const USER_SECTION: &str = "user";
const GLOBAL_CONFIG_FILE_NAME: &str = ".gitconfig";

/// Identity inputs that take precedence over configuration files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverrides {
    pub name: Option<String>,
    pub email: Option<String>,
    pub author_date: Option<String>,
    pub committer_date: Option<String>,
    /// Global config file consulted last; `None` skips it
    pub global_config: Option<PathBuf>,
}

impl IdentityOverrides {
    pub fn from_env() -> Self {
        Self {
            name: env_var("GIT_AUTHOR_NAME").or_else(|| env_var("GIT_COMMITTER_NAME")),
            email: env_var("GIT_AUTHOR_EMAIL").or_else(|| env_var("GIT_COMMITTER_EMAIL")),
            author_date: env_var("GIT_AUTHOR_DATE"),
            committer_date: env_var("GIT_COMMITTER_DATE"),
            global_config: env_var("HOME").map(|home| PathBuf::from(home).join(GLOBAL_CONFIG_FILE_NAME)),
        }
    }

    /// Resolve `(author, committer)` for a new commit
    pub fn resolve(&self, local_config: &Path) -> anyhow::Result<(Author, Author)> {
        let configs = [
            Some(GitConfig::load(local_config)),
            self.global_config.as_deref().map(GitConfig::load),
        ];

        let name = Self::lookup(&self.name, &configs, "name").ok_or(PitError::IdentityMissing {
            missing: "user.name",
        })?;
        let email = Self::lookup(&self.email, &configs, "email").ok_or(PitError::IdentityMissing {
            missing: "user.email",
        })?;

        let now = chrono::Local::now().fixed_offset();
        let author_date = Self::parse_date(self.author_date.as_deref(), now)
            .context("Invalid GIT_AUTHOR_DATE")?;
        let committer_date = Self::parse_date(self.committer_date.as_deref(), now)
            .context("Invalid GIT_COMMITTER_DATE")?;

        tracing::debug!(%name, %email, "resolved identity");

        Ok((
            Author::new_with_timestamp(name.clone(), email.clone(), author_date),
            Author::new_with_timestamp(name, email, committer_date),
        ))
    }

    fn lookup(
        explicit: &Option<String>,
        configs: &[Option<GitConfig>],
        key: &str,
    ) -> Option<String> {
        explicit.clone().or_else(|| {
            configs
                .iter()
                .flatten()
                .find_map(|config| {
                    config
                        .get(USER_SECTION, key)
                        .filter(|value| !value.is_empty())
                })
                .map(str::to_string)
        })
    }

    fn parse_date(
        date: Option<&str>,
        now: DateTime<FixedOffset>,
    ) -> anyhow::Result<DateTime<FixedOffset>> {
        date.map_or(Ok(now), Author::parse_date)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
