//! Ignore rules consulted when looking for untracked files
//!
//! Rules come from the `.gitignore` at the repository root; the `.git`
//! directory is always ignored.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Decides whether a workspace path should be left out of status
pub trait IgnorePredicate {
    fn is_ignored(&self, path: &Path, is_dir: bool) -> bool;
}

#[derive(Debug)]
pub struct GitignoreRules {
    matcher: Gitignore,
}

impl GitignoreRules {
    /// Load `.gitignore` from `root`; a missing file yields no rules
    ///
    /// Malformed patterns are skipped with a warning.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let gitignore_path = root.join(GITIGNORE_FILE_NAME);

        if gitignore_path.is_file()
            && let Some(error) = builder.add(&gitignore_path)
        {
            tracing::warn!(%error, "ignoring unreadable .gitignore rules");
        }

        Ok(Self {
            matcher: builder.build()?,
        })
    }

    #[cfg(test)]
    fn from_lines(root: &Path, lines: &[&str]) -> anyhow::Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for line in lines {
            builder.add_line(None, line)?;
        }

        Ok(Self {
            matcher: builder.build()?,
        })
    }
}

impl IgnorePredicate for GitignoreRules {
    fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        is_repository_dir(path)
            || self
                .matcher
                .matched_path_or_any_parents(path, is_dir)
                .is_ignore()
    }
}

fn is_repository_dir(path: &Path) -> bool {
    path.components()
        .next()
        .is_some_and(|component| component.as_os_str() == ".git")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("build/output.o", true)]
    #[case("notes.log", true)]
    #[case("keep.log", false)]
    #[case("src/main.rs", false)]
    #[case(".git/HEAD", true)]
    fn gitignore_patterns_are_honored(#[case] path: &str, #[case] ignored: bool) {
        let root = Path::new("/repo");
        let rules = GitignoreRules::from_lines(root, &["build/", "*.log", "!keep.log"]).unwrap();

        assert_eq!(rules.is_ignored(Path::new(path), false), ignored);
    }

    #[test]
    fn missing_gitignore_only_ignores_the_repository_dir() {
        let dir = assert_fs::TempDir::new().unwrap();
        let rules = GitignoreRules::load(dir.path()).unwrap();

        assert!(rules.is_ignored(Path::new(".git/config"), false));
        assert!(!rules.is_ignored(Path::new("a.txt"), false));
    }
}
