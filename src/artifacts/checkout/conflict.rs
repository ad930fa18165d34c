use crate::areas::database::FlatTree;
use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::PitError;
use std::path::PathBuf;

#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: &'static str,
}

pub const STALE_FILES: ConflictMessage = ConflictMessage {
    header: "Your local changes to the following files would be overwritten by checkout:",
    footer: "Please commit your changes or stash them before you switch branches.",
};

impl ConflictMessage {
    pub fn render(&self, paths: &[PathBuf]) -> String {
        let paths = paths
            .iter()
            .map(|path| format!("\t{}", path.display()))
            .collect::<Vec<_>>();

        format!("{}\n{}\n{}", self.header, paths.join("\n"), self.footer)
    }
}

/// Paths of the HEAD tree that are missing from, or differ in, the workspace
pub fn stale_files(repository: &Repository, head_tree: &FlatTree) -> anyhow::Result<Vec<PathBuf>> {
    let inspector = Inspector::new(repository);
    let mut stale = Vec::new();

    for (path, entry) in head_tree {
        if inspector.check_head_entry_against_workspace(path, entry)? != WorkspaceChangeType::None {
            stale.push(path.clone());
        }
    }

    Ok(stale)
}

/// Fails with `DirtyWorkdir` unless every committed file is intact on disk
pub fn ensure_clean_workdir(repository: &Repository, head_tree: &FlatTree) -> anyhow::Result<()> {
    let stale = stale_files(repository, head_tree)?;

    if stale.is_empty() {
        Ok(())
    } else {
        tracing::warn!(paths = stale.len(), "checkout blocked by local changes");
        Err(PitError::DirtyWorkdir { paths: stale }.into())
    }
}
