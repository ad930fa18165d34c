use crate::areas::database::{Database, FlatTree};
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::identity::IdentityOverrides;
use crate::artifacts::index::INDEX_FILE_NAME;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::ignore_rules::GitignoreRules;
use crate::errors::PitError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub const GIT_DIR_NAME: &str = ".git";
pub const CONFIG_FILE_NAME: &str = "config";

/// Root context every operation runs against
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    identity: IdentityOverrides,
}

impl Repository {
    /// Open the repository rooted at `path`, creating the directory if needed
    ///
    /// Identity overrides are read from the environment.
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Unable to create directory {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;
        let git_path = path.join(GIT_DIR_NAME);

        Ok(Repository {
            index: RefCell::new(Index::new(git_path.join(INDEX_FILE_NAME).into_boxed_path())),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            writer: RefCell::new(writer),
            identity: IdentityOverrides::from_env(),
            path: path.into_boxed_path(),
        })
    }

    pub fn with_identity(mut self, identity: IdentityOverrides) -> Self {
        self.identity = identity;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(GIT_DIR_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.git_path().join(CONFIG_FILE_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    /// The index, freshly read from disk
    pub fn load_index(&self) -> anyhow::Result<RefMut<'_, Index>> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        Ok(index)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn identity(&self) -> &IdentityOverrides {
        &self.identity
    }

    pub fn ignore_rules(&self) -> anyhow::Result<GitignoreRules> {
        GitignoreRules::load(&self.path)
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(PitError::NotARepository(self.path.to_path_buf()).into())
        }
    }

    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        Revision::try_parse(revision)?.resolve(self)
    }

    /// Resolve a revision that must name a commit
    pub fn resolve_commit(&self, revision: &str) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = self.resolve_revision(revision)?;
        let commit = self.database.parse_object_as_commit(&oid)?;

        Ok((oid, commit))
    }

    /// Flattened tree of the HEAD commit; empty before the first commit
    pub fn head_tree(&self) -> anyhow::Result<FlatTree> {
        match self.refs.read_head()? {
            Some(head_oid) => self.flatten_commit_tree(&head_oid),
            None => Ok(FlatTree::new()),
        }
    }

    pub fn flatten_commit_tree(&self, commit_oid: &ObjectId) -> anyhow::Result<FlatTree> {
        let commit = self.database.parse_object_as_commit(commit_oid)?;

        self.database.flatten_tree(commit.tree_oid())
    }
}
