//! References (branches, tags, HEAD)
//!
//! References are human-readable names pointing to objects. They can be:
//! - Direct: containing a 40-character object id
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## Storage
//!
//! Loose references are text files under `.git` holding either a bare object
//! id or `ref: <path>`, newline-terminated. `packed-refs` holds additional
//! `"<oid> <refname>"` lines; a loose ref always wins over a packed one.

use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::{BranchName, HEADS_PREFIX, SymRefName, TAGS_PREFIX};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::PitError;
use anyhow::Context;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the `.git` directory
    path: Box<Path>,
}

const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

pub const PACKED_REFS_FILE_NAME: &str = "packed-refs";

/// Symbolic chains longer than this are treated as cycles
const MAX_SYMREF_DEPTH: usize = 8;

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: SymRefName },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].trim().to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content.to_string())
                    .with_context(|| format!("ref file at {:?} holds no object id", path))?,
            )))
        }
    }
}

impl Refs {
    /// Follow HEAD to the ref that commits would move
    ///
    /// Returns `HEAD` itself when it is detached or absent.
    pub fn current_ref(&self) -> anyhow::Result<SymRefName> {
        let mut current = SymRefName::new(HEAD_REF_NAME.to_string());

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(current.as_ref_path()))? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        anyhow::bail!("symbolic ref chain starting at HEAD is too deep")
    }

    /// Name of the checked out branch, or `None` when HEAD is detached
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        Ok(self.current_ref()?.branch_name().map(str::to_string))
    }

    pub fn is_head_detached(&self) -> anyhow::Result<bool> {
        Ok(matches!(
            SymRefOrOid::read_symref_or_oid(&self.head_path())?,
            Some(SymRefOrOid::Oid(_))
        ))
    }

    /// Read a ref by full name, following symbolic refs
    ///
    /// Falls back to `packed-refs` when the final ref in the chain has no
    /// loose file.
    pub fn read_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let mut current = sym_ref_name.clone();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(current.as_ref_path()))? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(oid)) => return Ok(Some(oid)),
                None => return self.read_packed_ref(current.as_ref_path()),
            }
        }

        anyhow::bail!("symbolic ref chain starting at {} is too deep", sym_ref_name)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(&SymRefName::new(HEAD_REF_NAME.to_string()))
    }

    /// Look a short name up as a loose `refs/heads/<name>` then `refs/tags/<name>`
    pub fn read_loose_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        for prefix in [HEADS_PREFIX, TAGS_PREFIX] {
            let path = self.path.join(format!("{}{}", prefix, name));

            match SymRefOrOid::read_symref_or_oid(&path)? {
                Some(SymRefOrOid::Oid(oid)) => return Ok(Some(oid)),
                Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                    if let Some(oid) = self.read_ref(&sym_ref_name)? {
                        return Ok(Some(oid));
                    }
                }
                None => {}
            }
        }

        Ok(None)
    }

    /// Look a name up in `packed-refs`, as a full ref name or under heads/tags
    pub fn read_packed_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let candidates = [
            name.to_string(),
            format!("{}{}", HEADS_PREFIX, name),
            format!("{}{}", TAGS_PREFIX, name),
        ];

        Ok(self
            .packed_refs()?
            .into_iter()
            .find(|(refname, _)| candidates.contains(refname))
            .map(|(_, oid)| oid))
    }

    /// Entries of `packed-refs` in file order
    ///
    /// Comment (`#`) and peeled (`^`) lines are skipped.
    pub fn packed_refs(&self) -> anyhow::Result<Vec<(String, ObjectId)>> {
        let packed_path = self.packed_refs_path();
        if !packed_path.is_file() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&packed_path)
            .with_context(|| format!("failed to read {:?}", packed_path))?;

        let mut entries = Vec::new();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with('^') {
                continue;
            }

            match line.split_once(' ') {
                Some((oid, refname)) => match ObjectId::try_parse(oid.to_string()) {
                    Ok(oid) => entries.push((refname.trim().to_string(), oid)),
                    Err(_) => tracing::warn!(line, "skipping malformed packed-refs line"),
                },
                None => tracing::warn!(line, "skipping malformed packed-refs line"),
            }
        }

        Ok(entries)
    }

    /// Move whatever HEAD points at to `oid`
    ///
    /// A symbolic HEAD moves its branch, a detached HEAD is rewritten in
    /// place, and a missing HEAD creates the default branch and points at it.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        if !self.head_path().is_file() {
            let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
            self.update_ref_file(
                &self.path.join(default_branch.to_sym_ref_name().as_ref_path()),
                oid.as_ref(),
            )?;
            self.set_head_symbolic(&default_branch)?;

            tracing::info!(branch = %default_branch, %oid, "created default branch");
            return Ok(());
        }

        let target = self.current_ref()?;
        self.update_ref_file(&self.path.join(target.as_ref_path()), oid.as_ref())?;

        tracing::info!(r#ref = %target, %oid, "updated ref");
        Ok(())
    }

    pub fn set_head_symbolic(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            &format!("ref: {}", branch.to_sym_ref_name()),
        )?;

        tracing::info!(%branch, "HEAD now points at branch");
        Ok(())
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), oid.as_ref())?;

        tracing::info!(%oid, "HEAD detached");
        Ok(())
    }

    /// Write a ref file, creating parent directories as needed
    pub fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", path)
        })?)?;

        std::fs::write(path, format!("{}\n", raw_ref))
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    pub fn branch_exists(&self, name: &BranchName) -> anyhow::Result<bool> {
        let sym_ref_name = name.to_sym_ref_name();

        Ok(self.path.join(sym_ref_name.as_ref_path()).is_file()
            || self
                .packed_refs()?
                .iter()
                .any(|(refname, _)| refname == sym_ref_name.as_ref_path()))
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name)? {
            return Err(PitError::RefAlreadyExists {
                name: name.to_string(),
            }
            .into());
        }

        self.update_ref_file(
            &self.path.join(name.to_sym_ref_name().as_ref_path()),
            source_oid.as_ref(),
        )?;

        tracing::info!(branch = %name, oid = %source_oid, "created branch");
        Ok(())
    }

    /// Every ref under `refs/` with the object it resolves to, sorted by name
    ///
    /// Loose refs shadow packed entries of the same name; refs that resolve
    /// to nothing are left out.
    pub fn list_refs(&self) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let mut refs = BTreeMap::new();

        for entry in WalkDir::new(self.refs_path()).into_iter() {
            let entry = entry.context("failed to walk refs directory")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(self.path.as_ref())
                .context("ref outside of the repository")?;
            let refname = relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if let Some(oid) = self.read_ref(&SymRefName::new(refname.clone()))? {
                refs.insert(refname, oid);
            }
        }

        for (refname, oid) in self.packed_refs()? {
            refs.entry(refname).or_insert(oid);
        }

        Ok(refs)
    }

    /// Short names of all branches, loose and packed
    pub fn list_branches(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .list_refs()?
            .into_keys()
            .filter_map(|refname| refname.strip_prefix(HEADS_PREFIX).map(str::to_string))
            .collect())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn packed_refs_path(&self) -> Box<Path> {
        self.path.join(PACKED_REFS_FILE_NAME).into_boxed_path()
    }
}
