//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are ordered by the byte value of their name, so the encoding of a
//! tree depends only on the set of entries it holds.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Component;

/// Internal tree entry used while building from the index
#[derive(Debug, Clone)]
enum TreeEntry {
    File(IndexEntry),
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> FileMode {
        match self {
            TreeEntry::File(entry) => entry.mode,
            TreeEntry::Directory(_) => FileMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing one directory level
///
/// Trees loaded from the database keep their entries in `readable_entries`;
/// trees folded from the index keep them in `writeable_entries`, where nested
/// directories are still whole subtrees.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    readable_entries: BTreeMap<String, DatabaseEntry>,
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Fold a flat list of index entries into a hierarchy of trees
    ///
    /// Leading path components become nested subtrees; the final component
    /// becomes a leaf carrying the entry's mode and blob id.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let components = entry
                .path
                .components()
                .map(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(str::to_string)
                        .context("non UTF-8 path component"),
                    _ => Err(anyhow::anyhow!(
                        "index path '{}' is not a plain relative path",
                        entry.path.display()
                    )),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            root.add_entry(&components, entry)?;
        }

        Ok(root)
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Visits children before parents (post-order traversal), so that child
    /// OIDs are stored before the parent that references them.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.writeable_entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    fn add_entry(&mut self, components: &[String], entry: &IndexEntry) -> anyhow::Result<()> {
        match components {
            [] => anyhow::bail!("index entry has an empty path"),
            [name] => {
                self.writeable_entries
                    .insert(name.clone(), TreeEntry::File(entry.clone()));
            }
            [parent, rest @ ..] => {
                let slot = self
                    .writeable_entries
                    .entry(parent.clone())
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match slot {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, entry)?,
                    TreeEntry::File(file) => anyhow::bail!(
                        "'{}' is tracked as a file and as a directory",
                        file.path.display()
                    ),
                }
            }
        }

        Ok(())
    }

    /// Entries of a tree read back from the database, in name order
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    fn listing(&self) -> anyhow::Result<Vec<(String, DatabaseEntry)>> {
        if !self.readable_entries.is_empty() {
            return Ok(self
                .readable_entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.clone()))
                .collect());
        }

        self.writeable_entries
            .iter()
            .map(|(name, entry)| Ok((name.clone(), DatabaseEntry::new(entry.oid()?, entry.mode()))))
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (name, entry) in self.listing()? {
            write!(content, "{} {}", entry.mode.as_str(), name)?;
            content.push(0);
            entry.oid.write_raw_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in mode");
            }
            let mode = FileMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in name");
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid = ObjectId::read_raw_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> anyhow::Result<String> {
        Ok(self
            .listing()?
            .into_iter()
            .map(|(name, entry)| {
                let object_type = if entry.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };

                format!("{} {} {}\t{}", entry.mode, object_type, entry.oid, name)
            })
            .collect::<Vec<String>>()
            .join("\n"))
    }
}
