use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, encode_object, hash_object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::PitError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_OBJECT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Flattened view of a tree: every leaf path mapped to its mode and blob id
pub type FlatTree = BTreeMap<PathBuf, DatabaseEntry>;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Persist `content` as an object of the given kind and return its id
    ///
    /// Writing an object that already exists leaves the stored file untouched.
    pub fn write_object(&self, object_type: ObjectType, content: &[u8]) -> anyhow::Result<ObjectId> {
        let object_id = hash_object(object_type, content)?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::debug!(oid = %object_id, kind = %object_type, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object_file(&object_path, encode_object(object_type, content))?;
        tracing::debug!(oid = %object_id, kind = %object_type, size = content.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.write_object(object.object_type(), &object.serialize()?)
    }

    pub fn object_exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Load an object's kind and body, validating the stored header
    pub fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());

        let raw = match std::fs::read(&object_path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(PitError::ObjectNotFound {
                    oid: object_id.to_string(),
                }
                .into());
            }
            Err(error) => {
                return Err(error).context(format!(
                    "Unable to read object file {}",
                    object_path.display()
                ));
            }
        };

        let corrupt = |reason: String| PitError::CorruptObject {
            oid: object_id.to_string(),
            reason,
        };

        let decompressed = Self::decompress(&raw).map_err(|error| corrupt(error.to_string()))?;
        let mut reader = Cursor::new(decompressed);
        let (object_type, size) =
            ObjectType::parse_header(&mut reader).map_err(|error| corrupt(error.to_string()))?;

        let body_start = reader.position() as usize;
        let body = Bytes::from(reader.into_inner()).slice(body_start..);
        if body.len() != size {
            return Err(corrupt(format!(
                "header declares {} bytes but body has {}",
                size,
                body.len()
            ))
            .into());
        }

        Ok((object_type, body))
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        Ok(self.read_object(object_id)?.0)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, body) = self.read_object(object_id)?;

        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Self::unpack(object_id, body)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Self::unpack(object_id, body)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Self::unpack(object_id, body)?)),
        })
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        match self.read_object(object_id)? {
            (ObjectType::Blob, body) => Self::unpack(object_id, body),
            (actual, _) => Err(anyhow::anyhow!("object {} is a {}, not a blob", object_id, actual)),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        match self.read_object(object_id)? {
            (ObjectType::Tree, body) => Self::unpack(object_id, body),
            (actual, _) => Err(PitError::NotATree {
                oid: object_id.to_string(),
                actual: actual.to_string(),
            }
            .into()),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        match self.read_object(object_id)? {
            (ObjectType::Commit, body) => Self::unpack(object_id, body),
            (actual, _) => Err(PitError::NotACommit {
                oid: object_id.to_string(),
                actual: actual.to_string(),
            }
            .into()),
        }
    }

    /// Walk a tree recursively, collecting every non-directory entry by full path
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> anyhow::Result<FlatTree> {
        let mut flattened = FlatTree::new();
        self.flatten_tree_into(tree_oid, Path::new(""), &mut flattened)?;

        Ok(flattened)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        flattened: &mut FlatTree,
    ) -> anyhow::Result<()> {
        for (name, entry) in self.parse_object_as_tree(tree_oid)?.into_entries() {
            let path = prefix.join(name);

            if entry.is_tree() {
                self.flatten_tree_into(&entry.oid, &path, flattened)?;
            } else {
                flattened.insert(path, entry);
            }
        }

        Ok(())
    }

    fn unpack<T: Unpackable>(object_id: &ObjectId, body: Bytes) -> anyhow::Result<T> {
        T::deserialize(body.as_ref()).map_err(|error| {
            PitError::CorruptObject {
                oid: object_id.to_string(),
                reason: error.to_string(),
            }
            .into()
        })
    }

    fn write_object_file(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(&object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file into place so readers never see a partial object
        std::fs::rename(&temp_object_path, object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content)
    }

    fn generate_temp_name() -> String {
        format!(
            "tmp-obj-{}-{}",
            std::process::id(),
            TEMP_OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed)
        )
    }

    /// Find all objects whose OID starts with the given prefix
    ///
    /// Prefixes of two or more characters only scan their own shard directory.
    /// A prefix that is not hex matches nothing.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let prefix = prefix.to_ascii_lowercase();
        let shards = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{:02x}", i)).collect()
        };

        let mut matches = Vec::new();
        for shard in shards {
            let dir_path = self.path.join(&shard);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)
                .context(format!("Unable to list {}", dir_path.display()))?
            {
                let file_name = entry?.file_name();
                let full_oid = format!("{}{}", shard, file_name.to_string_lossy());

                if full_oid.starts_with(&prefix) && ObjectId::is_full_hex(&full_oid) {
                    matches.push(ObjectId::try_parse(full_oid)?);
                }
            }
        }
        matches.sort();

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::pit_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().into())
    }

    #[rstest]
    #[case(ObjectType::Blob, b"hello\n".as_slice())]
    #[case(ObjectType::Blob, b"\x00\xff binary \x00".as_slice())]
    #[case(ObjectType::Commit, b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\nmsg".as_slice())]
    fn stored_objects_read_back_unchanged(
        objects_dir: TempDir,
        #[case] object_type: ObjectType,
        #[case] content: &[u8],
    ) {
        let database = database(&objects_dir);

        let oid = database.write_object(object_type, content).unwrap();
        let (read_type, body) = database.read_object(&oid).unwrap();

        assert_eq!(read_type, object_type);
        assert_eq!(body.as_ref(), content);
        assert!(database.object_exists(&oid));
    }

    #[rstest]
    fn identical_content_is_stored_once(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.write_object(ObjectType::Blob, b"same").unwrap();
        let second = database.write_object(ObjectType::Blob, b"same").unwrap();

        assert_eq!(first, second);
        let shard = objects_dir.path().join(&first.as_ref()[..2]);
        assert_eq!(std::fs::read_dir(shard).unwrap().count(), 1);
    }

    #[rstest]
    fn missing_object_is_reported_as_not_found(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::try_parse("0".repeat(40)).unwrap();

        let error = database.read_object(&oid).unwrap_err();

        assert!(matches!(pit_error(&error), Some(PitError::ObjectNotFound { .. })));
    }

    #[rstest]
    #[case(b"not zlib at all".to_vec())]
    #[case(Database::compress(b"blob 10\0short").unwrap())]
    #[case(Database::compress(b"blob 3").unwrap())]
    #[case(Database::compress(b"tag 3\0abc").unwrap())]
    fn damaged_objects_are_reported_as_corrupt(objects_dir: TempDir, #[case] stored: Vec<u8>) {
        let database = database(&objects_dir);
        let oid = ObjectId::try_parse("ab".repeat(20)).unwrap();
        let path = objects_dir.path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, stored).unwrap();

        let error = database.read_object(&oid).unwrap_err();

        assert!(matches!(pit_error(&error), Some(PitError::CorruptObject { .. })));
    }

    #[rstest]
    fn typed_parsing_rejects_the_wrong_kind(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = database.write_object(ObjectType::Blob, b"data").unwrap();

        let as_commit = database.parse_object_as_commit(&blob).unwrap_err();
        let as_tree = database.parse_object_as_tree(&blob).unwrap_err();

        assert!(matches!(pit_error(&as_commit), Some(PitError::NotACommit { .. })));
        assert!(matches!(pit_error(&as_tree), Some(PitError::NotATree { .. })));
    }

    #[rstest]
    fn prefix_lookup_finds_matching_objects(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.write_object(ObjectType::Blob, b"prefix").unwrap();

        assert_eq!(database.find_objects_by_prefix(&oid.as_ref()[..6]).unwrap(), vec![oid.clone()]);
        assert_eq!(
            database
                .find_objects_by_prefix(&oid.as_ref()[..6].to_ascii_uppercase())
                .unwrap(),
            vec![oid]
        );
    }

    #[rstest]
    #[case("éa")]
    #[case("zz12")]
    #[case("a/")]
    fn non_hex_prefix_matches_nothing(objects_dir: TempDir, #[case] prefix: &str) {
        let database = database(&objects_dir);
        database.write_object(ObjectType::Blob, b"prefix").unwrap();

        assert_eq!(database.find_objects_by_prefix(prefix).unwrap(), Vec::<ObjectId>::new());
    }
}
