use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Produces the object body (everything after the header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuilds an object from its body; the header has already been consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> Result<String>;

    fn object_id(&self) -> Result<ObjectId> {
        hash_object(self.object_type(), &self.serialize()?)
    }
}

/// Prefix `content` with its `<kind> <len>\0` header
pub fn encode_object(object_type: ObjectType, content: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), content.len());

    let mut encoded = Vec::with_capacity(header.len() + content.len());
    encoded.extend_from_slice(header.as_bytes());
    encoded.extend_from_slice(content);

    Bytes::from(encoded)
}

/// Compute the id an object of the given kind and content would be stored under
pub fn hash_object(object_type: ObjectType, content: &[u8]) -> Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(encode_object(object_type, content));

    ObjectId::from_raw(&hasher.finalize())
}

/// A parsed object of any kind
#[derive(Debug)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }
}
