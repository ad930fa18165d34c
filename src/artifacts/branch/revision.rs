use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::branch::{
    ANCESTOR_REGEX, MIN_ABBREVIATED_OID_LENGTH, PARENT_REGEX, REF_ALIASES,
};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::PitError;
use anyhow::Context;

/// A revision expression naming an object
///
/// Supported forms:
/// - full or abbreviated object ids (`4b825dc6`)
/// - branch or tag names (`master`, `v1.0`)
/// - `HEAD` and its alias `@`
/// - `<revision>^` for the parent and `<revision>~<n>` for the n-th ancestor
///
/// Plain names are resolved in this order: full object id, abbreviated
/// object id, loose branch then tag, `HEAD`, and finally `packed-refs`.
#[derive(Debug, Clone)]
pub enum Revision {
    Ref(BranchName),
    Ancestor(Box<Revision>, usize),
    Parent(Box<Revision>),
}

impl Revision {
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_name(name.as_ref(), repository),
            Revision::Parent(base_revision) => {
                let oid = base_revision.resolve(repository)?;
                Self::resolve_commit_parent(&oid, self, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(&oid, self, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_name(name: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if ObjectId::is_full_hex(name) {
            let oid = ObjectId::try_parse(name.to_string())?;
            return if repository.database().object_exists(&oid) {
                tracing::debug!(revision = name, "resolved full object id");
                Ok(oid)
            } else {
                Err(Self::unknown(name))
            };
        }

        if Self::looks_like_abbreviated_oid(name) {
            return Self::resolve_abbreviated_oid(name, repository);
        }

        if let Some(oid) = repository.refs().read_loose_ref(name)? {
            tracing::debug!(revision = name, %oid, "resolved loose ref");
            return Ok(oid);
        }

        if name == HEAD_REF_NAME {
            return repository
                .refs()
                .read_ref(&SymRefName::new(HEAD_REF_NAME.to_string()))?
                .inspect(|oid| tracing::debug!(%oid, "resolved HEAD"))
                .ok_or_else(|| Self::unknown(name));
        }

        match repository.refs().read_packed_ref(name)? {
            Some(oid) => {
                tracing::debug!(revision = name, %oid, "resolved packed ref");
                Ok(oid)
            }
            None => Err(Self::unknown(name)),
        }
    }

    fn resolve_abbreviated_oid(prefix: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let mut matches = repository.database().find_objects_by_prefix(prefix)?;

        match matches.len() {
            0 => Err(Self::unknown(prefix)),
            1 => {
                let oid = matches.remove(0);
                tracing::debug!(revision = prefix, %oid, "resolved abbreviated object id");
                Ok(oid)
            }
            _ => Err(PitError::AmbiguousRevision {
                revision: prefix.to_string(),
                candidates: matches.into_iter().map(String::from).collect(),
            }
            .into()),
        }
    }

    fn resolve_commit_parent(
        oid: &ObjectId,
        revision: &Revision,
        repository: &Repository,
    ) -> anyhow::Result<ObjectId> {
        let commit = repository.database().parse_object_as_commit(oid)?;

        commit
            .parent()
            .cloned()
            .ok_or_else(|| Self::unknown(&revision.to_string()))
    }

    fn unknown(revision: &str) -> anyhow::Error {
        PitError::UnknownRevision {
            revision: revision.to_string(),
        }
        .into()
    }

    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            let branch_name = BranchName::try_parse(resolved_name.to_string())
                .map_err(|_| Self::unknown(revision))?;

            Ok(Revision::Ref(branch_name))
        }
    }

    fn looks_like_abbreviated_oid(s: &str) -> bool {
        (MIN_ABBREVIATED_OID_LENGTH..OBJECT_ID_LENGTH).contains(&s.len())
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{}", name),
            Revision::Parent(base) => write!(f, "{}^", base),
            Revision::Ancestor(base, generations) => write!(f, "{}~{}", base, generations),
        }
    }
}
