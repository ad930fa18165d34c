use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::{self, STALE_FILES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{PitError, pit_error};

/// Where HEAD ended up after a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub oid: ObjectId,
    /// The branch HEAD now points at, `None` when detached
    pub branch: Option<BranchName>,
}

impl Repository {
    /// Switch HEAD, index and working directory to `target`
    ///
    /// Refuses with `DirtyWorkdir`, before touching anything, when a file of
    /// the current HEAD commit is missing or modified on disk. Targets naming
    /// a branch leave HEAD symbolic; anything else detaches it.
    pub fn switch_to(&self, target: &str) -> anyhow::Result<CheckoutOutcome> {
        let (target_oid, branch) = self.resolve_checkout_target(target)?;
        conflict::ensure_clean_workdir(self, &self.head_tree()?)?;

        match &branch {
            Some(branch) => self.refs().set_head_symbolic(branch)?,
            None => self.refs().set_head_detached(&target_oid)?,
        }

        self.load_commit(&target_oid, true)?;

        Ok(CheckoutOutcome {
            oid: target_oid,
            branch,
        })
    }

    /// An existing branch wins over every other reading of `target`, so a
    /// branch named like an abbreviated object id still checks out its tip
    fn resolve_checkout_target(
        &self,
        target: &str,
    ) -> anyhow::Result<(ObjectId, Option<BranchName>)> {
        if let Ok(branch) = BranchName::try_parse(target.to_string()) {
            if self.refs().branch_exists(&branch)? {
                if let Some(oid) = self.refs().read_ref(&branch.to_sym_ref_name())? {
                    self.database().parse_object_as_commit(&oid)?;
                    return Ok((oid, Some(branch)));
                }
            }
        }

        let (oid, _) = self.resolve_commit(target)?;
        Ok((oid, None))
    }

    /// Create `name` at `start_point` (default HEAD), switch to it and hard
    /// reset onto it
    pub fn switch_to_new_branch(
        &self,
        name: &str,
        start_point: Option<&str>,
    ) -> anyhow::Result<CheckoutOutcome> {
        let branch = BranchName::try_parse(name.to_string())?;
        let (base_oid, _) = self.resolve_commit(start_point.unwrap_or(HEAD_REF_NAME))?;

        self.refs().create_branch(&branch, &base_oid)?;
        self.refs().set_head_symbolic(&branch)?;
        self.load_commit(&base_oid, true)?;

        Ok(CheckoutOutcome {
            oid: base_oid,
            branch: Some(branch),
        })
    }

    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let outcome = match self.switch_to(target) {
            Err(error) => {
                if let Some(PitError::DirtyWorkdir { paths }) = pit_error(&error) {
                    eprintln!("error: {}\nAborting", STALE_FILES.render(paths));
                }
                return Err(error);
            }
            Ok(outcome) => outcome,
        };

        match outcome.branch {
            Some(branch) => writeln!(self.writer(), "Switched to branch '{}'", branch)?,
            None => {
                let commit = self.database().parse_object_as_commit(&outcome.oid)?;
                writeln!(
                    self.writer(),
                    "HEAD is now at {} {}",
                    outcome.oid.to_short_oid(),
                    commit.short_message()
                )?
            }
        }

        Ok(())
    }

    pub fn checkout_new_branch(&self, name: &str, start_point: Option<&str>) -> anyhow::Result<()> {
        let outcome = self.switch_to_new_branch(name, start_point)?;

        if let Some(branch) = outcome.branch {
            writeln!(self.writer(), "Switched to a new branch '{}'", branch)?;
        }

        Ok(())
    }
}
