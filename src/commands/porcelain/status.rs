use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{ChangeSet, Status, StatusReport};
use colored::Colorize;

const LABEL_WIDTH: usize = 8;

impl Repository {
    /// Compare HEAD, index and workspace without writing anything
    pub fn status_report(&self) -> anyhow::Result<StatusReport> {
        let index = self.load_index()?;
        let ignore_rules = self.ignore_rules()?;

        Status::new(self).report(&index, &ignore_rules)
    }

    pub fn status(&self, short: bool) -> anyhow::Result<()> {
        let report = self.status_report()?;

        if short {
            self.print_short_format(&report)
        } else {
            self.print_long_format(&report)
        }
    }

    fn print_short_format(&self, report: &StatusReport) -> anyhow::Result<()> {
        for (path, change) in report.changed_files() {
            writeln!(self.writer(), "{} {}", change, path.display())?;
        }

        for path in report.untracked() {
            writeln!(self.writer(), "?? {}", path.display())?;
        }

        Ok(())
    }

    fn print_long_format(&self, report: &StatusReport) -> anyhow::Result<()> {
        self.print_head_line()?;

        self.print_changeset("Changes to be committed:", &report.index_changeset())?;
        self.print_changeset("Changes not staged for commit:", &report.workspace_changeset())?;

        if !report.untracked().is_empty() {
            writeln!(self.writer(), "Untracked files:")?;
            for path in report.untracked() {
                let path = path.display().to_string();
                writeln!(self.writer(), "{:>width$}{}", "", path.red(), width = LABEL_WIDTH)?;
            }
            writeln!(self.writer())?;
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }

    fn print_head_line(&self) -> anyhow::Result<()> {
        match (self.refs().current_branch()?, self.refs().read_head()?) {
            (Some(branch), head) => {
                writeln!(self.writer(), "On branch {}", branch)?;
                if head.is_none() {
                    writeln!(self.writer(), "\nNo commits yet\n")?;
                }
            }
            (None, Some(head)) => {
                writeln!(self.writer(), "HEAD detached at {}", head.to_short_oid())?
            }
            (None, None) => {}
        }

        Ok(())
    }

    fn print_changeset(&self, title: &str, changeset: &ChangeSet) -> anyhow::Result<()> {
        if changeset.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "{}", title)?;
        for (path, change) in changeset {
            writeln!(self.writer(), "{}{}", change, path.display())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
