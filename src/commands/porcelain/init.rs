use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the repository skeleton under `.git`
    ///
    /// Lays down the object directory, the heads directory, and a HEAD file
    /// pointing at the master branch. The index file and the master ref file
    /// are not created here; both appear on first use (first `add`, first
    /// commit).
    pub async fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        self.refs()
            .set_head()
            .context("Failed to create initial HEAD reference")?;

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
