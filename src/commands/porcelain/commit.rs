use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Snapshot the index as a tree and record a commit pointing at it
    ///
    /// The parent is whatever HEAD resolves to; on the first commit there is
    /// none and the commit body carries no parent line. The master ref is
    /// moved to the new commit only after the commit object is stored.
    pub async fn commit(&mut self, message: &str, author: Option<&str>) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let tree = Tree::build(index.entries());
        let tree_id = self.database().store(tree)?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = match author {
            Some(display_name) => Author::try_from_display_name(display_name)?,
            None => Author::load_from_env()?,
        };
        let message = message.trim().to_string();

        let commit = Commit::new(Vec::from_iter(parent), tree_id, author, message);
        let commit_id = self.database().store(commit.clone())?;
        self.refs().update_head(&commit_id)?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
