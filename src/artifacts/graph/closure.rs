use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use derive_new::new;
use std::collections::{BTreeSet, VecDeque};

/// Computes sets of object ids reachable from commits and trees
///
/// Traversal is iterative: a work queue plus a visited set, so deep histories
/// and deeply nested trees cannot exhaust the call stack. No cycle guard is
/// needed beyond the visited set because objects are hash-identified and
/// immutable.
#[derive(new)]
pub struct ObjectClosure<'d> {
    database: &'d Database,
}

impl ObjectClosure<'_> {
    /// All object ids reachable from a commit: the commit itself, its tree
    /// closure, and recursively every ancestor's closure
    pub fn from_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<BTreeSet<ObjectId>> {
        let mut reachable = BTreeSet::new();
        let mut queue = VecDeque::from([commit_oid.clone()]);

        while let Some(commit_oid) = queue.pop_front() {
            if !reachable.insert(commit_oid.clone()) {
                continue;
            }

            let commit = self.load_commit(&commit_oid)?;
            self.collect_tree(commit.tree_oid(), &mut reachable)?;

            for parent in commit.parents() {
                if !reachable.contains(parent) {
                    queue.push_back(parent.clone());
                }
            }
        }

        Ok(reachable)
    }

    /// All object ids reachable from a tree: the tree itself, every blob it
    /// references, and recursively every nested tree's closure
    pub fn from_tree(&self, tree_oid: &ObjectId) -> anyhow::Result<BTreeSet<ObjectId>> {
        let mut reachable = BTreeSet::new();
        self.collect_tree(tree_oid, &mut reachable)?;

        Ok(reachable)
    }

    /// Object ids reachable from `local_oid` but not from `remote_oid`
    ///
    /// With no remote tip, everything reachable locally is missing.
    pub fn missing_objects(
        &self,
        local_oid: &ObjectId,
        remote_oid: Option<&ObjectId>,
    ) -> anyhow::Result<BTreeSet<ObjectId>> {
        let local = self.from_commit(local_oid)?;

        match remote_oid {
            Some(remote_oid) => {
                let remote = self.from_commit(remote_oid)?;
                Ok(local.difference(&remote).cloned().collect())
            }
            None => Ok(local),
        }
    }

    fn collect_tree(
        &self,
        tree_oid: &ObjectId,
        reachable: &mut BTreeSet<ObjectId>,
    ) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([tree_oid.clone()]);

        while let Some(tree_oid) = queue.pop_front() {
            if !reachable.insert(tree_oid.clone()) {
                continue;
            }

            let tree = self
                .database
                .parse_object_as_tree(&tree_oid)?
                .ok_or_else(|| anyhow::anyhow!("Object {} is not a tree", tree_oid))?;

            for record in tree.records() {
                if reachable.contains(&record.oid) {
                    continue;
                }

                // A record points at a blob or a nested tree; only trees
                // need a further walk
                match self.database.parse_object_as_tree(&record.oid)? {
                    Some(_) => queue.push_back(record.oid.clone()),
                    None => {
                        reachable.insert(record.oid.clone());
                    }
                }
            }
        }

        Ok(())
    }

    fn load_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, content) = self.database.retrieve(commit_oid)?;
        if object_type != ObjectType::Commit {
            return Err(RepositoryError::MalformedCommit(format!(
                "object {} is a {}, not a commit",
                commit_oid, object_type
            ))
            .into());
        }

        let commit = Commit::deserialize(content.as_ref()).map_err(|source| {
            RepositoryError::MalformedCommit(format!("{}: {}", commit_oid, source))
        })?;

        Ok(commit)
    }
}
