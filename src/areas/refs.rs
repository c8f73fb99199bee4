//! References (HEAD and the master branch)
//!
//! References are human-readable names pointing to commits. Two exist here:
//!
//! - HEAD: a symbolic reference to the current branch
//! - refs/heads/master: the single branch, holding its tip commit hash
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! The master file does not exist until the first commit; a missing branch
//! file reads as `None` rather than an error.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Full ref name of the only branch
pub const MASTER_REF: &str = "refs/heads/master";

/// References manager
///
/// Handles reading and writing HEAD and the master branch pointer.
/// Writes go through exclusive file locks.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the refs root (typically `.git`)
    path: Box<Path>,
}

/// Internal representation of a reference value
///
/// Can be either a symbolic reference or a direct object ID.
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { target: String },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                target: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Point HEAD at the master branch. Used once, at repository creation.
    pub fn set_head(&self) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), format!("ref: {}", MASTER_REF))
    }

    /// Read the commit id HEAD resolves to
    ///
    /// Follows symbolic references until reaching a direct object id.
    /// Returns `None` when the branch has no commits yet.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Move the branch HEAD points at to a new commit
    ///
    /// Creates the branch file on the first commit.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_symref(self.head_path().as_ref(), oid)
    }

    /// Read a symbolic reference, following indirection
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { target }) => {
                self.read_symref(self.path.join(target).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Update a reference to point to a new commit, following symrefs
    ///
    /// The final target file is created if it does not exist yet.
    fn update_symref(&self, path: &Path, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { target }) => {
                let target_path = self.path.join(target);
                self.update_symref(target_path.as_path(), oid)
            }
            Some(SymRefOrOid::Oid(_)) | None => {
                self.update_ref_file(path.into(), oid.as_ref().to_string())
            }
        }
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        // open the ref file as WRONLY and CREAT to write commit_id to it
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn master_path(&self) -> Box<Path> {
        self.heads_path().join("master").into_boxed_path()
    }
}
