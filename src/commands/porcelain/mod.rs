//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level user interface for version
//! control. Each one is an `impl Repository` block composing the repository
//! areas into a workflow.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `status`: List the staged files
//! - `push`: Send local history to a remote repository

pub mod add;
pub mod commit;
pub mod init;
pub mod push;
pub mod status;
