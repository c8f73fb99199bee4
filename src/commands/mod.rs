//! Command implementations
//!
//! User-facing commands live under `porcelain`; each composes the repository
//! areas (workspace, index, database, refs, remote) into one workflow.

pub mod porcelain;
