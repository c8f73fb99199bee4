//! A minimal distributed version-control engine.
//!
//! The crate is organized in three layers:
//!
//! - `areas`: path-owning collaborators (object database, index, refs,
//!   workspace, remote peer) coordinated by the [`areas::repository::Repository`]
//! - `artifacts`: data structures and algorithms (objects, index codec,
//!   reachability closure, pack stream)
//! - `commands`: user-facing operations implemented on the repository

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
