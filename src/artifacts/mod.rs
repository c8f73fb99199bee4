//! Data structures and algorithms
//!
//! This module contains the core types and algorithms of the engine:
//!
//! - `graph`: reachability closure over the object graph
//! - `index`: index/staging area data structures
//! - `objects`: object types (blob, tree, commit)
//! - `pack`: pack-stream encoding and pkt-line framing

pub mod graph;
pub mod index;
pub mod objects;
pub mod pack;
