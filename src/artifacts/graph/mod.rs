//! Reachability over the object graph
//!
//! Walks commits and trees to compute the set of object ids reachable from a
//! tip. Push uses the closure difference between the local and remote tips to
//! decide which objects to pack.

pub mod closure;
