//! Fragment discovery and replay from a generated docs tree.
//!
//! # Responsibility
//! - Find `trait.*.js` fragments under an `implementors/` directory.
//! - Replay them into a registry in a deterministic load order.
//!
//! # Invariants
//! - Load order is sorted relative path order.
//! - One unreadable or malformed fragment never aborts a replay.

pub mod replay;
