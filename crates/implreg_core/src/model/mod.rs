//! Data carried between fragments, the registry and its consumer.
//!
//! # Responsibility
//! - Define the opaque entry unit and the library key it is filed under.
//! - Define the per-fragment contribution payload.
//!
//! # Invariants
//! - Entries are never inspected beyond their first markup string.
//! - Entry order inside one library is display order and is preserved.

pub mod contribution;
