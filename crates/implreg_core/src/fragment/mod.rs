//! Generated implementors fragment scripts.
//!
//! # Responsibility
//! - Decode the object literal a fragment script registers into a
//!   `Contribution`.
//! - Render a `Contribution` back into the script envelope the documentation
//!   generator emits.
//! - Map a fragment's file path to the trait path it lists implementors for.
//!
//! # Invariants
//! - Entry markup is carried verbatim; it is never parsed.

pub mod codec;
