//! Stock consumers for the implementors registry.
//!
//! # Responsibility
//! - Provide the page-wide merged view a documentation UI renders from.
//! - Provide an ordered delivery log for tracing and tests.
//! - Let the session owner keep reading a consumer the registry holds.

pub mod merged;

pub use merged::{MergedImplementors, RecordingConsumer, SharedConsumer};
