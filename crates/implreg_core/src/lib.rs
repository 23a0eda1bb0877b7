//! Implementors registry for generated documentation pages.
//! Fragments register trait-implementor listings; one consumer receives them
//! whether it attaches before, after, or between fragment loads.

pub mod config;
pub mod consumer;
pub mod fragment;
pub mod loader;
pub mod logging;
pub mod model;
pub mod registry;

pub use config::{parse_pending_policy, ConfigError, RegistryConfig};
pub use consumer::{MergedImplementors, RecordingConsumer, SharedConsumer};
pub use fragment::codec::{decode_fragment, render_fragment, trait_path_from_relative, FragmentError};
pub use loader::replay::{
    discover_fragments, implementors_root, load_fragment, replay_into, FragmentFile, LoadReport,
    LoaderError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contribution::{Contribution, ImplementorEntry, LibraryKey};
pub use registry::implementors::{
    ImplementorsConsumer, ImplementorsRegistry, PendingPolicy, RegistryState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
