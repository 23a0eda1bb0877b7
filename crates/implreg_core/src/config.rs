//! Registry and loader configuration.
//!
//! # Responsibility
//! - Carry the pending policy and log level chosen by the host.
//! - Parse the string forms used in JSON config and CLI flags.

use crate::logging::{default_log_level, normalize_level};
use crate::registry::implementors::{
    ImplementorsRegistry, PendingPolicy, PENDING_POLICY_BUFFERED, PENDING_POLICY_SINGLE_SLOT,
};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Host-provided registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub pending_policy: PendingPolicy,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pending_policy: PendingPolicy::default(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl RegistryConfig {
    /// Parses and validates a JSON config document.
    ///
    /// Missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }

    /// Creates an empty registry using this configuration.
    pub fn build_registry<'c>(&self) -> ImplementorsRegistry<'c> {
        ImplementorsRegistry::with_policy(self.pending_policy)
    }
}

/// Parses a pending policy from its config/CLI string.
pub fn parse_pending_policy(value: &str) -> Result<PendingPolicy, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ConfigError::EmptyPendingPolicy);
    }

    match normalized.as_str() {
        PENDING_POLICY_SINGLE_SLOT => Ok(PendingPolicy::SingleSlot),
        PENDING_POLICY_BUFFERED => Ok(PendingPolicy::Buffered),
        other => Err(ConfigError::UnknownPendingPolicy(other.to_string())),
    }
}

impl FromStr for PendingPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_pending_policy(value)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPendingPolicy,
    UnknownPendingPolicy(String),
    InvalidLogLevel(String),
    Malformed(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPendingPolicy => write!(f, "pending policy must not be empty"),
            Self::UnknownPendingPolicy(value) => write!(
                f,
                "unknown pending policy `{value}`; expected {PENDING_POLICY_SINGLE_SLOT}|{PENDING_POLICY_BUFFERED}"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::Malformed(message) => write!(f, "config is not valid JSON: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{parse_pending_policy, ConfigError, RegistryConfig};
    use crate::registry::implementors::{PendingPolicy, RegistryState};

    #[test]
    fn parses_policy_strings_case_insensitively() {
        assert_eq!(
            parse_pending_policy(" Single-Slot ").expect("single slot"),
            PendingPolicy::SingleSlot
        );
        assert_eq!(
            "buffered".parse::<PendingPolicy>().expect("buffered"),
            PendingPolicy::Buffered
        );
        assert_eq!(
            parse_pending_policy("   ").expect_err("blank"),
            ConfigError::EmptyPendingPolicy
        );
        assert!(matches!(
            parse_pending_policy("queue"),
            Err(ConfigError::UnknownPendingPolicy(_))
        ));
    }

    #[test]
    fn json_config_falls_back_to_defaults() {
        let config = RegistryConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, RegistryConfig::default());

        let config = RegistryConfig::from_json_str(r#"{"pending_policy":"buffered","log_level":"WARN"}"#)
            .expect("full config");
        assert_eq!(config.pending_policy, PendingPolicy::Buffered);
        assert_eq!(config.build_registry().policy(), PendingPolicy::Buffered);
        assert_eq!(config.build_registry().state(), RegistryState::Uninitialized);
    }

    #[test]
    fn json_config_rejects_bad_values() {
        assert!(matches!(
            RegistryConfig::from_json_str(r#"{"log_level":"loud"}"#),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            RegistryConfig::from_json_str(r#"{"pending_policy":"queue"}"#),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            RegistryConfig::from_json_str(r#"{"extra":true}"#),
            Err(ConfigError::Malformed(_))
        ));
    }
}
