// src/config.rs
//! Registry sizing, loaded from defaults or environment variables.

use crate::error::RegistryError;

/// Sizing knobs for the sharded map behind a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of bindings to reserve room for up front.
    pub initial_capacity: usize,

    /// Number of independently locked shards. Must be a power of two
    /// greater than 1.
    pub shard_amount: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            shard_amount: default_shard_amount(),
        }
    }
}

impl RegistryConfig {
    /// Reads `PARTICIPANT_REGISTRY_CAPACITY` and `PARTICIPANT_REGISTRY_SHARDS`.
    ///
    /// Missing or unparseable values fall back to the defaults. The result is
    /// not validated; [`crate::ParticipantRegistry::with_config`] does that.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: parse_env("PARTICIPANT_REGISTRY_CAPACITY", defaults.initial_capacity),
            shard_amount: parse_env("PARTICIPANT_REGISTRY_SHARDS", defaults.shard_amount),
        }
    }

    /// Checks that the shard amount can back a map.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.shard_amount < 2 || !self.shard_amount.is_power_of_two() {
            return Err(RegistryError::InvalidConfig(format!(
                "shard amount must be a power of two greater than 1, got {}",
                self.shard_amount
            )));
        }
        Ok(())
    }
}

fn default_shard_amount() -> usize {
    (num_cpus::get() * 4).next_power_of_two().max(2)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
