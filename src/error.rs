// src/error.rs
//! Errors raised by the participant registry.

/// Failures reported by [`crate::ParticipantRegistry`] and its configuration.
///
/// A missing address is never an error: lookups and removals return `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// `put` was called with a nil address. The registry is left unchanged.
    #[error("cannot bind a listener to nil address {0}")]
    NilAddress(String),

    /// The registry configuration cannot be used to build the map.
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),
}
