// src/address.rs
//! Participant addresses used as registry keys.

use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

/// Raw process identifier. `0` is reserved as the nil pid.
pub type Pid = u64;

/// Key type accepted by [`crate::ParticipantRegistry`].
///
/// Addresses are compared by value. Keep them small and cheap to clone and
/// hash: the registry clones them on every iteration step.
pub trait Address: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {
    /// Whether this value is the unbound placeholder that must never be
    /// stored in a registry.
    fn is_nil(&self) -> bool {
        false
    }
}

impl Address for Pid {
    fn is_nil(&self) -> bool {
        *self == 0
    }
}

impl Address for String {
    fn is_nil(&self) -> bool {
        self.is_empty()
    }
}

/// Identifier of the space a participant lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpaceId(Uuid);

impl SpaceId {
    /// Creates a new random space id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SpaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of an agent inside a given space.
///
/// The nil address is the one whose agent id is the nil UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentAddress {
    space: SpaceId,
    agent: Uuid,
}

impl AgentAddress {
    pub const fn new(space: SpaceId, agent: Uuid) -> Self {
        Self { space, agent }
    }

    /// Address for a fresh agent (UUID v4) in `space`.
    pub fn random(space: SpaceId) -> Self {
        Self::new(space, Uuid::new_v4())
    }

    pub const fn space(&self) -> SpaceId {
        self.space
    }

    pub const fn agent(&self) -> Uuid {
        self.agent
    }
}

impl Address for AgentAddress {
    fn is_nil(&self) -> bool {
        self.agent.is_nil()
    }
}

impl fmt::Display for AgentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.space, self.agent)
    }
}
