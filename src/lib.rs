// src/lib.rs
//! Participant registry for spaces in a multi-agent runtime.
//!
//! A space keeps one [`ParticipantRegistry`] mapping each participant's
//! [`Address`] to the [`EventListener`] that receives its events. Joining and
//! leaving a space is a `put` / `remove`; dispatch resolves destinations with
//! `get` or iterates `entries`.
//!
//! ```
//! use std::sync::Arc;
//! use participant_registry::{mailbox, EventListener, ParticipantRegistry, Pid};
//!
//! let registry: ParticipantRegistry<Pid, dyn EventListener> = ParticipantRegistry::new();
//! let (listener, _rx) = mailbox();
//! assert!(registry.put(1, Arc::new(listener)).unwrap().is_none());
//! assert!(registry.contains_address(&1));
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod listener;
pub mod registry;

pub use address::{Address, AgentAddress, Pid, SpaceId};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use listener::{bounded_mailbox, mailbox, Event, EventListener, MailboxListener, MailboxReceiver};
pub use registry::ParticipantRegistry;
