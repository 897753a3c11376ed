// src/registry.rs
//! Participant registry: binds participant addresses to their listeners.
//! A space owns one registry, updates it on join/leave and resolves
//! destinations through it on dispatch.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::address::Address;
use crate::config::RegistryConfig;
use crate::error::RegistryError;

/// Concurrent map from participant address to listener handle.
///
/// Every method takes `&self` and is safe to call from any number of threads.
/// Listeners are held as shared `Arc`s; the registry never calls them.
///
/// # Concurrency
///
/// - Every single-key operation (`get`, `put`, `remove`, `contains_address`)
///   is atomic.
/// - `clear` and `snapshot` are atomic with respect to writers: they wait for
///   in-flight `put`/`remove` calls and hold off new ones until done.
///   Readers are not part of this exclusion.
/// - `len`, `is_empty` and `contains_listener` walk the shards and may miss
///   changes made during the walk.
/// - `addresses`, `listeners` and `entries` are live, weakly-consistent
///   views. They never fail and never yield an address twice. Reads are fine
///   while iterating, but each view holds a read lock on one shard at a time,
///   so the iterating thread must not `put`, `remove` or `clear`. Use
///   [`ParticipantRegistry::snapshot`] for that.
pub struct ParticipantRegistry<A: Address, L: ?Sized + Send + Sync> {
    listeners: DashMap<A, Arc<L>>,
    /// Shared by `put`/`remove`, exclusive for `clear`/`snapshot`. Readers
    /// never take it: they may run inside a live view, which `clear` can be
    /// waiting on.
    gate: RwLock<()>,
}

impl<A: Address, L: ?Sized + Send + Sync> ParticipantRegistry<A, L> {
    /// Create a new, empty registry with the default configuration.
    pub fn new() -> Self {
        tracing::debug!("creating participant registry");
        Self {
            listeners: DashMap::new(),
            gate: RwLock::new(()),
        }
    }

    /// Create an empty registry sized according to `config`.
    pub fn with_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        tracing::debug!(
            capacity = config.initial_capacity,
            shards = config.shard_amount,
            "creating participant registry"
        );
        Ok(Self {
            listeners: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shard_amount,
            ),
            gate: RwLock::new(()),
        })
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn contains_address(&self, addr: &A) -> bool {
        self.listeners.contains_key(addr)
    }

    /// Whether `listener` (the same `Arc` allocation) is bound to any address.
    /// Linear in the number of bindings.
    pub fn contains_listener(&self, listener: &Arc<L>) -> bool {
        self.listeners
            .iter()
            .any(|entry| Arc::ptr_eq(entry.value(), listener))
    }

    /// Listener bound to `addr`, if any.
    pub fn get(&self, addr: &A) -> Option<Arc<L>> {
        self.listeners.get(addr).map(|l| Arc::clone(l.value()))
    }

    /// Bind `listener` to `addr`, returning the listener it replaces.
    ///
    /// Nil addresses are rejected with [`RegistryError::NilAddress`] and the
    /// registry is left untouched.
    pub fn put(&self, addr: A, listener: Arc<L>) -> Result<Option<Arc<L>>, RegistryError> {
        if addr.is_nil() {
            tracing::warn!(address = ?addr, "rejected listener for nil address");
            return Err(RegistryError::NilAddress(format!("{addr:?}")));
        }

        let _gate = self.gate.read();
        match self.listeners.entry(addr) {
            Entry::Occupied(mut bound) => {
                tracing::trace!(address = ?bound.key(), "replacing listener");
                Ok(Some(bound.insert(listener)))
            }
            Entry::Vacant(free) => {
                tracing::trace!(address = ?free.key(), "binding listener");
                free.insert(listener);
                Ok(None)
            }
        }
    }

    /// Unbind `addr`, returning the listener that was bound.
    pub fn remove(&self, addr: &A) -> Option<Arc<L>> {
        let _gate = self.gate.read();
        let removed = self.listeners.remove(addr).map(|(_, l)| l);
        if removed.is_some() {
            tracing::trace!(address = ?addr, "removed listener");
        }
        removed
    }

    /// Drop every binding.
    pub fn clear(&self) {
        let _gate = self.gate.write();
        let count = self.listeners.len();
        self.listeners.clear();
        tracing::debug!(count, "cleared participant registry");
    }

    /// Live view of the bound addresses.
    pub fn addresses(&self) -> impl Iterator<Item = A> + '_ {
        self.listeners.iter().map(|entry| entry.key().clone())
    }

    /// Live view of the bound listeners.
    pub fn listeners(&self) -> impl Iterator<Item = Arc<L>> + '_ {
        self.listeners.iter().map(|entry| Arc::clone(entry.value()))
    }

    /// Live view of the bindings.
    ///
    /// Resolving each address with [`get`](Self::get) during the walk is fine.
    /// A space that prunes dead listeners while dispatching must walk a
    /// [`snapshot`](Self::snapshot) instead: calling `remove` from inside this
    /// iterator deadlocks on the shard it is reading.
    pub fn entries(&self) -> impl Iterator<Item = (A, Arc<L>)> + '_ {
        self.listeners
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
    }

    /// Point-in-time copy of every binding.
    ///
    /// Blocks writers while copying, so the result matches the registry at a
    /// single instant and stays valid while the caller mutates the registry.
    pub fn snapshot(&self) -> Vec<(A, Arc<L>)> {
        let _gate = self.gate.write();
        self.entries().collect()
    }
}

impl<A: Address, L: ?Sized + Send + Sync> Default for ParticipantRegistry<A, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Address, L: ?Sized + Send + Sync> fmt::Debug for ParticipantRegistry<A, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticipantRegistry")
            .field("len", &self.len())
            .finish()
    }
}
