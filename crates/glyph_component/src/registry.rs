//! Component type registry — first-use id assignment with a checked
//! capacity.
//!
//! The registry is constructed once at startup, shared as an
//! `Arc<ComponentRegistry>`, and queried thereafter. Every distinct
//! component type gets a [`ComponentTypeId`] the first time it is
//! registered, in first-use order starting at 0. Once `capacity` distinct
//! types exist, registering another type is a loud failure instead of an
//! out-of-bounds write into per-entity slot storage.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::component::{Component, ComponentTypeId};
use crate::error::EcsError;

/// Default maximum number of distinct component types.
pub const DEFAULT_MAX_COMPONENT_TYPES: usize = 32;

/// Assigns and resolves [`ComponentTypeId`]s.
///
/// Lifecycle: built once at process start (capacity is a startup-time
/// parameter), then shared behind an `Arc` by every entity. The maps are
/// concurrent so sharing needs no `&mut` plumbing.
#[derive(Debug)]
pub struct ComponentRegistry {
    /// Maximum number of distinct component types.
    capacity: usize,
    /// Rust type → assigned id.
    ids: DashMap<TypeId, ComponentTypeId>,
    /// Assigned id → human-readable type name, for diagnostics.
    names: DashMap<ComponentTypeId, &'static str>,
    /// Next id to assign. Never exceeds `capacity`.
    next: AtomicUsize,
}

impl ComponentRegistry {
    /// Create a registry that admits at most `capacity` distinct component
    /// types.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ids: DashMap::new(),
            names: DashMap::new(),
            next: AtomicUsize::new(0),
        }
    }

    /// Returns the id for `T`, assigning one on first use.
    ///
    /// The same `T` always resolves to the same id; distinct types get
    /// distinct ids, dense from 0 in first-use order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeCapacityExhausted`] when `T` is new and all
    /// `capacity` ids are taken. Already-registered types keep resolving.
    pub fn type_id<T: Component>(&self) -> Result<ComponentTypeId, EcsError> {
        match self.ids.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let assigned = self
                    .next
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                        (n < self.capacity).then_some(n + 1)
                    });
                match assigned {
                    Ok(index) => {
                        let id = ComponentTypeId(index);
                        entry.insert(id);
                        self.names.insert(id, std::any::type_name::<T>());
                        Ok(id)
                    }
                    Err(_) => Err(EcsError::TypeCapacityExhausted {
                        type_name: std::any::type_name::<T>(),
                        capacity: self.capacity,
                    }),
                }
            }
        }
    }

    /// Resolve `T` without registering it.
    ///
    /// Presence queries go through this so probing for a type an entity
    /// never had does not consume a capacity slot.
    #[must_use]
    pub fn lookup<T: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<T>()).map(|id| *id)
    }

    /// Returns the type name registered under `id`, if any.
    #[must_use]
    pub fn name_of(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(&id).map(|name| *name)
    }

    /// Number of component types registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }

    /// Returns `true` if no component type has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured maximum number of distinct component types.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPONENT_TYPES)
    }
}
