//! Entities and entity identifiers.
//!
//! An [`Entity`] is a named aggregate that exclusively owns its components.
//! It is addressed inside the spatial layers by a lightweight [`EntityId`]
//! handle; the id carries no data and stays valid only as long as the index
//! that issued it still holds the entity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::context::TickContext;
use crate::error::EcsError;
use crate::registry::ComponentRegistry;
use crate::store::ComponentStore;

/// A unique entity identifier issued by a spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create an id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids.
#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next_id: u64,
}

impl EntityIdAllocator {
    /// Creates a new allocator starting at id 0.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocates a fresh entity id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id
    }
}

/// A named, tagged aggregate that owns zero or more components.
///
/// The name is not required to be unique. Tags are an ordered list of
/// strings; duplicates are legal and removal takes out the first exact
/// match. The glyph is what the tilemap's display assembly renders for the
/// entity's cell.
///
/// Dropping the entity drops every owned component; there is deliberately
/// no per-component removal operation.
pub struct Entity {
    name: String,
    glyph: char,
    tags: Vec<String>,
    store: ComponentStore,
    registry: Arc<ComponentRegistry>,
}

impl Entity {
    /// Create an entity with no tags and no components.
    ///
    /// The registry handle sizes the component store and resolves type ids
    /// for every later component operation.
    #[must_use]
    pub fn new(name: impl Into<String>, glyph: char, registry: Arc<ComponentRegistry>) -> Self {
        let store = ComponentStore::new(registry.capacity());
        Self {
            name: name.into(),
            glyph,
            tags: Vec::new(),
            store,
            registry,
        }
    }

    /// The entity's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The character the display assembly renders for this entity.
    #[must_use]
    pub fn glyph(&self) -> char {
        self.glyph
    }

    /// Replace the display glyph.
    pub fn set_glyph(&mut self, glyph: char) {
        self.glyph = glyph;
    }

    /// Append a tag. Duplicates are kept.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Remove the first tag exactly equal to `tag`.
    ///
    /// Returns whether a tag was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
            true
        } else {
            false
        }
    }

    /// Returns `true` if at least one tag equals `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Attach a component, registering its type on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TypeCapacityExhausted`] if `T` is a new type and
    /// the registry is full, or [`EcsError::DuplicateComponent`] if the
    /// entity already has a `T` (the existing instance is kept).
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        let id = self.registry.type_id::<T>()?;
        self.store.insert(id, component)
    }

    /// O(1) presence test. Never registers `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.registry
            .lookup::<T>()
            .is_some_and(|id| self.store.contains(id))
    }

    /// Borrow the entity's `T`, or `None` when absent.
    #[must_use]
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        let id = self.registry.lookup::<T>()?;
        self.store.get(id)?.downcast_ref::<T>()
    }

    /// Mutably borrow the entity's `T`, or `None` when absent.
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        let id = self.registry.lookup::<T>()?;
        self.store.get_mut(id)?.downcast_mut::<T>()
    }

    /// Update every component once, in the order they were added.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.store.update_all(ctx);
    }

    /// Number of components attached.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.store.len()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("glyph", &self.glyph)
            .field("tags", &self.tags)
            .field("components", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position {
        x: i32,
        y: i32,
    }
    impl Component for Position {}

    struct Health {
        current: u32,
    }
    impl Component for Health {}

    struct Stamina;
    impl Component for Stamina {}

    fn registry() -> Arc<ComponentRegistry> {
        Arc::new(ComponentRegistry::default())
    }

    #[test]
    fn test_add_then_has_and_get() {
        let mut player = Entity::new("Player", '@', registry());
        player.add_component(Position { x: 0, y: 0 }).unwrap();
        player.add_component(Health { current: 10 }).unwrap();

        assert!(player.has_component::<Position>());
        assert!(player.has_component::<Health>());
        assert!(!player.has_component::<Stamina>());
        assert_eq!(player.get_component::<Health>().map(|h| h.current), Some(10));
        assert!(player.get_component::<Stamina>().is_none());
        assert_eq!(player.component_count(), 2);
    }

    #[test]
    fn test_get_component_mut_mutates_the_same_instance() {
        let mut e = Entity::new("npc", 'n', registry());
        e.add_component(Position { x: 1, y: 1 }).unwrap();

        if let Some(pos) = e.get_component_mut::<Position>() {
            pos.x = 7;
        }
        assert_eq!(e.get_component::<Position>().map(|p| (p.x, p.y)), Some((7, 1)));
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut e = Entity::new("npc", 'n', registry());
        e.add_component(Health { current: 5 }).unwrap();

        let result = e.add_component(Health { current: 9 });
        assert!(matches!(result, Err(EcsError::DuplicateComponent { .. })));
        assert_eq!(e.get_component::<Health>().map(|h| h.current), Some(5));
    }

    #[test]
    fn test_type_ids_are_shared_across_entities() {
        let registry = registry();
        let mut a = Entity::new("a", 'a', registry.clone());
        let mut b = Entity::new("b", 'b', registry.clone());
        a.add_component(Position { x: 0, y: 0 }).unwrap();
        b.add_component(Position { x: 3, y: 4 }).unwrap();

        // One registration serves every entity.
        assert_eq!(registry.len(), 1);
        assert!(b.has_component::<Position>());
    }

    #[test]
    fn test_capacity_exhaustion_surfaces_through_add() {
        let registry = Arc::new(ComponentRegistry::new(1));
        let mut e = Entity::new("npc", 'n', registry);
        e.add_component(Position { x: 0, y: 0 }).unwrap();

        let result = e.add_component(Health { current: 1 });
        assert!(matches!(
            result,
            Err(EcsError::TypeCapacityExhausted { capacity: 1, .. })
        ));
        assert!(!e.has_component::<Health>());
    }

    #[test]
    fn test_tags_ordered_with_duplicates() {
        let mut e = Entity::new("door", '+', registry());
        e.add_tag("openable");
        e.add_tag("wooden");
        e.add_tag("openable");

        assert_eq!(e.tags(), &["openable", "wooden", "openable"]);
        assert!(e.has_tag("wooden"));

        // Removal takes the first match only.
        assert!(e.remove_tag("openable"));
        assert_eq!(e.tags(), &["wooden", "openable"]);
        assert!(!e.remove_tag("stone"));
    }

    #[test]
    fn test_glyph_accessors() {
        let mut e = Entity::new("slime", 's', registry());
        assert_eq!(e.glyph(), 's');
        e.set_glyph('S');
        assert_eq!(e.glyph(), 'S');
    }
}
