//! The spatial entity index and its frame sweep.
//!
//! [`GridIndex`] owns every entity registered with it and buckets their ids
//! by grid cell. It is the only path by which the per-frame update reaches
//! entities.
//!
//! ## Sweep policy
//!
//! `update` snapshots the (cell, id) visit list before touching any entity,
//! updates each live entity exactly once, and defers every index mutation
//! components request into a command queue that is applied — in request
//! order — after the sweep. An entity can therefore move or despawn itself
//! (or others) from inside its own `update` without crashing the iteration,
//! being visited twice, or being skipped; entities spawned mid-sweep are
//! first visited on the next frame.

use std::collections::HashMap;

use tracing::debug;

use glyph_component::{Entity, EntityId, EntityIdAllocator, GridCommand, GridPos, TickContext};

use crate::buckets::SpatialBuckets;
use crate::snapshot::GridSnapshot;

/// Coordinate-keyed entity storage plus the frame update sweep.
#[derive(Debug, Default)]
pub struct GridIndex {
    /// Issues entity handles.
    allocator: EntityIdAllocator,
    /// The entities themselves, keyed by handle.
    entities: HashMap<EntityId, Entity>,
    /// Which cell each entity occupies.
    buckets: SpatialBuckets<EntityId>,
    /// Frame counter, incremented at the start of every sweep.
    tick: u64,
}

impl GridIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityIdAllocator::new(),
            entities: HashMap::new(),
            buckets: SpatialBuckets::new(),
            tick: 0,
        }
    }

    /// Take ownership of `entity` and register it at `pos`.
    ///
    /// Returns the handle used for every later lookup, move, or removal.
    pub fn insert(&mut self, entity: Entity, pos: GridPos) -> EntityId {
        let id = self.allocator.allocate();
        debug!(%id, name = entity.name(), %pos, "entity registered");
        self.entities.insert(id, entity);
        self.buckets.insert(id, pos);
        id
    }

    /// Remove the entity with handle `id` from exactly the cell `pos`.
    ///
    /// On success the entity is handed back to the caller — dropping the
    /// return value destroys it, holding it keeps it alive. A miss (wrong
    /// cell, unknown id, or a second removal of the same pair) returns
    /// `None` and mutates nothing.
    pub fn remove(&mut self, id: EntityId, pos: GridPos) -> Option<Entity> {
        if !self.buckets.remove_at(id, pos) {
            return None;
        }
        debug!(%id, %pos, "entity removed");
        self.entities.remove(&id)
    }

    /// Remove the entity from whichever cell holds it.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let pos = self.buckets.detach(id)?;
        debug!(%id, %pos, "entity despawned");
        self.entities.remove(&id)
    }

    /// Relocate an entity to `to`.
    ///
    /// Atomic from the caller's perspective: afterwards the id is in the
    /// new cell only, appended last. Returns `false` for unknown ids.
    pub fn move_to(&mut self, id: EntityId, to: GridPos) -> bool {
        match self.buckets.move_to(id, to) {
            Some(from) => {
                debug!(%id, %from, %to, "entity moved");
                true
            }
            None => false,
        }
    }

    /// Run one frame: sweep every entity, then apply the queued commands.
    pub fn update(&mut self) {
        let commands = self.sweep();
        self.apply_commands(commands);
    }

    /// Update every entity exactly once and return the commands they
    /// queued, without applying them.
    ///
    /// Callers that need to vet commands (the tilemap bounds-checks moves)
    /// use this with [`GridIndex::apply_commands`]; everyone else calls
    /// [`GridIndex::update`].
    pub fn sweep(&mut self) -> Vec<GridCommand> {
        self.tick += 1;
        let visit = self.buckets.pairs();
        let visited = visit.len();
        let mut commands = Vec::new();

        for (pos, id) in visit {
            // Entities only leave the map through deferred commands, so
            // every snapshotted id should still be live; a miss is benign.
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            let mut ctx = TickContext::new(id, pos, self.tick, &mut commands);
            entity.update(&mut ctx);
        }

        debug!(
            tick = self.tick,
            entities = visited,
            queued = commands.len(),
            "sweep complete"
        );
        commands
    }

    /// Apply deferred commands in order.
    ///
    /// Commands naming ids that have since disappeared are dropped; a
    /// despawned entity's queued move must not resurrect it.
    pub fn apply_commands(&mut self, commands: Vec<GridCommand>) {
        for command in commands {
            match command {
                GridCommand::Move { entity, to } => {
                    if !self.move_to(entity, to) {
                        debug!(%entity, %to, "move command dropped, unknown entity");
                    }
                }
                GridCommand::Despawn { entity } => {
                    if self.despawn(entity).is_none() {
                        debug!(%entity, "despawn command dropped, unknown entity");
                    }
                }
                GridCommand::Spawn { entity, pos } => {
                    self.insert(*entity, pos);
                }
            }
        }
    }

    /// A read-only copy of the coordinate→entities layout.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::new(
            self.buckets
                .iter()
                .map(|(pos, ids)| (pos, ids.to_vec()))
                .collect(),
        )
    }

    /// Iterate occupied cells in ascending coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, &[EntityId])> {
        self.buckets.iter()
    }

    /// Borrow an entity by handle.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutably borrow an entity by handle.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The cell an entity currently occupies.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<GridPos> {
        self.buckets.position(id)
    }

    /// The entity ids at `pos`, in append order.
    #[must_use]
    pub fn entities_at(&self, pos: GridPos) -> &[EntityId] {
        self.buckets.at(pos)
    }

    /// Number of entities registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the index holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.buckets.cell_count()
    }

    /// Number of completed sweeps.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
