//! Per-update context handed to every component.
//!
//! Components never hold a pointer back to their entity or to the spatial
//! index. Instead, each update receives a [`TickContext`] carrying the
//! owning entity's identity and position, plus a queue of [`GridCommand`]s.
//! The index applies the queue after the sweep finishes, so a component can
//! move, spawn, or despawn entities — including its own — without
//! invalidating the iteration in progress.

use crate::entity::{Entity, EntityId};
use crate::grid::GridPos;

/// A deferred mutation of the spatial index.
///
/// Commands are recorded during the update sweep and applied in order once
/// the sweep completes.
#[derive(Debug)]
pub enum GridCommand {
    /// Move an entity to a new cell.
    Move {
        /// The entity to relocate.
        entity: EntityId,
        /// Destination cell.
        to: GridPos,
    },
    /// Remove an entity from the index and drop it.
    Despawn {
        /// The entity to remove.
        entity: EntityId,
    },
    /// Insert a new entity at the given cell.
    ///
    /// Spawned entities are not visited until the next frame's sweep.
    Spawn {
        /// The entity to insert.
        entity: Box<Entity>,
        /// Cell to insert at.
        pos: GridPos,
    },
}

/// The view a component gets of the world for one update call.
#[derive(Debug)]
pub struct TickContext<'a> {
    /// The entity that owns the component being updated.
    entity: EntityId,
    /// That entity's cell at the start of the sweep.
    pos: GridPos,
    /// The current frame counter.
    tick: u64,
    /// Deferred mutations, applied after the sweep.
    commands: &'a mut Vec<GridCommand>,
}

impl<'a> TickContext<'a> {
    /// Create a context for one entity's update.
    #[must_use]
    pub fn new(
        entity: EntityId,
        pos: GridPos,
        tick: u64,
        commands: &'a mut Vec<GridCommand>,
    ) -> Self {
        Self {
            entity,
            pos,
            tick,
            commands,
        }
    }

    /// The id of the entity being updated.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// The cell the entity occupied when the sweep began.
    #[must_use]
    pub fn pos(&self) -> GridPos {
        self.pos
    }

    /// The current frame counter.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Queue a move of the owning entity to `to`.
    pub fn request_move(&mut self, to: GridPos) {
        self.commands.push(GridCommand::Move {
            entity: self.entity,
            to,
        });
    }

    /// Queue removal and destruction of the owning entity.
    pub fn request_despawn(&mut self) {
        self.commands.push(GridCommand::Despawn {
            entity: self.entity,
        });
    }

    /// Queue insertion of a new entity at `pos`.
    pub fn request_spawn(&mut self, entity: Entity, pos: GridPos) {
        self.commands.push(GridCommand::Spawn {
            entity: Box::new(entity),
            pos,
        });
    }

    /// Queue an arbitrary command, e.g. a move of some other entity.
    pub fn push(&mut self, command: GridCommand) {
        self.commands.push(command);
    }
}
