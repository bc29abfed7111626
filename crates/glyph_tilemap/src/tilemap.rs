//! The tile/entity composite index.
//!
//! A [`Tilemap`] layers tile occupancy on top of the same coordinate space
//! the entity index uses. It enforces its `width` × `height` range on every
//! mutation — including commands queued by components mid-sweep — and
//! rebuilds a row-major display buffer on demand.
//!
//! Disposal is an ownership decision at the call site: `remove_tile` and
//! `remove_entity` return the occupant by value, so dropping the result
//! deconstructs it and binding it keeps it.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use glyph_component::{Entity, EntityId, GridCommand, GridPos};
use glyph_grid::{GridIndex, GridSnapshot, SpatialBuckets};

use crate::tile::{Tile, TileId, TileIdAllocator};

/// Glyph rendered for cells with no tile and no entity.
pub const EMPTY_GLYPH: char = ' ';

/// Errors surfaced by tilemap mutations.
#[derive(Debug, Error)]
pub enum TilemapError {
    /// The target cell lies outside the map.
    #[error("position {pos} is outside the {width}x{height} tilemap")]
    OutOfBounds {
        /// The rejected coordinate.
        pos: GridPos,
        /// Map width.
        width: i32,
        /// Map height.
        height: i32,
    },

    /// No tile is registered under the given handle.
    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    /// No entity is registered under the given handle.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// Tile and entity layers over one `width` × `height` grid, plus the
/// assembled display buffer.
#[derive(Debug)]
pub struct Tilemap {
    width: i32,
    height: i32,
    tile_allocator: TileIdAllocator,
    /// Tile storage, keyed by handle.
    tiles: HashMap<TileId, Tile>,
    /// Which cell each tile occupies.
    tile_cells: SpatialBuckets<TileId>,
    /// The entity layer: arena, buckets, and the frame sweep.
    entities: GridIndex,
    /// Row-major glyph buffer, rebuilt by [`Tilemap::assemble`].
    display: Vec<char>,
}

impl Tilemap {
    /// Create an empty tilemap. Both dimensions must be positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "tilemap dimensions must be positive"
        );
        Self {
            width,
            height,
            tile_allocator: TileIdAllocator::new(),
            tiles: HashMap::new(),
            tile_cells: SpatialBuckets::new(),
            entities: GridIndex::new(),
            display: vec![EMPTY_GLYPH; (width * height) as usize],
        }
    }

    /// Map width in cells.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height in cells.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns `true` if `pos` lies within the map.
    #[must_use]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    /// Returns `true` if `pos` is inside the map and no tile there blocks
    /// movement.
    #[must_use]
    pub fn can_enter(&self, pos: GridPos) -> bool {
        self.in_bounds(pos)
            && self
                .tile_cells
                .at(pos)
                .iter()
                .all(|id| self.tiles.get(id).is_none_or(Tile::is_traversable))
    }

    fn check_bounds(&self, pos: GridPos) -> Result<(), TilemapError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(TilemapError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Place a tile without a bounds check. Callers guarantee the range.
    fn place_tile(&mut self, tile: Tile, pos: GridPos) -> TileId {
        let id = self.tile_allocator.allocate();
        self.tiles.insert(id, tile);
        self.tile_cells.insert(id, pos);
        id
    }

    /// Take ownership of `tile` and place it at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`TilemapError::OutOfBounds`] if `pos` is outside the map.
    pub fn add_tile(&mut self, tile: Tile, pos: GridPos) -> Result<TileId, TilemapError> {
        self.check_bounds(pos)?;
        debug!(name = tile.name(), %pos, "tile placed");
        Ok(self.place_tile(tile, pos))
    }

    /// Take ownership of `entity` and register it at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`TilemapError::OutOfBounds`] if `pos` is outside the map.
    pub fn add_entity(&mut self, entity: Entity, pos: GridPos) -> Result<EntityId, TilemapError> {
        self.check_bounds(pos)?;
        Ok(self.entities.insert(entity, pos))
    }

    /// Remove a tile, handing it back to the caller.
    ///
    /// Dropping the returned tile deconstructs it; binding it keeps it.
    /// Unknown handles return `None`.
    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tile_cells.detach(id)?;
        debug!(%id, %pos, "tile removed");
        self.tiles.remove(&id)
    }

    /// Remove an entity, handing it back to the caller.
    ///
    /// Dropping the returned entity deconstructs it (and every component it
    /// owns); binding it keeps it. Unknown handles return `None`.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.despawn(id)
    }

    /// Relocate a tile to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TilemapError::OutOfBounds`] for targets outside the map
    /// (the tile stays put) and [`TilemapError::UnknownTile`] for handles
    /// the map does not hold.
    pub fn move_tile(&mut self, id: TileId, to: GridPos) -> Result<(), TilemapError> {
        self.check_bounds(to)?;
        match self.tile_cells.move_to(id, to) {
            Some(from) => {
                debug!(%id, %from, %to, "tile moved");
                Ok(())
            }
            None => Err(TilemapError::UnknownTile(id)),
        }
    }

    /// Relocate an entity to `to`.
    ///
    /// Atomic from the caller's perspective: on success the entity is in
    /// the new cell only; on any error it has not moved.
    ///
    /// # Errors
    ///
    /// Returns [`TilemapError::OutOfBounds`] for targets outside the map
    /// and [`TilemapError::UnknownEntity`] for handles the map does not
    /// hold.
    pub fn move_entity(&mut self, id: EntityId, to: GridPos) -> Result<(), TilemapError> {
        self.check_bounds(to)?;
        if self.entities.move_to(id, to) {
            Ok(())
        } else {
            Err(TilemapError::UnknownEntity(id))
        }
    }

    /// Run one frame of the entity layer.
    ///
    /// Sweeps every entity once, then applies the queued commands with the
    /// map mediating movement: moves out of range or into a cell a solid
    /// tile blocks are rejected (the mover stays put), and spawns outside
    /// the map are dropped.
    pub fn update_entities(&mut self) {
        let commands = self.entities.sweep();
        let mut accepted = Vec::with_capacity(commands.len());
        for command in commands {
            let allowed = match &command {
                GridCommand::Move { to, .. } => self.can_enter(*to),
                GridCommand::Spawn { pos, .. } => self.in_bounds(*pos),
                GridCommand::Despawn { .. } => true,
            };
            if allowed {
                accepted.push(command);
            } else {
                debug!(command = ?command, "command rejected by the map");
            }
        }
        self.entities.apply_commands(accepted);
    }

    /// Blanket every cell with a clone of `prototype`.
    pub fn fill(&mut self, prototype: &Tile) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.place_tile(prototype.clone(), GridPos::new(x, y));
            }
        }
        debug!(
            name = prototype.name(),
            tiles = self.width * self.height,
            "tilemap filled"
        );
    }

    /// Rebuild the display buffer and return it.
    ///
    /// Per cell: the most-recently-added tile's glyph, overridden by the
    /// most-recently-added entity's glyph. Entities always render over
    /// tiles; within a layer, append order is the tie-break.
    pub fn assemble(&mut self) -> &[char] {
        self.display.fill(EMPTY_GLYPH);

        for (pos, ids) in self.tile_cells.iter() {
            if let Some(id) = ids.last()
                && let Some(tile) = self.tiles.get(id)
            {
                self.display[(pos.y * self.width + pos.x) as usize] = tile.glyph();
            }
        }
        for (pos, ids) in self.entities.cells() {
            if let Some(&id) = ids.last()
                && let Some(entity) = self.entities.get(id)
            {
                self.display[(pos.y * self.width + pos.x) as usize] = entity.glyph();
            }
        }

        &self.display
    }

    /// The display buffer as last assembled (row-major, `width` × `height`).
    #[must_use]
    pub fn display(&self) -> &[char] {
        &self.display
    }

    /// The display buffer as one string per row, for terminal output.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        self.display
            .chunks(self.width as usize)
            .map(|row| row.iter().collect())
            .collect()
    }

    /// A read-only copy of the entity layer's layout.
    #[must_use]
    pub fn entity_snapshot(&self) -> GridSnapshot {
        self.entities.snapshot()
    }

    /// Borrow a tile by handle.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Borrow an entity by handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutably borrow an entity by handle.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// The tile ids at `pos`, in append order.
    #[must_use]
    pub fn tiles_at(&self, pos: GridPos) -> &[TileId] {
        self.tile_cells.at(pos)
    }

    /// The entity ids at `pos`, in append order.
    #[must_use]
    pub fn entities_at(&self, pos: GridPos) -> &[EntityId] {
        self.entities.entities_at(pos)
    }

    /// The cell an entity currently occupies.
    #[must_use]
    pub fn entity_position(&self, id: EntityId) -> Option<GridPos> {
        self.entities.position_of(id)
    }

    /// Number of tiles on the map.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of entities on the map.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyph_component::{Component, ComponentRegistry, TickContext};

    use super::*;

    struct Runner {
        dx: i32,
        dy: i32,
    }
    impl Component for Runner {
        fn update(&mut self, ctx: &mut TickContext<'_>) {
            ctx.request_move(ctx.pos().offset(self.dx, self.dy));
        }
    }

    struct EdgeSpawner {
        registry: Arc<ComponentRegistry>,
    }
    impl Component for EdgeSpawner {
        fn update(&mut self, ctx: &mut TickContext<'_>) {
            // Always off-map; the tilemap must drop it.
            ctx.request_spawn(
                Entity::new("stray", '?', self.registry.clone()),
                GridPos::new(-1, -1),
            );
        }
    }

    fn registry() -> Arc<ComponentRegistry> {
        Arc::new(ComponentRegistry::default())
    }

    fn entity(registry: &Arc<ComponentRegistry>, name: &str, glyph: char) -> Entity {
        Entity::new(name, glyph, registry.clone())
    }

    #[test]
    fn test_bounds() {
        let map = Tilemap::new(4, 3);
        assert!(map.in_bounds(GridPos::ORIGIN));
        assert!(map.in_bounds(GridPos::new(3, 2)));
        assert!(!map.in_bounds(GridPos::new(4, 0)));
        assert!(!map.in_bounds(GridPos::new(0, 3)));
        assert!(!map.in_bounds(GridPos::new(-1, 1)));
    }

    #[test]
    fn test_add_out_of_bounds_is_rejected() {
        let registry = registry();
        let mut map = Tilemap::new(2, 2);

        let result = map.add_tile(Tile::new("floor", '.'), GridPos::new(5, 0));
        assert!(matches!(result, Err(TilemapError::OutOfBounds { .. })));

        let result = map.add_entity(entity(&registry, "npc", 'n'), GridPos::new(0, -1));
        assert!(matches!(result, Err(TilemapError::OutOfBounds { .. })));
        assert_eq!(map.tile_count(), 0);
        assert_eq!(map.entity_count(), 0);
    }

    #[test]
    fn test_assemble_priority() {
        let registry = registry();
        let mut map = Tilemap::new(3, 1);
        let pos = GridPos::new(1, 0);

        map.add_tile(Tile::new("floor", '.'), pos).unwrap();
        assert_eq!(map.assemble(), &[' ', '.', ' ']);

        // Most-recently-added tile wins within the tile layer.
        map.add_tile(Tile::new("rubble", ','), pos).unwrap();
        assert_eq!(map.assemble(), &[' ', ',', ' ']);

        // Entities render over tiles.
        map.add_entity(entity(&registry, "npc", 'n'), pos).unwrap();
        assert_eq!(map.assemble(), &[' ', 'n', ' ']);

        // Most-recently-added entity wins within the entity layer.
        map.add_entity(entity(&registry, "player", '@'), pos)
            .unwrap();
        assert_eq!(map.assemble(), &[' ', '@', ' ']);
    }

    #[test]
    fn test_remove_returns_ownership() {
        let registry = registry();
        let mut map = Tilemap::new(2, 2);
        let id = map
            .add_entity(entity(&registry, "ghost", 'g'), GridPos::ORIGIN)
            .unwrap();

        let removed = map.remove_entity(id).unwrap();
        // The caller now owns the entity; the map has forgotten it.
        assert_eq!(removed.name(), "ghost");
        assert!(map.entity(id).is_none());
        assert!(map.entities_at(GridPos::ORIGIN).is_empty());
        assert!(map.remove_entity(id).is_none());
    }

    #[test]
    fn test_remove_tile_returns_ownership() {
        let mut map = Tilemap::new(2, 2);
        let id = map
            .add_tile(Tile::new("door", '+'), GridPos::new(1, 1))
            .unwrap();

        let tile = map.remove_tile(id).unwrap();
        assert_eq!(tile.glyph(), '+');
        assert!(map.tiles_at(GridPos::new(1, 1)).is_empty());
        assert!(map.remove_tile(id).is_none());
    }

    #[test]
    fn test_move_entity_checks_bounds_and_handles() {
        let registry = registry();
        let mut map = Tilemap::new(3, 3);
        let id = map
            .add_entity(entity(&registry, "npc", 'n'), GridPos::new(1, 1))
            .unwrap();

        map.move_entity(id, GridPos::new(2, 2)).unwrap();
        assert_eq!(map.entity_position(id), Some(GridPos::new(2, 2)));

        // Out of bounds: error, entity does not move.
        let result = map.move_entity(id, GridPos::new(3, 3));
        assert!(matches!(result, Err(TilemapError::OutOfBounds { .. })));
        assert_eq!(map.entity_position(id), Some(GridPos::new(2, 2)));

        let result = map.move_entity(EntityId(77), GridPos::ORIGIN);
        assert!(matches!(result, Err(TilemapError::UnknownEntity(_))));
    }

    #[test]
    fn test_move_tile() {
        let mut map = Tilemap::new(3, 3);
        let id = map
            .add_tile(Tile::new("crate", 'o'), GridPos::ORIGIN)
            .unwrap();

        map.move_tile(id, GridPos::new(2, 0)).unwrap();
        assert!(map.tiles_at(GridPos::ORIGIN).is_empty());
        assert_eq!(map.tiles_at(GridPos::new(2, 0)), &[id]);

        let result = map.move_tile(TileId(9), GridPos::ORIGIN);
        assert!(matches!(result, Err(TilemapError::UnknownTile(_))));
    }

    #[test]
    fn test_update_moves_entities_within_bounds() {
        let registry = registry();
        let mut map = Tilemap::new(3, 1);
        let mut walker = entity(&registry, "walker", 'w');
        walker.add_component(Runner { dx: 1, dy: 0 }).unwrap();
        let id = map.add_entity(walker, GridPos::ORIGIN).unwrap();

        map.update_entities();
        assert_eq!(map.entity_position(id), Some(GridPos::new(1, 0)));

        map.update_entities();
        assert_eq!(map.entity_position(id), Some(GridPos::new(2, 0)));

        // The next step would leave the map; the walker stays put.
        map.update_entities();
        assert_eq!(map.entity_position(id), Some(GridPos::new(2, 0)));
    }

    #[test]
    fn test_update_blocks_moves_into_solid_tiles() {
        let registry = registry();
        let mut map = Tilemap::new(3, 1);
        map.add_tile(Tile::new("wall", '#').solid(), GridPos::new(1, 0))
            .unwrap();
        let mut walker = entity(&registry, "walker", 'w');
        walker.add_component(Runner { dx: 1, dy: 0 }).unwrap();
        let id = map.add_entity(walker, GridPos::ORIGIN).unwrap();

        map.update_entities();
        assert_eq!(map.entity_position(id), Some(GridPos::ORIGIN));
    }

    #[test]
    fn test_out_of_bounds_spawn_is_dropped() {
        let registry = registry();
        let mut map = Tilemap::new(2, 2);
        let mut spawner = entity(&registry, "spawner", 's');
        spawner
            .add_component(EdgeSpawner {
                registry: registry.clone(),
            })
            .unwrap();
        map.add_entity(spawner, GridPos::ORIGIN).unwrap();

        map.update_entities();
        assert_eq!(map.entity_count(), 1);
    }

    #[test]
    fn test_can_enter_respects_solid_tiles() {
        let mut map = Tilemap::new(3, 1);
        map.add_tile(Tile::new("floor", '.'), GridPos::ORIGIN)
            .unwrap();
        map.add_tile(Tile::new("wall", '#').solid(), GridPos::new(1, 0))
            .unwrap();

        assert!(map.can_enter(GridPos::ORIGIN));
        assert!(!map.can_enter(GridPos::new(1, 0)));
        // Vacant in-bounds cell is enterable, off-map is not.
        assert!(map.can_enter(GridPos::new(2, 0)));
        assert!(!map.can_enter(GridPos::new(3, 0)));
    }

    #[test]
    fn test_fill_covers_every_cell() {
        let mut map = Tilemap::new(4, 2);
        map.fill(&Tile::new("floor", '.'));

        assert_eq!(map.tile_count(), 8);
        let display = map.assemble();
        assert!(display.iter().all(|&g| g == '.'));
    }

    #[test]
    fn test_render_lines_shape() {
        let registry = registry();
        let mut map = Tilemap::new(3, 2);
        map.fill(&Tile::new("floor", '.'));
        map.add_entity(entity(&registry, "player", '@'), GridPos::new(1, 1))
            .unwrap();
        map.assemble();

        let lines = map.render_lines();
        assert_eq!(lines, vec!["...", ".@."]);
    }

    #[test]
    fn test_entity_snapshot_reflects_layout() {
        let registry = registry();
        let mut map = Tilemap::new(2, 2);
        let id = map
            .add_entity(entity(&registry, "npc", 'n'), GridPos::new(1, 0))
            .unwrap();

        let snapshot = map.entity_snapshot();
        assert_eq!(snapshot.entities_at(GridPos::new(1, 0)), &[id]);
    }
}
