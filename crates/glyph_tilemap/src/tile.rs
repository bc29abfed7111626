//! Tiles and tile identifiers.
//!
//! A tile is a terrain occupant: a named glyph plus a traversability flag
//! the tilemap consults when mediating movement. Tiles are plain values —
//! the tilemap owns them and hands them back on removal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique tile identifier issued by a tilemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u64);

impl TileId {
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

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileId({})", self.0)
    }
}

/// Allocates monotonically increasing tile ids.
#[derive(Debug, Default)]
pub struct TileIdAllocator {
    next_id: u64,
}

impl TileIdAllocator {
    /// Creates a new allocator starting at id 0.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocates a fresh tile id.
    pub fn allocate(&mut self) -> TileId {
        let id = self.next_id;
        self.next_id += 1;
        TileId(id)
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id
    }
}

/// A terrain occupant of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    name: String,
    glyph: char,
    traversable: bool,
}

impl Tile {
    /// Create a traversable tile.
    #[must_use]
    pub fn new(name: impl Into<String>, glyph: char) -> Self {
        Self {
            name: name.into(),
            glyph,
            traversable: true,
        }
    }

    /// Mark the tile as blocking movement.
    #[must_use]
    pub fn solid(mut self) -> Self {
        self.traversable = false;
        self
    }

    /// The tile's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The character the display assembly renders for this tile.
    #[must_use]
    pub fn glyph(&self) -> char {
        self.glyph
    }

    /// Returns `true` if entities may enter the tile's cell.
    #[must_use]
    pub fn is_traversable(&self) -> bool {
        self.traversable
    }
}
