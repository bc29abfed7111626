//! Integer grid coordinates.
//!
//! [`GridPos`] is the key type for every coordinate-bucketed structure in
//! the engine. The derived ordering (x, then y) gives the spatial layers a
//! deterministic iteration order over occupied cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position on the integer grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    /// Column, growing rightwards.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl GridPos {
    /// The origin cell (0, 0).
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns `true` if the position lies within a `width` × `height` map
    /// anchored at the origin.
    #[must_use]
    pub const fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
