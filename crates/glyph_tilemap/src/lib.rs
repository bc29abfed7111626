//! # glyph_tilemap
//!
//! The tile/entity composite index: two coordinate-keyed layers sharing one
//! grid, a bounds-checked mutation API, and the render-priority display
//! assembly a terminal renderer draws from.
//!
//! This crate provides:
//!
//! - [`Tile`] / [`TileId`] — terrain occupants and their handles.
//! - [`Tilemap`] — tile layer + entity layer + display buffer.
//! - [`TilemapError`] — bounds and unknown-handle failures.

pub mod tile;
pub mod tilemap;

pub use tile::{Tile, TileId, TileIdAllocator};
pub use tilemap::{EMPTY_GLYPH, Tilemap, TilemapError};
