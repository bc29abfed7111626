//! # glyph_grid
//!
//! The spatial entity index: a coordinate-bucketed structure that owns the
//! world's entities, groups them by integer grid cell, and drives the
//! per-frame update sweep.
//!
//! This crate provides:
//!
//! - [`SpatialBuckets`] — the generic cell-bucket primitive (also used by
//!   the tilemap's tile layer).
//! - [`GridIndex`] — entity arena + buckets + the snapshot-then-apply
//!   frame sweep.
//! - [`GridSnapshot`] — a read-only coordinate→entities copy for renderers.

pub mod buckets;
pub mod index;
pub mod snapshot;

pub use buckets::SpatialBuckets;
pub use index::GridIndex;
pub use snapshot::GridSnapshot;
