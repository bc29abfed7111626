//! Read-only layout snapshots for the rendering layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use glyph_component::{EntityId, GridPos};

/// A point-in-time copy of the index's coordinate→entities layout.
///
/// Shares no state with the index that produced it; the index can mutate
/// freely while a renderer walks the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    cells: BTreeMap<GridPos, Vec<EntityId>>,
}

impl GridSnapshot {
    pub(crate) fn new(cells: BTreeMap<GridPos, Vec<EntityId>>) -> Self {
        Self { cells }
    }

    /// The entity ids at `pos`, in append order.
    #[must_use]
    pub fn entities_at(&self, pos: GridPos) -> &[EntityId] {
        self.cells.get(&pos).map_or(&[], Vec::as_slice)
    }

    /// Iterate occupied cells in ascending coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &[EntityId])> {
        self.cells.iter().map(|(&pos, ids)| (pos, ids.as_slice()))
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of entities captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Returns `true` if the snapshot holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
