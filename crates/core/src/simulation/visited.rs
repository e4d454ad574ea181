use crate::core_types::spatial::GridCoordinate;
use rustc_hash::FxHashSet;

/// Every cell ever ignited or claimed by a spawn
///
/// Cells are never removed: once claimed, a cell cannot be ignited again.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    cells: FxHashSet<GridCoordinate>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a cell. Returns `false` if it was already claimed.
    pub fn insert(&mut self, cell: GridCoordinate) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: GridCoordinate) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        self.cells.iter().copied()
    }
}
