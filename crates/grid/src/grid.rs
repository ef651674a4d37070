use glam::DVec3;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Largest lattice coordinate (in cells) that still maps to a unique index.
const MAX_LATTICE_COORD: f64 = 4_503_599_627_370_496.0; // 2^52

/// Integer lattice coordinate of a voxel cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub i: i64,
    pub j: i64,
    pub k: i64,
}

impl CellIndex {
    pub fn new(i: i64, j: i64, k: i64) -> Self {
        Self { i, j, k }
    }

    fn offset(self, di: i64, dj: i64, dk: i64) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
            k: self.k.saturating_add(dk),
        }
    }
}

/// Canonical key form, e.g. `-1:0:3`.
impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.i, self.j, self.k)
    }
}

/// How a world point is mapped onto the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapPolicy {
    /// Nearest of the 27 lattice points around the truncated index.
    #[default]
    Nearest,
    /// Legacy per-axis truncation toward zero. Biased for negative
    /// coordinates; only useful to reproduce old models.
    Truncate,
}

/// Errors from grid operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("lattice origin must be finite, got {0}")]
    NonFiniteOrigin(DVec3),
    #[error("point has non-finite coordinates: {0}")]
    NonFinitePoint(DVec3),
    #[error("point is too far from the lattice origin for this cell size: {0}")]
    OutOfRange(DVec3),
}

/// Sparse set of occupied lattice cells.
///
/// Lattice points sit at `origin + cell_size * (i, j, k)`. The default origin
/// is half a cell on every axis, which makes each lattice point the centre of
/// the cube `[i, i+1] * cell_size` (per axis) that encloses it.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    cell_size: f64,
    origin: DVec3,
    policy: SnapPolicy,
    /// Cell -> insertion sequence number.
    cells: HashMap<CellIndex, u64>,
    /// Insertion sequence number -> cell, for ordered enumeration.
    order: BTreeMap<u64, CellIndex>,
    next_seq: u64,
}

impl VoxelGrid {
    /// Create an empty grid with the default half-cell origin.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "cell_size must be positive"
        );
        Self::build(cell_size, DVec3::splat(cell_size * 0.5))
    }

    /// Fallible variant of [`VoxelGrid::new`] for sizes read from user input.
    pub fn try_new(cell_size: f64) -> Result<Self, GridError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        Ok(Self::build(cell_size, DVec3::splat(cell_size * 0.5)))
    }

    /// Create an empty grid whose lattice passes through `origin`.
    pub fn with_origin(cell_size: f64, origin: DVec3) -> Result<Self, GridError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        if !origin.is_finite() {
            return Err(GridError::NonFiniteOrigin(origin));
        }
        Ok(Self::build(cell_size, origin))
    }

    fn build(cell_size: f64, origin: DVec3) -> Self {
        Self {
            cell_size,
            origin,
            policy: SnapPolicy::default(),
            cells: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Switch the snapping policy. Cells already stored are left alone.
    pub fn with_policy(mut self, policy: SnapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn policy(&self) -> SnapPolicy {
        self.policy
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// World position of a lattice point.
    pub fn cell_center(&self, index: CellIndex) -> DVec3 {
        self.origin + DVec3::new(index.i as f64, index.j as f64, index.k as f64) * self.cell_size
    }

    /// Map a point onto the lattice using the grid's policy.
    pub fn snap(&self, point: DVec3) -> Result<(CellIndex, DVec3), GridError> {
        if !point.is_finite() {
            return Err(GridError::NonFinitePoint(point));
        }
        let base = self.truncated_index(point)?;
        let index = match self.policy {
            SnapPolicy::Truncate => base,
            SnapPolicy::Nearest => self.nearest_around(base, point),
        };
        Ok((index, self.cell_center(index)))
    }

    fn truncated_index(&self, point: DVec3) -> Result<CellIndex, GridError> {
        let rel = (point - self.origin) / self.cell_size;
        if !(rel.abs().max_element() <= MAX_LATTICE_COORD) {
            return Err(GridError::OutOfRange(point));
        }
        Ok(CellIndex::new(
            rel.x.trunc() as i64,
            rel.y.trunc() as i64,
            rel.z.trunc() as i64,
        ))
    }

    fn nearest_around(&self, base: CellIndex, point: DVec3) -> CellIndex {
        let mut best = base;
        let mut best_dist = f64::INFINITY;
        for di in -1..=1 {
            for dj in -1..=1 {
                for dk in -1..=1 {
                    let candidate = base.offset(di, dj, dk);
                    let dist = self.cell_center(candidate).distance_squared(point);
                    if dist < best_dist {
                        best = candidate;
                        best_dist = dist;
                    }
                }
            }
        }
        best
    }

    /// Snap `point` and mark its cell occupied. Returns the cell index.
    pub fn add(&mut self, point: DVec3) -> Result<CellIndex, GridError> {
        let (index, _) = self.snap(point)?;
        self.insert_cell(index);
        Ok(index)
    }

    /// Mark a cell occupied. Returns false if it already was.
    pub fn insert_cell(&mut self, index: CellIndex) -> bool {
        if self.cells.contains_key(&index) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.cells.insert(index, seq);
        self.order.insert(seq, index);
        tracing::debug!(%index, "cell added");
        true
    }

    /// Snap `point` and clear its cell. Absent cells are a no-op (`Ok(None)`).
    pub fn remove(&mut self, point: DVec3) -> Result<Option<CellIndex>, GridError> {
        let (index, _) = self.snap(point)?;
        Ok(self.remove_cell(index).then_some(index))
    }

    /// Clear a cell. Returns false if it was not occupied.
    pub fn remove_cell(&mut self, index: CellIndex) -> bool {
        let Some(seq) = self.cells.remove(&index) else {
            return false;
        };
        self.order.remove(&seq);
        tracing::debug!(%index, "cell removed");
        true
    }

    /// Whether the cell `point` snaps to is occupied.
    pub fn contains(&self, point: DVec3) -> bool {
        self.snap(point)
            .map(|(index, _)| self.cells.contains_key(&index))
            .unwrap_or(false)
    }

    pub fn contains_cell(&self, index: CellIndex) -> bool {
        self.cells.contains_key(&index)
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.order.clear();
    }

    /// Occupied cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + Clone + '_ {
        self.order.values().copied()
    }

    /// Occupied lattice points in insertion order.
    ///
    /// The iterator borrows the grid, so it always sees one consistent state.
    /// Clone it (or call again) to restart.
    pub fn iter(&self) -> impl Iterator<Item = DVec3> + Clone + '_ {
        self.cells().map(move |index| self.cell_center(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within_half_cell(grid: &VoxelGrid, snapped: DVec3, p: DVec3) -> bool {
        let half = grid.cell_size() * 0.5 + 1e-12;
        let d = (snapped - p).abs();
        d.x <= half && d.y <= half && d.z <= half
    }

    #[test]
    fn snap_lands_within_half_cell() {
        let grid = VoxelGrid::new(0.1);
        let samples = [
            DVec3::new(0.04, 0.04, 0.04),
            DVec3::new(-0.04, 0.26, -1.33),
            DVec3::new(12.345, -6.789, 0.0001),
            DVec3::new(-0.0999, -0.1001, 0.5),
        ];
        for p in samples {
            let (_, snapped) = grid.snap(p).unwrap();
            assert!(within_half_cell(&grid, snapped, p), "{p} -> {snapped}");
        }
    }

    #[test]
    fn add_yields_exactly_one_nearby_point() {
        for p in [DVec3::new(0.33, -0.71, 2.02), DVec3::new(-5.55, 0.0, 0.049)] {
            let mut grid = VoxelGrid::new(0.1);
            grid.add(p).unwrap();
            let near: Vec<DVec3> = grid.iter().filter(|s| within_half_cell(&grid, *s, p)).collect();
            assert_eq!(near.len(), 1);
        }
    }

    #[test]
    fn nearby_points_collapse_into_one_cell() {
        let mut grid = VoxelGrid::new(0.1);
        grid.add(DVec3::new(0.04, 0.04, 0.04)).unwrap();
        grid.add(DVec3::new(0.06, 0.06, 0.06)).unwrap();
        assert_eq!(grid.len(), 1);
        let only = grid.iter().next().unwrap();
        assert!((only - DVec3::splat(0.05)).length() < 1e-12);
    }

    #[test]
    fn add_is_idempotent() {
        let mut grid = VoxelGrid::new(0.25);
        let p = DVec3::new(1.1, -2.2, 3.3);
        let a = grid.add(p).unwrap();
        let b = grid.add(p).unwrap();
        assert_eq!(a, b);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn remove_after_add_clears_that_cell_only() {
        let mut grid = VoxelGrid::new(1.0);
        grid.add(DVec3::new(0.2, 0.2, 0.2)).unwrap();
        grid.add(DVec3::new(3.2, 0.2, 0.2)).unwrap();
        let removed = grid.remove(DVec3::new(0.7, 0.1, 0.9)).unwrap();
        assert_eq!(removed, Some(CellIndex::new(0, 0, 0)));
        assert_eq!(grid.len(), 1);
        assert!(!grid.contains(DVec3::new(0.2, 0.2, 0.2)));
        assert!(grid.contains(DVec3::new(3.2, 0.2, 0.2)));
    }

    #[test]
    fn remove_on_untouched_grid_is_noop() {
        let mut grid = VoxelGrid::new(0.1);
        assert_eq!(grid.remove(DVec3::new(1.0, 2.0, 3.0)).unwrap(), None);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn iteration_is_insertion_ordered_and_restartable() {
        let mut grid = VoxelGrid::new(1.0);
        let points = [
            DVec3::new(5.5, 0.5, 0.5),
            DVec3::new(-3.5, 0.5, 0.5),
            DVec3::new(0.5, 9.5, 0.5),
        ];
        for p in points {
            grid.add(p).unwrap();
        }
        // re-adding keeps the original slot
        grid.add(points[0]).unwrap();

        let iter = grid.iter();
        let first: Vec<DVec3> = iter.clone().collect();
        let second: Vec<DVec3> = iter.collect();
        assert_eq!(first, points.to_vec());
        assert_eq!(first, second);
    }

    #[test]
    fn negative_coordinates_snap_symmetrically() {
        let grid = VoxelGrid::with_origin(1.0, DVec3::ZERO).unwrap();
        let (pos, _) = grid.snap(DVec3::new(0.9, 0.9, 0.9)).unwrap();
        let (neg, _) = grid.snap(DVec3::new(-0.9, -0.9, -0.9)).unwrap();
        assert_eq!(pos, CellIndex::new(1, 1, 1));
        assert_eq!(neg, CellIndex::new(-1, -1, -1));
    }

    #[test]
    fn truncate_policy_keeps_legacy_bias() {
        let grid = VoxelGrid::with_origin(1.0, DVec3::ZERO)
            .unwrap()
            .with_policy(SnapPolicy::Truncate);
        let (index, point) = grid.snap(DVec3::new(-0.9, 1.9, 0.4)).unwrap();
        assert_eq!(index, CellIndex::new(0, 1, 0));
        assert_eq!(point, DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let mut grid = VoxelGrid::new(0.1);
        let bad = DVec3::new(f64::NAN, 0.0, 0.0);
        assert!(matches!(grid.add(bad), Err(GridError::NonFinitePoint(_))));
        assert!(grid.remove(DVec3::new(0.0, f64::INFINITY, 0.0)).is_err());
        assert!(grid.is_empty());
    }

    #[test]
    fn far_points_are_rejected_instead_of_colliding() {
        let mut grid = VoxelGrid::new(0.01);
        assert!(matches!(
            grid.add(DVec3::new(1e17, 0.0, 0.0)),
            Err(GridError::OutOfRange(_))
        ));
        assert!(matches!(
            grid.add(DVec3::new(0.0, -1e18, 0.0)),
            Err(GridError::OutOfRange(_))
        ));
        assert!(grid.is_empty());

        // still in range: distinct keys, each within half a cell
        let a = grid.add(DVec3::new(1e10, 0.0, 0.0)).unwrap();
        let b = grid.add(DVec3::new(2e10, 0.0, 0.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn invalid_cell_size_is_rejected() {
        assert!(VoxelGrid::try_new(0.0).is_err());
        assert!(VoxelGrid::try_new(f64::NAN).is_err());
        assert!(VoxelGrid::with_origin(1.0, DVec3::splat(f64::INFINITY)).is_err());
    }

    #[test]
    #[should_panic(expected = "cell_size must be positive")]
    fn new_panics_on_negative_cell_size() {
        let _ = VoxelGrid::new(-1.0);
    }

    #[test]
    fn cell_index_key_is_canonical() {
        let grid = VoxelGrid::new(0.5);
        let (a, _) = grid.snap(DVec3::new(1.01, -0.2, 7.3)).unwrap();
        let (b, _) = grid.snap(DVec3::new(1.2, -0.01, 7.4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2:-1:14");
    }

    #[test]
    fn clear_empties_grid() {
        let mut grid = VoxelGrid::new(0.1);
        grid.add(DVec3::ZERO).unwrap();
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.cells().count(), 0);
    }
}
