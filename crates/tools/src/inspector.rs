use glam::DVec3;
use voxelsketch_grid::{CellIndex, VoxelGrid};

/// Grid inspector for developer tooling.
///
/// Provides read-only queries against a voxel grid for debugging and
/// development UI.
pub struct GridInspector;

impl GridInspector {
    /// Produce a summary of the grid.
    pub fn summary(grid: &VoxelGrid) -> GridSummary {
        let bounds = grid.iter().fold(None, |acc: Option<(DVec3, DVec3)>, p| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(p), hi.max(p)),
                None => (p, p),
            })
        });
        GridSummary {
            cell_count: grid.len(),
            cell_size: grid.cell_size(),
            origin: grid.origin(),
            bounds,
        }
    }

    /// Details of the cell a world point snaps to, if it is occupied.
    pub fn inspect_point(grid: &VoxelGrid, point: DVec3) -> Option<CellInfo> {
        let (index, center) = grid.snap(point).ok()?;
        grid.contains_cell(index).then_some(CellInfo {
            index,
            center,
            offset: point - center,
        })
    }

    /// Occupied cells in enumeration order.
    pub fn list_cells(grid: &VoxelGrid) -> Vec<CellIndex> {
        grid.cells().collect()
    }
}

/// Summary of a grid for the inspector.
#[derive(Debug, Clone)]
pub struct GridSummary {
    pub cell_count: usize,
    pub cell_size: f64,
    pub origin: DVec3,
    /// Min/max lattice points, `None` for an empty grid.
    pub bounds: Option<(DVec3, DVec3)>,
}

impl GridSummary {
    /// Extent of the occupied lattice points (zero for empty or single-cell grids).
    pub fn extent(&self) -> DVec3 {
        self.bounds.map(|(lo, hi)| hi - lo).unwrap_or(DVec3::ZERO)
    }
}

impl std::fmt::Display for GridSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid: cells={} cell_size={} origin=({:.3}, {:.3}, {:.3})",
            self.cell_count, self.cell_size, self.origin.x, self.origin.y, self.origin.z
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(
                f,
                " bounds=({:.3}, {:.3}, {:.3})..({:.3}, {:.3}, {:.3})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )?;
        }
        Ok(())
    }
}

/// Detailed info about a single occupied cell.
#[derive(Debug, Clone)]
pub struct CellInfo {
    pub index: CellIndex,
    pub center: DVec3,
    /// Query point minus the cell's lattice point.
    pub offset: DVec3,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell [{}] center=({:.3}, {:.3}, {:.3}) offset=({:.3}, {:.3}, {:.3})",
            self.index,
            self.center.x,
            self.center.y,
            self.center.z,
            self.offset.x,
            self.offset.y,
            self.offset.z,
        )
    }
}
