//! Voxel point grid: snaps world points onto a uniform cubic lattice and keeps
//! the occupied cells as a deduplicated, insertion-ordered set.
//!
//! # Invariants
//! - Every stored point is a lattice point `origin + cell_size * (i, j, k)`.
//! - A cell is keyed by its integer lattice index; equal snapped points share a key.
//! - Enumeration order is insertion order. Re-adding a cell keeps its slot.

mod grid;
mod raycast;

pub use grid::{CellIndex, GridError, SnapPolicy, VoxelGrid};
pub use raycast::RayHit;

pub fn crate_info() -> &'static str {
    "voxelsketch-grid v0.1.0"
}
