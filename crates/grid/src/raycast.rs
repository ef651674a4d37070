use crate::grid::{CellIndex, VoxelGrid};
use glam::DVec3;
use voxelsketch_common::Ray;

/// Nearest occupied cell hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: CellIndex,
    /// Lattice point of the hit cell.
    pub center: DVec3,
    /// Where the ray enters the cell's cube.
    pub point: DVec3,
    /// Outward unit normal of the entered face.
    pub normal: DVec3,
    /// Ray parameter at `point`.
    pub distance: f64,
}

impl VoxelGrid {
    /// Cast a ray against every occupied cell's cube and return the closest hit
    /// in front of the origin.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        if ray.direction.length_squared() == 0.0 || !ray.direction.is_finite() {
            return None;
        }
        let half = DVec3::splat(self.cell_size() * 0.5);
        let mut best: Option<RayHit> = None;
        for cell in self.cells() {
            let center = self.cell_center(cell);
            let Some((distance, normal)) = intersect_box(ray, center - half, center + half) else {
                continue;
            };
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(RayHit {
                    cell,
                    center,
                    point: ray.at(distance),
                    normal,
                    distance,
                });
            }
        }
        best
    }
}

/// Slab test. Returns the entry parameter (clamped to 0 when the origin is
/// inside) and the normal of the entry face.
fn intersect_box(ray: &Ray, min: DVec3, max: DVec3) -> Option<(f64, DVec3)> {
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut normal = DVec3::ZERO;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < f64::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let (t0, t1) = {
            let a = (min[axis] - o) / d;
            let b = (max[axis] - o) / d;
            if a <= b { (a, b) } else { (b, a) }
        };
        if t0 > t_enter {
            t_enter = t0;
            normal = DVec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some((t_enter.max(0.0), normal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(points: &[DVec3]) -> VoxelGrid {
        let mut grid = VoxelGrid::with_origin(1.0, DVec3::ZERO).unwrap();
        for p in points {
            grid.add(*p).unwrap();
        }
        grid
    }

    #[test]
    fn hits_front_face_of_nearest_cell() {
        let grid = grid_with(&[DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, 2.0)]);
        let ray = Ray::through(DVec3::ZERO, DVec3::Z).unwrap();
        let hit = grid.raycast(&ray).unwrap();
        assert_eq!(hit.cell, CellIndex::new(0, 0, 2));
        assert_eq!(hit.normal, DVec3::NEG_Z);
        assert!((hit.distance - 1.5).abs() < 1e-12);
        assert!((hit.point - DVec3::new(0.0, 0.0, 1.5)).length() < 1e-12);
    }

    #[test]
    fn hit_from_negative_direction_reports_positive_normal() {
        let grid = grid_with(&[DVec3::new(-3.0, 0.0, 0.0)]);
        let ray = Ray::through(DVec3::ZERO, DVec3::NEG_X).unwrap();
        let hit = grid.raycast(&ray).unwrap();
        assert_eq!(hit.normal, DVec3::X);
        assert!((hit.distance - 2.5).abs() < 1e-12);
    }

    #[test]
    fn misses_cells_behind_or_beside_the_ray() {
        let grid = grid_with(&[DVec3::new(0.0, 0.0, -4.0), DVec3::new(3.0, 0.0, 4.0)]);
        let ray = Ray::through(DVec3::ZERO, DVec3::Z).unwrap();
        assert!(grid.raycast(&ray).is_none());
    }

    #[test]
    fn empty_grid_or_zero_direction_yields_none() {
        let empty = VoxelGrid::new(1.0);
        let ray = Ray::through(DVec3::ZERO, DVec3::X).unwrap();
        assert!(empty.raycast(&ray).is_none());

        let grid = grid_with(&[DVec3::ZERO]);
        let degenerate = Ray {
            origin: DVec3::new(0.0, 0.0, -5.0),
            direction: DVec3::ZERO,
        };
        assert!(grid.raycast(&degenerate).is_none());
    }

    #[test]
    fn adjacent_placement_through_hit_normal() {
        let mut grid = grid_with(&[DVec3::ZERO]);
        let ray = Ray::through(DVec3::new(0.0, 4.0, 0.0), DVec3::ZERO).unwrap();
        let hit = grid.raycast(&ray).unwrap();
        assert_eq!(hit.normal, DVec3::Y);
        let placed = grid.add(hit.center + hit.normal * grid.cell_size()).unwrap();
        assert_eq!(placed, CellIndex::new(0, 1, 0));
    }
}
