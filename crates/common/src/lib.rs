//! Shared types for the voxelsketch workspace.
//!
//! All geometry is double precision (`glam::DVec3` and friends).

mod types;

pub use types::{CameraParams, Ray, Viewport};
