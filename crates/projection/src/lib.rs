//! Camera projection pipeline.
//!
//! Converts between world space, screen space (normalized device coordinates,
//! [-1, 1] per axis, GL depth convention) and canvas space (pixels, origin
//! top-left, Y down).
//!
//! # Invariants
//! - A pipeline is a pure function of one camera + viewport snapshot.
//! - Degenerate cameras are rejected at construction; no NaN matrices escape.

mod pipeline;

pub use pipeline::{ProjectionError, ProjectionPipeline};

pub fn crate_info() -> &'static str {
    "voxelsketch-projection v0.1.0"
}
