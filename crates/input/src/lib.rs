//! Input: orbit camera state and pointer gestures mapped to shared actions.
//!
//! # Invariants
//! - Camera pose and light direction are derived from orbit state, never stored.
//! - Front-ends emit [`Action`]s; they never touch the grid or camera directly.

pub mod action;
pub mod bindings;
pub mod orbit;

pub use action::Action;
pub use bindings::{GestureBindings, Modifiers, PointerButton, PointerEvent};
pub use orbit::{OrbitControls, OrbitPose, PITCH_LIMIT_DEGREES};

pub fn crate_info() -> &'static str {
    "voxelsketch-input v0.1.0"
}
