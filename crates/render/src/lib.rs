//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the grid and a projection pipeline; they never mutate either.
//! - Points outside the clip volume are not drawn.
//!
//! Two headless renderers ship here: a text dump for logs and tests, and an
//! ASCII point canvas for terminals. GPU backends implement the same trait.

mod canvas;
mod renderer;

pub use canvas::{AsciiCanvasRenderer, MAX_CANVAS_DIMENSION};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "voxelsketch-render v0.1.0"
}
