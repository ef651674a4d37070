//! Developer Tooling: read-only grid inspection for CLIs and debug panels.

mod inspector;

pub use inspector::{CellInfo, GridInspector, GridSummary};

pub fn crate_info() -> &'static str {
    "voxelsketch-tools v0.1.0"
}
