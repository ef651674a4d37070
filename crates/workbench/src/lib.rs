//! Workbench: the single owner of one editing session.
//!
//! # Invariants
//! - All mutations flow through explicit operations or [`Action`]s.
//! - Camera position/target follow the orbit state after every camera action.
//! - A projection pipeline is rebuilt from the current snapshot on demand;
//!   degenerate cameras are reported, never rendered.
//!
//! [`Action`]: voxelsketch_input::Action

mod config;
mod workbench;

pub use config::{ConfigError, WorkbenchConfig};
pub use workbench::{DRAWING_PLANE_SIZE, Outcome, Workbench, WorkbenchError};

pub fn crate_info() -> &'static str {
    "voxelsketch-workbench v0.1.0"
}
