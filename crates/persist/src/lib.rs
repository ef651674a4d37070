//! Persistence: the `model.json` point list.
//!
//! # Invariants
//! - Exported points are lattice points, in grid enumeration order.
//! - An import is validated in full before any point reaches the grid.

mod model;

pub use model::{
    MODEL_FILE_NAME, PersistError, PointRecord, export_points, import_into, load_model,
    parse_model, read_model, save_model, to_json_string, write_model,
};

pub fn crate_info() -> &'static str {
    "voxelsketch-persist v0.1.0"
}
