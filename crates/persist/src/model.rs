use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;
use voxelsketch_grid::{GridError, VoxelGrid};

/// Conventional file name for exported models.
pub const MODEL_FILE_NAME: &str = "model.json";

/// One exported point: `{ "x": .., "y": .., "z": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<DVec3> for PointRecord {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<PointRecord> for DVec3 {
    fn from(r: PointRecord) -> Self {
        DVec3::new(r.x, r.y, r.z)
    }
}

/// Errors from model export/import.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model must be a JSON array of points")]
    NotAnArray,
    #[error("entry {index}: expected an object with x, y, z")]
    NotAnObject { index: usize },
    #[error("entry {index}: missing field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("entry {index}: field `{field}` is not a number")]
    NonNumericField { index: usize, field: &'static str },
    #[error("entry {index}: field `{field}` is not finite")]
    NonFiniteField { index: usize, field: &'static str },
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

/// Points of a grid in enumeration order.
pub fn export_points(grid: &VoxelGrid) -> Vec<PointRecord> {
    grid.iter().map(PointRecord::from).collect()
}

/// Serialize a grid as a compact JSON array.
pub fn to_json_string(grid: &VoxelGrid) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&export_points(grid))?)
}

pub fn write_model(grid: &VoxelGrid, mut writer: impl Write) -> Result<(), PersistError> {
    serde_json::to_writer(&mut writer, &export_points(grid))?;
    writer.flush()?;
    Ok(())
}

/// Write a grid to a model file.
pub fn save_model(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_model(grid, std::io::BufWriter::new(file))?;
    tracing::info!(points = grid.len(), path = %path.as_ref().display(), "model saved");
    Ok(())
}

/// Parse and validate a model document.
pub fn parse_model(text: &str) -> Result<Vec<DVec3>, PersistError> {
    let doc: Value = serde_json::from_str(text)?;
    validate(&doc)
}

pub fn read_model(mut reader: impl Read) -> Result<Vec<DVec3>, PersistError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_model(&text)
}

/// Read and validate a model file.
pub fn load_model(path: impl AsRef<Path>) -> Result<Vec<DVec3>, PersistError> {
    let file = std::fs::File::open(path.as_ref())?;
    let points = read_model(std::io::BufReader::new(file))?;
    tracing::info!(points = points.len(), path = %path.as_ref().display(), "model loaded");
    Ok(points)
}

/// Fold validated points into a grid with `add`. Returns how many new cells
/// became occupied.
///
/// Every point is snapped first; if any cannot be (non-finite, or too far
/// out for the grid's cell size) the grid is left untouched.
pub fn import_into(grid: &mut VoxelGrid, points: &[DVec3]) -> Result<usize, PersistError> {
    let cells = points
        .iter()
        .map(|p| grid.snap(*p).map(|(index, _)| index))
        .collect::<Result<Vec<_>, GridError>>()?;
    let before = grid.len();
    for index in cells {
        grid.insert_cell(index);
    }
    let added = grid.len() - before;
    tracing::info!(entries = points.len(), added, "model imported");
    Ok(added)
}

fn validate(doc: &Value) -> Result<Vec<DVec3>, PersistError> {
    let entries = doc.as_array().ok_or(PersistError::NotAnArray)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry
                .as_object()
                .ok_or(PersistError::NotAnObject { index })?;
            let coord = |field: &'static str| -> Result<f64, PersistError> {
                let value = object
                    .get(field)
                    .ok_or(PersistError::MissingField { index, field })?;
                let n = value
                    .as_f64()
                    .ok_or(PersistError::NonNumericField { index, field })?;
                if !n.is_finite() {
                    return Err(PersistError::NonFiniteField { index, field });
                }
                Ok(n)
            };
            Ok(DVec3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect()
}
