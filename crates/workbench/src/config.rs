use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use voxelsketch_common::{CameraParams, Viewport};
use voxelsketch_grid::{GridError, VoxelGrid};
use voxelsketch_projection::{ProjectionError, ProjectionPipeline};

/// Errors from loading or validating a workbench config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid grid settings: {0}")]
    Grid(#[from] GridError),
    #[error("invalid camera settings: {0}")]
    Camera(#[from] ProjectionError),
}

/// Initial state of a workbench session. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Edge length of a voxel cell.
    pub cell_size: f64,
    pub camera: CameraParams,
    pub viewport: Viewport,
    /// Initial light direction.
    pub light: DVec3,
    /// Whether clicks on empty space place points on the drawing plane.
    pub show_plane: bool,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.01,
            camera: CameraParams::default(),
            viewport: Viewport::default(),
            light: DVec3::NEG_Z,
            show_plane: true,
        }
    }
}

impl WorkbenchConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check that a grid and a projection pipeline can be built from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        VoxelGrid::try_new(self.cell_size)?;
        ProjectionPipeline::new(&self.camera, self.viewport)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = WorkbenchConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cell_size, 0.01);
        assert!(config.show_plane);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = "
cell_size: 0.1
camera:
  position: [0.0, 0.0, -2.0]
  fov_degrees: 45.0
viewport:
  width: 800.0
  height: 600.0
";
        let config = WorkbenchConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.cell_size, 0.1);
        assert_eq!(config.camera.position, DVec3::new(0.0, 0.0, -2.0));
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.up, DVec3::Y);
        assert_eq!(config.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(config.light, DVec3::NEG_Z);
    }

    #[test]
    fn load_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "cell_size": 0.5, "show_plane": false }}"#).unwrap();
        let config = WorkbenchConfig::load(file.path()).unwrap();
        assert_eq!(config.cell_size, 0.5);
        assert!(!config.show_plane);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            WorkbenchConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_rejects_degenerate_camera() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "camera:\n  near: 5.0\n  far: 5.0").unwrap();
        assert!(matches!(
            WorkbenchConfig::load(file.path()),
            Err(ConfigError::Camera(ProjectionError::ClipPlanes { .. }))
        ));
    }

    #[test]
    fn load_rejects_bad_cell_size() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "cell_size: -1.0").unwrap();
        assert!(matches!(
            WorkbenchConfig::load(file.path()),
            Err(ConfigError::Grid(GridError::InvalidCellSize(_)))
        ));
    }
}
