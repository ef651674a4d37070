use glam::{DVec2, DVec3};

/// A high-level editing action.
///
/// The workbench consumes actions, never raw pointer events, so any front-end
/// (a browser canvas, a native window, a script) drives the same logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit the camera by yaw/pitch deltas in degrees.
    Rotate { yaw_degrees: f64, pitch_degrees: f64 },
    /// Pan the orbit centre by a camera-relative delta.
    Pan(DVec3),
    /// Multiply the orbit distance.
    Zoom(f64),
    /// Set the light input from a normalized pointer position.
    SetLight(DVec2),
    /// Place a voxel under a canvas point.
    Draw(DVec2),
    /// Remove the voxel under a canvas point.
    Erase(DVec2),
    /// Show or hide the drawing plane.
    TogglePlane,
    /// No-op (gestures without a binding).
    Noop,
}

impl Action {
    /// Whether applying this action can change the camera pose.
    pub fn moves_camera(&self) -> bool {
        matches!(self, Self::Rotate { .. } | Self::Pan(_) | Self::Zoom(_))
    }

    /// Whether applying this action can change the grid.
    pub fn edits_grid(&self) -> bool {
        matches!(self, Self::Draw(_) | Self::Erase(_))
    }
}
