use glam::{DQuat, DVec2, DVec3, EulerRot};
use voxelsketch_common::CameraParams;

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT_DEGREES: f64 = 90.0;

/// Camera pose derived from orbit state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub position: DVec3,
    pub target: DVec3,
}

/// Accumulated orbit/zoom/pan gesture state.
///
/// Only the raw gesture state is stored. Camera pose and light direction are
/// recomputed from it on every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    yaw_degrees: f64,
    pitch_degrees: f64,
    distance: f64,
    offset: DVec3,
    light_position: DVec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            distance: 1.0,
            offset: DVec3::ZERO,
            light_position: DVec2::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orbit state whose pose reproduces `position` looking at `target`.
    /// Falls back to the default orientation when the two coincide.
    pub fn from_pose(position: DVec3, target: DVec3) -> Self {
        let arm = position - target;
        let distance = arm.length();
        let Some(dir) = arm.try_normalize() else {
            return Self {
                offset: target,
                ..Self::default()
            };
        };
        Self {
            yaw_degrees: (-dir.x).atan2(-dir.z).to_degrees(),
            pitch_degrees: dir.y.clamp(-1.0, 1.0).asin().to_degrees(),
            distance,
            offset: target,
            light_position: DVec2::ZERO,
        }
    }

    pub fn yaw_degrees(&self) -> f64 {
        self.yaw_degrees
    }

    pub fn pitch_degrees(&self) -> f64 {
        self.pitch_degrees
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    pub fn light_position(&self) -> DVec2 {
        self.light_position
    }

    /// Add to yaw (unbounded) and pitch (clamped to the pitch limit).
    pub fn rotate(&mut self, yaw_delta_degrees: f64, pitch_delta_degrees: f64) {
        if !(yaw_delta_degrees.is_finite() && pitch_delta_degrees.is_finite()) {
            return;
        }
        self.yaw_degrees += yaw_delta_degrees;
        self.pitch_degrees = (self.pitch_degrees + pitch_delta_degrees)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    /// Pan the orbit centre by a camera-relative delta.
    pub fn move_by(&mut self, delta: DVec3) {
        if !delta.is_finite() {
            return;
        }
        self.offset += self.rotation() * delta;
    }

    /// Scale the orbit distance; factors below 1 zoom in.
    pub fn zoom(&mut self, factor: f64) {
        if factor > 0.0 && factor.is_finite() {
            self.distance *= factor;
        }
    }

    /// Light input in normalized pointer coordinates ([-1, 1] per axis).
    pub fn set_light_position(&mut self, position: DVec2) {
        if position.is_finite() {
            self.light_position = position;
        }
    }

    /// Choose the light input so that [`Self::light_direction`] points along
    /// `direction` under the current rotation.
    ///
    /// Returns false and leaves the light alone when no input reaches that
    /// direction (zero, non-finite, or pointing back at the viewer).
    pub fn set_light_direction(&mut self, direction: DVec3) -> bool {
        let Some(local) = (self.rotation().inverse() * direction).try_normalize() else {
            return false;
        };
        let lateral = local.truncate();
        let h = lateral.length();
        // light_direction ~ (l, |l| - 1), so |l| / (1 - |l|) = h / -z
        let denom = h - local.z;
        if denom <= 0.0 {
            return false;
        }
        let radius = h / denom;
        self.light_position = if h > 0.0 {
            lateral / h * radius
        } else {
            DVec2::ZERO
        };
        true
    }

    /// Orientation: yaw about Y, then pitch about X.
    pub fn rotation(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees.to_radians(),
            self.pitch_degrees.to_radians(),
            0.0,
        )
    }

    pub fn pose(&self) -> OrbitPose {
        OrbitPose {
            target: self.offset,
            position: self.offset + self.rotation() * DVec3::new(0.0, 0.0, -self.distance),
        }
    }

    /// Light direction in world space, relative to the current view.
    pub fn light_direction(&self) -> DVec3 {
        let l = self.light_position;
        let local = DVec3::new(l.x, l.y, -(1.0 - l.length())).normalize_or_zero();
        self.rotation() * local
    }

    /// Overwrite a camera's position and target with the orbit pose.
    /// Up, field of view and clip planes are left as they are.
    pub fn apply_to(&self, camera: &mut CameraParams) {
        let pose = self.pose();
        camera.position = pose.position;
        camera.target = pose.target;
    }
}
