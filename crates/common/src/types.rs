use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Perspective camera description.
///
/// Plain data: it is edited directly or overwritten by orbit controls, and a
/// projection pipeline is rebuilt from it whenever it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Eye position in world space.
    pub position: DVec3,
    /// Point the camera looks at.
    pub target: DVec3,
    /// Up direction used to orient the view.
    pub up: DVec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, -1.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraParams {
    /// Unit vector from the eye towards the target, or zero if they coincide.
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    pub fn half_height(&self) -> f64 {
        self.height * 0.5
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Whether a canvas point lies inside the viewport rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Half-line in world space, used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray from two points; the direction is normalized.
    /// Returns `None` when the points coincide.
    pub fn through(from: DVec3, to: DVec3) -> Option<Self> {
        let direction = (to - from).try_normalize()?;
        Some(Self {
            origin: from,
            direction,
        })
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
