use glam::{DMat4, DVec2, DVec3};
use voxelsketch_common::{CameraParams, Ray, Viewport};

/// Reasons a camera + viewport cannot be projected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("camera parameter `{parameter}` is not finite")]
    NonFinite { parameter: &'static str },
    #[error("field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f64),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    ClipPlanes { near: f64, far: f64 },
    #[error("viewport must have positive finite size, got {width}x{height}")]
    Viewport { width: f64, height: f64 },
    #[error("camera position coincides with its target")]
    EyeAtTarget,
    #[error("camera up vector is zero or parallel to the view direction")]
    UpParallelToView,
    #[error("view-projection matrix is not invertible")]
    Singular,
}

/// Sine of the smallest angle allowed between `up` and the view direction.
const MIN_UP_SINE: f64 = 1e-6;

/// View and projection matrices for one camera/viewport snapshot.
///
/// Rebuild it whenever the camera or the viewport changes; it never mutates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionPipeline {
    camera: CameraParams,
    viewport: Viewport,
    view: DMat4,
    projection: DMat4,
    view_projection: DMat4,
    inverse_view_projection: DMat4,
}

impl ProjectionPipeline {
    pub fn new(camera: &CameraParams, viewport: Viewport) -> Result<Self, ProjectionError> {
        validate(camera, viewport)?;

        let view = DMat4::look_at_rh(camera.position, camera.target, camera.up);
        let projection = DMat4::perspective_rh_gl(
            camera.fov_degrees.to_radians(),
            viewport.aspect(),
            camera.near,
            camera.far,
        );
        let view_projection = projection * view;

        let det = view_projection.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(ProjectionError::Singular);
        }
        let inverse_view_projection = view_projection.inverse();
        if !inverse_view_projection.is_finite() {
            return Err(ProjectionError::Singular);
        }

        Ok(Self {
            camera: *camera,
            viewport,
            view,
            projection,
            view_projection,
            inverse_view_projection,
        })
    }

    pub fn camera(&self) -> &CameraParams {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view(&self) -> DMat4 {
        self.view
    }

    pub fn projection(&self) -> DMat4 {
        self.projection
    }

    /// `projection * view`: a world point is transformed by the view first.
    pub fn view_projection(&self) -> DMat4 {
        self.view_projection
    }

    pub fn inverse_view_projection(&self) -> DMat4 {
        self.inverse_view_projection
    }

    /// World point to normalized device coordinates (with perspective divide).
    pub fn world_to_screen(&self, world: DVec3) -> DVec3 {
        self.view_projection.project_point3(world)
    }

    /// Screen point to canvas pixels. Screen Y is up, canvas Y is down.
    pub fn screen_to_canvas(&self, screen: DVec3) -> DVec2 {
        let hw = self.viewport.half_width();
        let hh = self.viewport.half_height();
        DVec2::new(screen.x * hw + hw, -screen.y * hh + hh)
    }

    /// Canvas pixel back to screen space at a caller-supplied depth.
    ///
    /// A 2D pick cannot recover depth; use [`Self::depth_of`] on a known world
    /// point (typically the camera target) to get a reference.
    pub fn canvas_to_screen(&self, canvas: DVec2, z: f64) -> DVec3 {
        let hw = self.viewport.half_width();
        let hh = self.viewport.half_height();
        DVec3::new((canvas.x - hw) / hw, -(canvas.y - hh) / hh, z)
    }

    pub fn screen_to_world(&self, screen: DVec3) -> DVec3 {
        self.inverse_view_projection.project_point3(screen)
    }

    pub fn world_to_canvas(&self, world: DVec3) -> DVec2 {
        self.screen_to_canvas(self.world_to_screen(world))
    }

    pub fn canvas_to_world(&self, canvas: DVec2, depth: f64) -> DVec3 {
        self.screen_to_world(self.canvas_to_screen(canvas, depth))
    }

    /// Screen-space depth of a world point.
    pub fn depth_of(&self, world: DVec3) -> f64 {
        self.world_to_screen(world).z
    }

    /// Whether a screen point lies inside the clip volume.
    pub fn in_clip_volume(screen: DVec3) -> bool {
        screen.is_finite() && screen.abs().max_element() <= 1.0
    }

    /// Ray from the near plane through the far plane under a canvas pixel.
    pub fn pick_ray(&self, canvas: DVec2) -> Option<Ray> {
        let near = self.canvas_to_world(canvas, -1.0);
        let far = self.canvas_to_world(canvas, 1.0);
        Ray::through(near, far)
    }
}

fn validate(camera: &CameraParams, viewport: Viewport) -> Result<(), ProjectionError> {
    let vectors = [
        ("position", camera.position),
        ("target", camera.target),
        ("up", camera.up),
    ];
    for (parameter, v) in vectors {
        if !v.is_finite() {
            return Err(ProjectionError::NonFinite { parameter });
        }
    }
    let scalars = [
        ("fov_degrees", camera.fov_degrees),
        ("near", camera.near),
        ("far", camera.far),
    ];
    for (parameter, s) in scalars {
        if !s.is_finite() {
            return Err(ProjectionError::NonFinite { parameter });
        }
    }

    if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
        return Err(ProjectionError::FieldOfView(camera.fov_degrees));
    }
    if !(camera.near > 0.0 && camera.far > camera.near) {
        return Err(ProjectionError::ClipPlanes {
            near: camera.near,
            far: camera.far,
        });
    }
    let Viewport { width, height } = viewport;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(ProjectionError::Viewport { width, height });
    }

    let forward = (camera.target - camera.position)
        .try_normalize()
        .ok_or(ProjectionError::EyeAtTarget)?;
    let up = camera
        .up
        .try_normalize()
        .ok_or(ProjectionError::UpParallelToView)?;
    if forward.cross(up).length() < MIN_UP_SINE {
        return Err(ProjectionError::UpParallelToView);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reference() -> ProjectionPipeline {
        ProjectionPipeline::new(&CameraParams::default(), Viewport::new(400.0, 400.0)).unwrap()
    }

    fn oblique() -> ProjectionPipeline {
        let camera = CameraParams {
            position: DVec3::new(-2.0, 1.5, -1.0),
            target: DVec3::new(0.2, 0.1, 0.3),
            up: DVec3::Z,
            fov_degrees: 45.0,
            near: 0.01,
            far: 1000.0,
        };
        ProjectionPipeline::new(&camera, Viewport::new(1920.0, 1080.0)).unwrap()
    }

    #[test]
    fn origin_projects_to_canvas_center() {
        let canvas = reference().world_to_canvas(DVec3::ZERO);
        assert!((canvas - DVec2::new(200.0, 200.0)).length() < EPS);
    }

    #[test]
    fn screen_y_up_maps_to_canvas_y_down() {
        let camera = CameraParams {
            fov_degrees: 90.0,
            ..CameraParams::default()
        };
        let p = ProjectionPipeline::new(&camera, Viewport::new(400.0, 400.0)).unwrap();
        let above = p.world_to_canvas(DVec3::new(0.0, 0.5, 0.0));
        assert!((above - DVec2::new(200.0, 100.0)).length() < EPS);
        // looking down +Z with +Y up puts world +X on the left
        let side = p.world_to_canvas(DVec3::new(0.5, 0.0, 0.0));
        assert!((side - DVec2::new(100.0, 200.0)).length() < EPS);
    }

    #[test]
    fn canvas_screen_round_trip() {
        let p = oblique();
        for s in [
            DVec3::new(0.0, 0.0, 0.5),
            DVec3::new(-1.0, 1.0, -0.3),
            DVec3::new(0.73, -0.12, 0.99),
        ] {
            let back = p.canvas_to_screen(p.screen_to_canvas(s), s.z);
            assert!((back - s).length() < EPS, "{s} -> {back}");
        }
    }

    #[test]
    fn world_screen_round_trip() {
        for p in [reference(), oblique()] {
            for w in [
                DVec3::ZERO,
                DVec3::new(0.3, -0.2, 0.5),
                DVec3::new(1.0, 2.0, 3.0),
                DVec3::new(-0.05, 0.05, 0.25),
            ] {
                let back = p.screen_to_world(p.world_to_screen(w));
                assert!((back - w).length() < 1e-6, "{w} -> {back}");
            }
        }
    }

    #[test]
    fn unproject_at_target_depth_recovers_target() {
        let p = oblique();
        let target = p.camera().target;
        let canvas = p.world_to_canvas(target);
        let world = p.canvas_to_world(canvas, p.depth_of(target));
        assert!((world - target).length() < 1e-6);
    }

    #[test]
    fn pick_ray_passes_through_projected_point() {
        let p = oblique();
        let w = DVec3::new(0.5, -0.4, 0.1);
        let ray = p.pick_ray(p.world_to_canvas(w)).unwrap();
        let to_w = w - ray.origin;
        let along = to_w.dot(ray.direction);
        assert!(along > 0.0);
        assert!((ray.at(along) - w).length() < 1e-6);
    }

    #[test]
    fn clip_volume_excludes_points_behind_camera() {
        let p = reference();
        assert!(ProjectionPipeline::in_clip_volume(p.world_to_screen(DVec3::ZERO)));
        assert!(!ProjectionPipeline::in_clip_volume(
            p.world_to_screen(DVec3::new(0.0, 0.0, -3.0))
        ));
    }

    #[test]
    fn rejects_degenerate_cameras() {
        let vp = Viewport::default();
        let base = CameraParams::default();
        let cases = [
            (
                CameraParams { near: 1.0, far: 1.0, ..base },
                ProjectionError::ClipPlanes { near: 1.0, far: 1.0 },
            ),
            (
                CameraParams { near: 0.0, ..base },
                ProjectionError::ClipPlanes { near: 0.0, far: 1000.0 },
            ),
            (
                CameraParams { fov_degrees: 180.0, ..base },
                ProjectionError::FieldOfView(180.0),
            ),
            (
                CameraParams { target: base.position, ..base },
                ProjectionError::EyeAtTarget,
            ),
            (
                CameraParams { up: DVec3::Z, ..base },
                ProjectionError::UpParallelToView,
            ),
            (
                CameraParams { up: DVec3::ZERO, ..base },
                ProjectionError::UpParallelToView,
            ),
            (
                CameraParams { far: f64::INFINITY, ..base },
                ProjectionError::NonFinite { parameter: "far" },
            ),
            (
                CameraParams { position: DVec3::new(f64::NAN, 0.0, 0.0), ..base },
                ProjectionError::NonFinite { parameter: "position" },
            ),
        ];
        for (camera, expected) in cases {
            assert_eq!(ProjectionPipeline::new(&camera, vp), Err(expected));
        }
    }

    #[test]
    fn subnormal_near_plane_is_singular() {
        // passes validation, but the determinant is too small to invert
        let camera = CameraParams {
            position: DVec3::ZERO,
            target: DVec3::Z,
            near: 1e-320,
            ..CameraParams::default()
        };
        assert_eq!(
            ProjectionPipeline::new(&camera, Viewport::default()),
            Err(ProjectionError::Singular)
        );
    }

    #[test]
    fn rejects_empty_viewport() {
        let err = ProjectionPipeline::new(&CameraParams::default(), Viewport::new(0.0, 300.0));
        assert_eq!(
            err,
            Err(ProjectionError::Viewport { width: 0.0, height: 300.0 })
        );
    }

    #[test]
    fn view_projection_composes_projection_after_view() {
        let p = oblique();
        let w = DVec3::new(0.1, 0.2, 0.3);
        let staged = p.projection().project_point3(p.view().transform_point3(w));
        assert!((staged - p.world_to_screen(w)).length() < EPS);
    }
}
