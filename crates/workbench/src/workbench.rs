use crate::config::WorkbenchConfig;
use glam::{DVec2, DVec3};
use voxelsketch_common::{CameraParams, Ray, Viewport};
use voxelsketch_grid::{CellIndex, GridError, VoxelGrid};
use voxelsketch_input::{Action, OrbitControls};
use voxelsketch_projection::{ProjectionError, ProjectionPipeline};
use voxelsketch_render::Renderer;

/// Edge length of the square drawing plane centred on the camera target.
pub const DRAWING_PLANE_SIZE: f64 = 1.0;

/// Errors from workbench operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    #[error("camera rejected: {0}")]
    Projection(#[from] ProjectionError),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

/// What an applied action changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    CameraMoved,
    LightMoved,
    Added(CellIndex),
    Removed(CellIndex),
    PlaneToggled(bool),
    Unchanged,
}

/// One editing session: grid, camera, orbit controls, light and viewport.
///
/// The camera's position and target are overwritten from the orbit state
/// after every camera action; up, field of view and clip planes stay as
/// configured. The light is view-relative orbit state: it turns with the
/// camera and is unaffected by pan and zoom.
#[derive(Debug, Clone)]
pub struct Workbench {
    grid: VoxelGrid,
    orbit: OrbitControls,
    camera: CameraParams,
    viewport: Viewport,
    show_plane: bool,
}

impl Workbench {
    pub fn new(config: &WorkbenchConfig) -> Result<Self, WorkbenchError> {
        let grid = VoxelGrid::try_new(config.cell_size)?;
        let mut camera = config.camera;
        let mut orbit = OrbitControls::from_pose(camera.position, camera.target);
        orbit.apply_to(&mut camera);
        seed_light(&mut orbit, config.light);
        Ok(Self {
            grid,
            orbit,
            camera,
            viewport: config.viewport,
            show_plane: config.show_plane,
        })
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut VoxelGrid {
        &mut self.grid
    }

    pub fn camera(&self) -> &CameraParams {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// World-space light direction.
    pub fn light(&self) -> DVec3 {
        self.orbit.light_direction()
    }

    pub fn show_plane(&self) -> bool {
        self.show_plane
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replace the camera and re-seed the orbit state from its pose.
    /// The world-space light direction is kept.
    pub fn set_camera(&mut self, camera: CameraParams) {
        let light = self.light();
        self.orbit = OrbitControls::from_pose(camera.position, camera.target);
        seed_light(&mut self.orbit, light);
        self.camera = camera;
        self.orbit.apply_to(&mut self.camera);
    }

    /// Projection pipeline for the current camera and viewport.
    pub fn pipeline(&self) -> Result<ProjectionPipeline, WorkbenchError> {
        ProjectionPipeline::new(&self.camera, self.viewport).map_err(|e| {
            tracing::warn!(error = %e, "camera rejected for this frame");
            WorkbenchError::from(e)
        })
    }

    /// Render one frame with any renderer.
    pub fn render<R: Renderer>(&self, renderer: &R) -> Result<R::Output, WorkbenchError> {
        let pipeline = self.pipeline()?;
        Ok(renderer.render(&self.grid, &pipeline))
    }

    pub fn apply(&mut self, action: Action) -> Result<Outcome, WorkbenchError> {
        tracing::debug!(?action, "apply");
        let outcome = match action {
            Action::Rotate {
                yaw_degrees,
                pitch_degrees,
            } => {
                self.orbit.rotate(yaw_degrees, pitch_degrees);
                Outcome::CameraMoved
            }
            Action::Pan(delta) => {
                self.orbit.move_by(delta);
                Outcome::CameraMoved
            }
            Action::Zoom(factor) => {
                self.orbit.zoom(factor);
                Outcome::CameraMoved
            }
            Action::SetLight(position) => {
                self.orbit.set_light_position(position);
                Outcome::LightMoved
            }
            Action::Draw(canvas) => self
                .draw_at(canvas)?
                .map_or(Outcome::Unchanged, Outcome::Added),
            Action::Erase(canvas) => self
                .erase_at(canvas)?
                .map_or(Outcome::Unchanged, Outcome::Removed),
            Action::TogglePlane => {
                self.show_plane = !self.show_plane;
                Outcome::PlaneToggled(self.show_plane)
            }
            Action::Noop => Outcome::Unchanged,
        };
        if action.moves_camera() {
            self.orbit.apply_to(&mut self.camera);
        }
        if action.edits_grid() {
            tracing::debug!(?outcome, cells = self.grid.len(), "grid edited");
        }
        Ok(outcome)
    }

    /// Place a point under a canvas pixel.
    ///
    /// A voxel under the cursor gets a neighbour on the face that was hit;
    /// otherwise the point lands on the drawing plane through the camera
    /// target, if the plane is shown and the cursor is over it. Returns the
    /// newly occupied cell, or `None` when nothing changed.
    pub fn draw_at(&mut self, canvas: DVec2) -> Result<Option<CellIndex>, WorkbenchError> {
        let pipeline = self.pipeline()?;
        let Some(ray) = pipeline.pick_ray(canvas) else {
            return Ok(None);
        };
        let voxel = self.grid.raycast(&ray);
        let plane = self.plane_hit(&pipeline, canvas, &ray);

        let point = match (voxel, plane) {
            (Some(hit), Some((t, p))) if t < hit.distance => p,
            (Some(hit), _) => hit.center + hit.normal * self.grid.cell_size(),
            (None, Some((_, p))) => p,
            (None, None) => return Ok(None),
        };
        let (index, _) = self.grid.snap(point)?;
        Ok(self.grid.insert_cell(index).then_some(index))
    }

    /// Remove the voxel under a canvas pixel, if any.
    pub fn erase_at(&mut self, canvas: DVec2) -> Result<Option<CellIndex>, WorkbenchError> {
        let pipeline = self.pipeline()?;
        let Some(hit) = pipeline
            .pick_ray(canvas)
            .and_then(|ray| self.grid.raycast(&ray))
        else {
            return Ok(None);
        };
        self.grid.remove_cell(hit.cell);
        Ok(Some(hit.cell))
    }

    /// Where a canvas pixel meets the drawing plane, as (ray distance, point).
    fn plane_hit(
        &self,
        pipeline: &ProjectionPipeline,
        canvas: DVec2,
        ray: &Ray,
    ) -> Option<(f64, DVec3)> {
        if !self.show_plane {
            return None;
        }
        let target = self.camera.target;
        let point = pipeline.canvas_to_world(canvas, pipeline.depth_of(target));
        let local = self.orbit.rotation().inverse() * (point - target);
        let half = DRAWING_PLANE_SIZE * 0.5;
        if local.x.abs() > half || local.y.abs() > half {
            return None;
        }
        let t = (point - ray.origin).dot(ray.direction);
        (t >= 0.0).then_some((t, point))
    }
}

fn seed_light(orbit: &mut OrbitControls, light: DVec3) {
    if !orbit.set_light_direction(light) {
        tracing::warn!(%light, "light faces the camera; keeping the default light");
    }
}
