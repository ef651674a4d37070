use voxelsketch_grid::VoxelGrid;
use voxelsketch_projection::ProjectionPipeline;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the grid and a projection pipeline, then produces output.
/// The grid is owned by the workbench; renderers only ever borrow it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, grid: &VoxelGrid, pipeline: &ProjectionPipeline) -> Self::Output;
}

/// Debug text renderer.
///
/// Lists every occupied cell with its world position and where it lands on
/// the canvas. Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, grid: &VoxelGrid, pipeline: &ProjectionPipeline) -> String {
        let camera = pipeline.camera();
        let viewport = pipeline.viewport();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Voxel Grid (cells={}, cell_size={}) ===\n",
            grid.len(),
            grid.cell_size()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees
        ));
        out.push_str(&format!("Viewport: {}x{}\n", viewport.width, viewport.height));

        for cell in grid.cells() {
            let p = grid.cell_center(cell);
            let screen = pipeline.world_to_screen(p);
            if ProjectionPipeline::in_clip_volume(screen) {
                let c = pipeline.screen_to_canvas(screen);
                out.push_str(&format!(
                    "  [{cell}] pos=({:.3}, {:.3}, {:.3}) canvas=({:.1}, {:.1}) depth={:.4}\n",
                    p.x, p.y, p.z, c.x, c.y, screen.z
                ));
            } else {
                out.push_str(&format!(
                    "  [{cell}] pos=({:.3}, {:.3}, {:.3}) clipped\n",
                    p.x, p.y, p.z
                ));
            }
        }

        out
    }
}
