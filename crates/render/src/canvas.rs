use crate::renderer::Renderer;
use voxelsketch_grid::VoxelGrid;
use voxelsketch_projection::ProjectionPipeline;

/// Shading ramp, nearest first.
const RAMP: &[u8] = b"@%#*+=-:.";

/// Upper bound on canvas columns and rows.
pub const MAX_CANVAS_DIMENSION: usize = 1024;

/// Plots projected grid points onto a character canvas.
///
/// The viewport is divided into `columns x rows` character cells. Each
/// character cell keeps the point nearest to the eye, shaded by distance.
/// Both dimensions are clamped to `1..=MAX_CANVAS_DIMENSION`.
#[derive(Debug, Clone, Copy)]
pub struct AsciiCanvasRenderer {
    pub columns: usize,
    pub rows: usize,
}

impl Default for AsciiCanvasRenderer {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 40,
        }
    }
}

impl AsciiCanvasRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }
}

impl Renderer for AsciiCanvasRenderer {
    type Output = String;

    fn render(&self, grid: &VoxelGrid, pipeline: &ProjectionPipeline) -> String {
        let cols = self.columns.clamp(1, MAX_CANVAS_DIMENSION);
        let rows = self.rows.clamp(1, MAX_CANVAS_DIMENSION);
        let viewport = pipeline.viewport();
        let eye = pipeline.camera().position;

        let mut depth = vec![f64::INFINITY; cols * rows];
        let mut clipped = 0usize;
        for p in grid.iter() {
            let screen = pipeline.world_to_screen(p);
            if !ProjectionPipeline::in_clip_volume(screen) {
                clipped += 1;
                continue;
            }
            let c = pipeline.screen_to_canvas(screen);
            let col = ((c.x / viewport.width * cols as f64).floor() as usize).min(cols - 1);
            let row = ((c.y / viewport.height * rows as f64).floor() as usize).min(rows - 1);
            let slot = &mut depth[row * cols + col];
            *slot = slot.min(p.distance(eye));
        }
        tracing::trace!(points = grid.len(), clipped, "ascii canvas rendered");

        let (near, far) = depth
            .iter()
            .filter(|d| d.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(*d), hi.max(*d))
            });
        let span = far - near;

        let mut out = String::with_capacity((cols + 1) * rows);
        for row in depth.chunks(cols) {
            for d in row {
                if !d.is_finite() {
                    out.push(' ');
                    continue;
                }
                let shade = if span > 0.0 {
                    (((d - near) / span) * (RAMP.len() - 1) as f64).round() as usize
                } else {
                    0
                };
                out.push(RAMP[shade.min(RAMP.len() - 1)] as char);
            }
            out.push('\n');
        }
        out
    }
}
