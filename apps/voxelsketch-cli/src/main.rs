use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{DVec2, DVec3};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use voxelsketch_grid::{SnapPolicy, VoxelGrid};
use voxelsketch_input::Action;
use voxelsketch_projection::ProjectionPipeline;
use voxelsketch_render::{AsciiCanvasRenderer, DebugTextRenderer};
use voxelsketch_tools::GridInspector;
use voxelsketch_workbench::{Workbench, WorkbenchConfig};

#[derive(Parser)]
#[command(name = "voxelsketch-cli", about = "CLI tool for voxelsketch models")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Snap a world point to the voxel lattice
    #[command(allow_negative_numbers = true)]
    Snap {
        #[arg(short, long, default_value = "0.01")]
        cell_size: f64,
        x: f64,
        y: f64,
        z: f64,
    },
    /// Project a world point to screen and canvas space
    #[command(allow_negative_numbers = true)]
    Project {
        /// Workbench config (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        x: f64,
        y: f64,
        z: f64,
    },
    /// Unproject a canvas pixel back into world space
    #[command(allow_negative_numbers = true)]
    Unproject {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Screen-space depth in [-1, 1]
        #[arg(short, long, default_value = "0.0")]
        depth: f64,
        cx: f64,
        cy: f64,
    },
    /// Summarize a saved model
    Inspect {
        model: PathBuf,
        #[arg(short, long, default_value = "0.01")]
        cell_size: f64,
        /// List every occupied cell
        #[arg(long)]
        cells: bool,
        /// Snap by per-axis truncation, as older models were written
        #[arg(long)]
        legacy_truncate: bool,
    },
    /// Render a saved model to the terminal
    #[command(allow_negative_numbers = true)]
    Render {
        model: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "80")]
        cols: usize,
        #[arg(long, default_value = "40")]
        rows: usize,
        /// Orbit yaw applied before rendering, in degrees
        #[arg(long, default_value = "0.0")]
        yaw: f64,
        /// Orbit pitch applied before rendering, in degrees
        #[arg(long, default_value = "0.0")]
        pitch: f64,
        /// Zoom factor applied before rendering
        #[arg(long, default_value = "1.0")]
        zoom: f64,
        /// Print the per-cell text dump instead of the canvas
        #[arg(long)]
        text: bool,
    },
    /// Snap and deduplicate a model, writing the result
    Normalize {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long, default_value = "0.01")]
        cell_size: f64,
        /// Snap by per-axis truncation, as older models were written
        #[arg(long)]
        legacy_truncate: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WorkbenchConfig> {
    match path {
        Some(path) => WorkbenchConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(WorkbenchConfig::default()),
    }
}

fn load_grid(path: &Path, cell_size: f64, legacy_truncate: bool) -> anyhow::Result<VoxelGrid> {
    let points = voxelsketch_persist::load_model(path)
        .with_context(|| format!("loading model {}", path.display()))?;
    let policy = if legacy_truncate {
        SnapPolicy::Truncate
    } else {
        SnapPolicy::Nearest
    };
    let mut grid = VoxelGrid::try_new(cell_size)?.with_policy(policy);
    voxelsketch_persist::import_into(&mut grid, &points)?;
    Ok(grid)
}

fn fmt_vec3(v: DVec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("voxelsketch-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("grid: {}", voxelsketch_grid::crate_info());
            println!("projection: {}", voxelsketch_projection::crate_info());
            println!("input: {}", voxelsketch_input::crate_info());
            println!("persist: {}", voxelsketch_persist::crate_info());
            println!("render: {}", voxelsketch_render::crate_info());
            println!("tools: {}", voxelsketch_tools::crate_info());
            println!("workbench: {}", voxelsketch_workbench::crate_info());
        }
        Commands::Snap { cell_size, x, y, z } => {
            let grid = VoxelGrid::try_new(cell_size)?;
            let (index, center) = grid.snap(DVec3::new(x, y, z))?;
            println!("cell [{index}] center={}", fmt_vec3(center));
        }
        Commands::Project { config, x, y, z } => {
            let config = load_config(config.as_deref())?;
            let pipeline = ProjectionPipeline::new(&config.camera, config.viewport)?;
            let screen = pipeline.world_to_screen(DVec3::new(x, y, z));
            let canvas = pipeline.screen_to_canvas(screen);
            println!("screen={}", fmt_vec3(screen));
            println!("canvas=({:.2}, {:.2})", canvas.x, canvas.y);
            if !ProjectionPipeline::in_clip_volume(screen) {
                println!("(outside the view volume)");
            }
        }
        Commands::Unproject {
            config,
            depth,
            cx,
            cy,
        } => {
            let config = load_config(config.as_deref())?;
            let pipeline = ProjectionPipeline::new(&config.camera, config.viewport)?;
            let world = pipeline.canvas_to_world(DVec2::new(cx, cy), depth);
            println!("world={}", fmt_vec3(world));
        }
        Commands::Inspect {
            model,
            cell_size,
            cells,
            legacy_truncate,
        } => {
            let grid = load_grid(&model, cell_size, legacy_truncate)?;
            println!("{}", GridInspector::summary(&grid));
            if cells {
                for index in GridInspector::list_cells(&grid) {
                    println!("  [{index}] {}", fmt_vec3(grid.cell_center(index)));
                }
            }
        }
        Commands::Render {
            model,
            config,
            cols,
            rows,
            yaw,
            pitch,
            zoom,
            text,
        } => {
            let config = load_config(config.as_deref())?;
            let points = voxelsketch_persist::load_model(&model)
                .with_context(|| format!("loading model {}", model.display()))?;
            let mut workbench = Workbench::new(&config)?;
            voxelsketch_persist::import_into(workbench.grid_mut(), &points)?;
            workbench.apply(Action::Rotate {
                yaw_degrees: yaw,
                pitch_degrees: pitch,
            })?;
            workbench.apply(Action::Zoom(zoom))?;

            let frame = if text {
                workbench.render(&DebugTextRenderer::new())?
            } else {
                workbench.render(&AsciiCanvasRenderer::new(cols, rows))?
            };
            print!("{frame}");
        }
        Commands::Normalize {
            input,
            output,
            cell_size,
            legacy_truncate,
        } => {
            let grid = load_grid(&input, cell_size, legacy_truncate)?;
            voxelsketch_persist::save_model(&grid, &output)
                .with_context(|| format!("writing model {}", output.display()))?;
            tracing::info!(cells = grid.len(), path = %output.display(), "model normalized");
        }
    }

    Ok(())
}
