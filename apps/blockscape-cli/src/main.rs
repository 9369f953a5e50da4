mod config;
mod report;
mod sheet;

use anyhow::Context;
use blockscape_blocks::{BlockAnimations, BlockTypeRegistry};
use blockscape_common::{ShaderHandle, TextureHandle};
use blockscape_render::{AssetTable, OrthoCamera, RecordingContext, TerrainRenderer};
use blockscape_render_wgpu::WgpuContext;
use blockscape_terrain::Terrain;
use clap::{Parser, Subcommand};
use glam::Vec2;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::BlockscapeConfig;

#[derive(Parser)]
#[command(name = "blockscape-cli", about = "CLI tool for blockscape terrain rendering")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config with optional `registry`, `terrain` and `renderer` sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Validate the block registry and list its types
    Registry,
    /// Render one frame through the recording context and print its draw calls
    Plan {
        /// Override the terrain seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Camera focus in world units
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        focus_x: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        focus_y: f32,
        /// Advance block animations before rendering (seconds)
        #[arg(long, default_value = "0")]
        time: f32,
        /// Print a JSON report instead of the command transcript
        #[arg(long)]
        json: bool,
    },
    /// Render one frame on a headless GPU device
    Gpu {
        #[arg(long, default_value = "640")]
        width: u32,
        #[arg(long, default_value = "360")]
        height: u32,
        /// Write the frame as a binary PPM image
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = BlockscapeConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("blockscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", blockscape_common::crate_info());
            println!("blocks: {}", blockscape_blocks::crate_info());
            println!("terrain: {}", blockscape_terrain::crate_info());
            println!("render: {}", blockscape_render::crate_info());
        }
        Commands::Registry => {
            let registry = BlockTypeRegistry::from_config(&config.registry)?;
            println!(
                "Registry: {} types, sheet={:?}, base={}",
                registry.len(),
                registry.sheet(),
                registry.name(registry.base_type()).unwrap_or("?")
            );
            for block in registry.types() {
                let meta = registry.metadata_for(block);
                let scale = meta.uv_scale();
                println!(
                    "  {:>3}  {:<12} render={:<5} frames={} uv_scale=({:.3}, {:.3})",
                    block.0,
                    registry.name(block).unwrap_or("?"),
                    meta.renderable,
                    meta.frame_count,
                    if meta.renderable { scale.x } else { 0.0 },
                    if meta.renderable { scale.y } else { 0.0 },
                );
            }
        }
        Commands::Plan {
            seed,
            focus_x,
            focus_y,
            time,
            json,
        } => {
            let mut config = config;
            if let Some(seed) = seed {
                config.terrain.seed = seed;
            }
            let registry = Arc::new(BlockTypeRegistry::from_config(&config.registry)?);
            let mut animations = BlockAnimations::new(&registry);
            animations.tick(time, &registry);

            let mut ctx = RecordingContext::new();
            let mut terrain = Terrain::new(config.terrain.clone(), registry.clone())?;
            let focus = Vec2::new(focus_x, focus_y);
            terrain.update_focus(focus, &mut ctx)?;

            let assets = AssetTable::new()
                .with_shader(config.renderer.shader.clone(), ShaderHandle(1))
                .with_texture(config.renderer.texture.clone(), TextureHandle(1));
            let camera = OrthoCamera::new(focus, Vec2::new(1280.0, 720.0));
            let mut renderer = TerrainRenderer::new(config.renderer.clone());
            let stats = renderer.render(&mut ctx, &assets, &camera, &terrain, &animations)?;
            ctx.verify().context("recorded frame violates binding order")?;

            if json {
                let report =
                    report::frame_report(&terrain, &registry, &animations, focus.to_array(), stats);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", ctx.transcript());
                println!(
                    "chunks={} drawn={} draws={} instances={}",
                    stats.chunks_visited, stats.chunks_drawn, stats.draws, stats.instances
                );
            }
        }
        Commands::Gpu { width, height, out } => {
            let registry = Arc::new(BlockTypeRegistry::from_config(&config.registry)?);
            let animations = BlockAnimations::new(&registry);
            let mut ctx = WgpuContext::headless()?;

            let shader = ctx.register_terrain_shader();
            let [sheet_w, sheet_h] = config.registry.sheet_size;
            let (sheet_w, sheet_h) = (sheet_w as u32, sheet_h as u32);
            let texture = ctx.register_texture(
                &config.renderer.texture,
                &sheet::placeholder_sheet(sheet_w, sheet_h),
                sheet_w,
                sheet_h,
            )?;
            let assets = AssetTable::new()
                .with_shader(config.renderer.shader.clone(), shader)
                .with_texture(config.renderer.texture.clone(), texture);

            let mut terrain = Terrain::new(config.terrain.clone(), registry.clone())?;
            terrain.update_focus(Vec2::ZERO, &mut ctx)?;

            let camera = OrthoCamera::new(Vec2::ZERO, Vec2::new(width as f32, height as f32));
            let mut renderer = TerrainRenderer::new(config.renderer.clone());
            let stats = renderer.render(&mut ctx, &assets, &camera, &terrain, &animations)?;

            let target = ctx.create_target(width, height);
            let submitted = ctx.submit(target.view());
            let pixels = ctx.read_target(&target)?;
            println!(
                "GPU frame {width}x{height}: chunks={} draws={} (submitted {}, skipped {}) instances={}",
                stats.chunks_visited, stats.draws, submitted.draws, submitted.skipped, stats.instances
            );

            if let Some(path) = out {
                write_ppm(&path, width, height, &pixels)?;
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

/// Binary PPM (P6), alpha dropped.
fn write_ppm(path: &Path, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = std::io::BufWriter::new(file);
    write!(out, "P6\n{width} {height}\n255\n")?;
    for pixel in rgba.chunks_exact(4) {
        out.write_all(&pixel[..3])?;
    }
    out.flush()?;
    Ok(())
}
