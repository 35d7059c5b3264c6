//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Renders an animated star system to PNG frames")]
pub struct CliArgs {
    /// Output width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of frames to render (0 runs until interrupted).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Directory frames are written to.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// RON star system catalog (defaults to the built-in solar system).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory holding PNG textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Simulation time multiplier.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Ring generator seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cel-shading band count.
    #[arg(long)]
    pub levels: Option<u32>,

    /// Start with the clock paused.
    #[arg(long)]
    pub paused: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(frames) = args.frames {
            self.output.frames = frames;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(ref catalog) = args.catalog {
            self.simulation.catalog = Some(catalog.clone());
        }
        if let Some(ref assets) = args.assets {
            self.output.asset_dir = Some(assets.clone());
        }
        if let Some(scale) = args.time_scale {
            self.simulation.time_scale = scale;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = seed;
        }
        if let Some(levels) = args.levels {
            self.render.levels = levels;
        }
        if args.paused {
            self.simulation.start_paused = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
