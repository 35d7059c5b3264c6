//! The `orrery` binary: renders the configured star system to a PNG
//! sequence.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_app::{
    AppError, DirectoryAssetResolver, PngSequence, Startup, build_scheduler, load_catalog,
};
use orrery_config::{CliArgs, Config};
use orrery_scene::{AssetResolver, MemoryAssetResolver};
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("orrery: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let platform = PlatformDirs::resolve()?;
    platform.create_dirs()?;
    let config_dir = args
        .config
        .clone()
        .unwrap_or_else(|| platform.config_dir.clone());

    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);
    orrery_log::init_logging(
        Some(&platform.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!("Config directory: {}", config_dir.display());

    let catalog = load_catalog(&config)?;
    let resolver: Box<dyn AssetResolver> = match &config.output.asset_dir {
        Some(dir) => Box::new(DirectoryAssetResolver::new(dir.clone())),
        None => Box::new(MemoryAssetResolver::new()),
    };
    let Startup {
        mut scheduler,
        rejected,
    } = build_scheduler(&config, &catalog, resolver)?;
    if !rejected.is_empty() {
        info!("{} bodies were left out of the scene", rejected.len());
    }

    let mut output = PngSequence::create(&config.output.directory, config.output.every)?;
    info!(
        "Rendering {} to {}",
        match config.output.frames {
            0 => "until interrupted".to_string(),
            n => format!("{n} frames"),
        },
        output.directory().display()
    );

    let started = Instant::now();
    let mut frames = 0u64;
    while config.output.frames == 0 || frames < config.output.frames {
        let frame_start = Instant::now();
        let report = scheduler.run_frame(&mut output)?;
        frames += 1;
        if config.debug.frame_stats {
            debug!(
                "Frame {} rendered in {:.1}ms (t={:.2}s)",
                report.index,
                frame_start.elapsed().as_secs_f64() * 1000.0,
                report.elapsed
            );
        }
    }

    info!(
        "Rendered {} frames in {:.2}s, wrote {} files",
        frames,
        started.elapsed().as_secs_f64(),
        output.written()
    );
    Ok(())
}
