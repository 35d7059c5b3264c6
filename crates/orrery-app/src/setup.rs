//! Startup: turn a loaded [`Config`] and catalog into a ready scheduler.

use glam::DVec3;
use orrery_catalog::{CatalogError, CelestialCatalog, DescriptorError};
use orrery_config::{Config, ConfigError};
use orrery_orbit::OrbitalKinematics;
use orrery_render::passes::{
    BackgroundPass, CelPass, CoronaPass, OutlineConfig, StarSurfaceConfig, StarSurfacePass,
};
use orrery_render::{Camera, OutputError, PassIntensities, PipelineSettings, ShadingPipeline};
use orrery_rings::RingFieldGenerator;
use orrery_scene::{AssetResolver, ComposeError, SceneComposer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::clock::SimulationClock;
use crate::platform::PlatformError;
use crate::scheduler::FrameScheduler;

/// Errors that abort startup or the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("scene composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Catalog named in the config, or the built-in solar system.
pub fn load_catalog(config: &Config) -> Result<CelestialCatalog, CatalogError> {
    match &config.simulation.catalog {
        Some(path) => {
            let catalog = CelestialCatalog::load(path)?;
            info!(
                "Loaded catalog {} ({} bodies)",
                path.display(),
                catalog.body_count()
            );
            Ok(catalog)
        }
        None => {
            let catalog = CelestialCatalog::solar_system();
            info!("Using built-in solar system ({} bodies)", catalog.body_count());
            Ok(catalog)
        }
    }
}

/// Shading pipeline parameters from the render and window sections.
pub fn pipeline_settings(config: &Config) -> PipelineSettings {
    let render = &config.render;
    PipelineSettings {
        width: config.window.width,
        height: config.window.height,
        levels: render.levels,
        intensities: PassIntensities {
            ambient: render.ambient,
            light: render.light_intensity,
            star_surface: render.star_surface_intensity,
            corona: render.corona_intensity,
            background: render.background_intensity,
        },
        sky_seed: render.sky_seed,
        star_count: render.star_count,
        milky_way: render.milky_way,
        noise_seed: render.noise_seed,
        light_range: render.light_range,
        exposure: render.exposure,
        star_surface: StarSurfaceConfig::default(),
        outline: OutlineConfig {
            enabled: render.outlines,
            strength: render.outline_strength,
            depth_threshold: render.edge_threshold,
            ..OutlineConfig::default()
        },
    }
}

/// Camera orbiting the star at the configured distance and elevation.
pub fn camera_for(config: &Config) -> Camera {
    let cam = &config.output.camera;
    let elevation = cam.elevation_deg.to_radians();
    let eye = DVec3::new(
        0.0,
        cam.distance * elevation.sin(),
        cam.distance * elevation.cos(),
    );
    let aspect = config.window.width.max(1) as f64 / config.window.height.max(1) as f64;
    Camera::looking_at(eye, DVec3::ZERO, cam.fov_deg.to_radians(), aspect)
}

/// A scheduler ready to run, plus the bodies composition rejected.
pub struct Startup {
    pub scheduler: FrameScheduler,
    pub rejected: Vec<DescriptorError>,
}

/// Validate the config, compose the catalog and assemble the frame loop.
pub fn build_scheduler(
    config: &Config,
    catalog: &CelestialCatalog,
    mut resolver: Box<dyn AssetResolver>,
) -> Result<Startup, AppError> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.simulation.seed);
    let rings = RingFieldGenerator::with_quality(config.render.ring_quality);
    let composer = SceneComposer::with_ring_generator(rings);
    let composition = composer.compose(catalog, resolver.as_mut(), &mut rng)?;
    for err in &composition.rejected {
        warn!("Body left out of the scene: {err}");
    }

    let mut pipeline = ShadingPipeline::with_default_passes(&pipeline_settings(config));
    let toggles = &config.render.passes;
    for (name, enabled) in [
        (BackgroundPass::NAME, toggles.background),
        (StarSurfacePass::NAME, toggles.star_surface),
        (CoronaPass::NAME, toggles.corona),
        (CelPass::NAME, toggles.cel),
    ] {
        if !enabled {
            pipeline.set_pass_enabled(name, false);
        }
    }

    let mut clock = SimulationClock::new().with_time_scale(config.simulation.time_scale);
    clock.set_paused(config.simulation.start_paused);
    let kinematics =
        OrbitalKinematics::new().with_time_unit_scale(config.simulation.time_unit_scale);

    let mut scheduler = FrameScheduler::new(
        composition.scene,
        camera_for(config),
        clock,
        kinematics,
        pipeline,
    )
    .with_asset_resolver(resolver);
    if config.simulation.fixed_frame_time > 0.0 {
        scheduler = scheduler.with_fixed_frame_time(config.simulation.fixed_frame_time);
    }
    scheduler.sync_scene();

    info!(
        "Scene ready: {} bodies, {} rejected, {}x{}",
        scheduler.scene().len(),
        composition.rejected.len(),
        config.window.width,
        config.window.height
    );
    Ok(Startup {
        scheduler,
        rejected: composition.rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_catalog::CelestialBodyDescriptor;
    use orrery_render::FrameCapture;
    use orrery_scene::MemoryAssetResolver;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.window.width = 32;
        config.window.height = 18;
        config.render.star_count = 50;
        config.render.milky_way = 0.0;
        config.render.ring_quality = 0.05;
        config
    }

    #[test]
    fn test_builds_solar_system() {
        let config = small_config();
        let catalog = load_catalog(&config).unwrap();
        let startup =
            build_scheduler(&config, &catalog, Box::new(MemoryAssetResolver::new())).unwrap();
        assert!(startup.rejected.is_empty());
        assert_eq!(startup.scheduler.scene().len(), catalog.body_count());
    }

    #[test]
    fn test_pass_toggles_applied() {
        let mut config = small_config();
        config.render.passes.corona = false;
        config.render.passes.background = false;
        let catalog = CelestialCatalog::solar_system();
        let startup =
            build_scheduler(&config, &catalog, Box::new(MemoryAssetResolver::new())).unwrap();
        let pipeline = startup.scheduler.pipeline();
        assert_eq!(pipeline.is_pass_enabled("corona"), Some(false));
        assert_eq!(pipeline.is_pass_enabled("background"), Some(false));
        assert_eq!(pipeline.is_pass_enabled("cel"), Some(true));
    }

    #[test]
    fn test_paused_start_and_fixed_step() {
        let mut config = small_config();
        config.simulation.start_paused = true;
        let catalog = CelestialCatalog::solar_system();
        let mut startup =
            build_scheduler(&config, &catalog, Box::new(MemoryAssetResolver::new())).unwrap();
        let report = startup.scheduler.run_frame(&mut FrameCapture::new()).unwrap();
        assert_eq!(report.delta, 0.0);

        startup.scheduler.set_paused(false);
        let report = startup.scheduler.run_frame(&mut FrameCapture::new()).unwrap();
        assert!((report.delta - config.simulation.fixed_frame_time).abs() < 1e-12);
    }

    #[test]
    fn test_rejected_bodies_reported() {
        let config = small_config();
        let catalog = CelestialCatalog::new(vec![
            CelestialCatalog::solar_system().stars().next().cloned().unwrap(),
            CelestialBodyDescriptor::planet("broken", 1.0, -5.0),
            CelestialBodyDescriptor::planet("fine", 1.0, 50.0),
        ]);
        let startup =
            build_scheduler(&config, &catalog, Box::new(MemoryAssetResolver::new())).unwrap();
        assert_eq!(startup.rejected.len(), 1);
        assert_eq!(startup.rejected[0].body_id(), "broken");
        assert!(startup.scheduler.scene().find("fine").is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.render.levels = 0;
        let result = build_scheduler(
            &config,
            &CelestialCatalog::solar_system(),
            Box::new(MemoryAssetResolver::new()),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_camera_looks_at_star() {
        let config = small_config();
        let camera = camera_for(&config);
        let forward = camera.forward();
        let to_star = (DVec3::ZERO - camera.position).normalize();
        assert!((forward - to_star).length() < 1e-9);
    }
}
