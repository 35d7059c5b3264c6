//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Output viewport.
    pub window: WindowConfig,
    /// Shading pipeline settings.
    pub render: RenderConfig,
    /// Clock, kinematics and catalog settings.
    pub simulation: SimulationConfig,
    /// Frame output and asset locations.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

/// Which optional passes run. Geometry always runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PassToggles {
    pub background: bool,
    pub star_surface: bool,
    pub corona: bool,
    pub cel: bool,
}

/// Shading pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of cel-shading bands.
    pub levels: u32,
    /// Exposure applied before tonemapping.
    pub exposure: f32,
    /// Unlit fraction of surface albedo.
    pub ambient: f32,
    pub light_intensity: f32,
    /// Light range in scene units, 0 = unbounded.
    pub light_range: f64,
    pub corona_intensity: f32,
    pub star_surface_intensity: f32,
    pub background_intensity: f32,
    /// Background starfield seed.
    pub sky_seed: u64,
    /// Number of background stars.
    pub star_count: u32,
    /// Milky-way band brightness, 0 disables it.
    pub milky_way: f32,
    /// Star surface and corona noise seed.
    pub noise_seed: u32,
    /// Ring particle budget multiplier in `(0, 1]`.
    pub ring_quality: f64,
    /// Draw silhouette outlines.
    pub outlines: bool,
    pub outline_strength: f32,
    /// Relative depth jump that counts as an outline edge.
    pub edge_threshold: f32,
    pub passes: PassToggles,
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial clock multiplier, clamped to `[0.1, 100]` by the clock.
    pub time_scale: f64,
    pub start_paused: bool,
    /// Fixed step per frame in seconds; 0 uses the wall clock.
    pub fixed_frame_time: f64,
    /// Divides self-rotation rates.
    pub time_unit_scale: f64,
    /// Seed of the ring field generator.
    pub seed: u64,
    /// RON catalog to load; the built-in solar system when unset.
    pub catalog: Option<PathBuf>,
}

/// Camera placement, orbiting the star.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the star in scene units.
    pub distance: f64,
    /// Elevation above the orbital plane in degrees.
    pub elevation_deg: f64,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
}

/// Frame output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory frames are written to.
    pub directory: PathBuf,
    /// Number of frames to render, 0 runs until interrupted.
    pub frames: u64,
    /// Write every n-th frame.
    pub every: u64,
    /// Directory holding PNG textures named in the catalog.
    pub asset_dir: Option<PathBuf>,
    pub camera: CameraConfig,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log per-frame timing at debug level.
    pub frame_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for PassToggles {
    fn default() -> Self {
        Self {
            background: true,
            star_surface: true,
            corona: true,
            cel: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            levels: 4,
            exposure: 1.0,
            ambient: 0.08,
            light_intensity: 1.0,
            light_range: 0.0,
            corona_intensity: 1.0,
            star_surface_intensity: 1.0,
            background_intensity: 1.0,
            sky_seed: 7,
            star_count: 4000,
            milky_way: 1.0,
            noise_seed: 3,
            ring_quality: 1.0,
            outlines: true,
            outline_strength: 0.85,
            edge_threshold: 0.05,
            passes: PassToggles::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            start_paused: false,
            fixed_frame_time: 1.0 / 60.0,
            time_unit_scale: 1.0,
            seed: 42,
            catalog: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 900.0,
            elevation_deg: 25.0,
            fov_deg: 45.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("frames"),
            frames: 120,
            every: 1,
            asset_dir: None,
            camera: CameraConfig::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            frame_stats: false,
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the orrery, `None` if the platform has none.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orrery"))
}

// --- Load / Save / Reload / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!(
                    "viewport {}x{} has no pixels",
                    self.window.width, self.window.height
                ),
            });
        }
        if self.render.levels == 0 {
            return Err(ConfigError::Invalid {
                field: "render.levels",
                reason: "at least one band is required".to_string(),
            });
        }
        if !(self.render.ring_quality > 0.0 && self.render.ring_quality <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "render.ring_quality",
                reason: format!("{} is outside (0, 1]", self.render.ring_quality),
            });
        }
        if !(self.simulation.time_unit_scale.is_finite() && self.simulation.time_unit_scale > 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "simulation.time_unit_scale",
                reason: format!("{} is not positive", self.simulation.time_unit_scale),
            });
        }
        let step = self.simulation.fixed_frame_time;
        if !step.is_finite() || step < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.fixed_frame_time",
                reason: format!("{step} is not a valid step"),
            });
        }
        if self.output.every == 0 {
            return Err(ConfigError::Invalid {
                field: "output.every",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }
}
