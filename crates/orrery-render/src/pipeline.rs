//! Frame orchestration: runs the ordered passes over a CPU framebuffer and
//! hands the tonemapped result to the display host.

use orrery_scene::SceneRoot;

use crate::camera::Camera;
use crate::framebuffer::{Frame, Framebuffer};
use crate::pass::{FrameUniforms, PassContext, PassIntensities, RenderPass};
use crate::passes::{
    BackgroundPass, CelPass, CoronaPass, GeometryPass, OutlineConfig, StarSurfaceConfig,
    StarSurfacePass,
};

/// Errors raised while presenting a frame.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Writing the frame failed.
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),

    /// The display target could not encode the frame.
    #[error("failed to encode frame {index}: {source}")]
    Encode {
        index: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Receives every finished frame.
pub trait DisplayTarget {
    fn present(&mut self, frame: &Frame) -> Result<(), OutputError>;
}

/// Display target that keeps frames in memory.
#[derive(Debug, Default)]
pub struct FrameCapture {
    pub frames: Vec<Frame>,
    /// Keep at most this many of the newest frames; `0` keeps all.
    pub limit: usize,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the newest `limit` frames.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            frames: Vec::new(),
            limit,
        }
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl DisplayTarget for FrameCapture {
    fn present(&mut self, frame: &Frame) -> Result<(), OutputError> {
        self.frames.push(frame.clone());
        if self.limit > 0 && self.frames.len() > self.limit {
            let excess = self.frames.len() - self.limit;
            self.frames.drain(..excess);
        }
        Ok(())
    }
}

/// Construction parameters for [`ShadingPipeline::with_default_passes`].
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineSettings {
    pub width: u32,
    pub height: u32,
    /// Cel-shading band count.
    pub levels: u32,
    pub intensities: PassIntensities,
    /// Seed of the background starfield.
    pub sky_seed: u64,
    pub star_count: u32,
    /// Milky-way band brightness, `0` disables it.
    pub milky_way: f32,
    /// Seed of the star surface and corona noise.
    pub noise_seed: u32,
    /// Light range, `0` for unbounded.
    pub light_range: f64,
    pub exposure: f32,
    pub star_surface: StarSurfaceConfig,
    pub outline: OutlineConfig,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            levels: 4,
            intensities: PassIntensities::default(),
            sky_seed: 7,
            star_count: 4000,
            milky_way: 1.0,
            noise_seed: 3,
            light_range: 0.0,
            exposure: 1.0,
            star_surface: StarSurfaceConfig::default(),
            outline: OutlineConfig::default(),
        }
    }
}

/// Ordered sequence of render passes over one framebuffer.
pub struct ShadingPipeline {
    passes: Vec<Box<dyn RenderPass>>,
    uniforms: FrameUniforms,
    time: f64,
    framebuffer: Framebuffer,
    width: u32,
    height: u32,
    light_range: f64,
    exposure: f32,
    frame_index: u64,
}

impl ShadingPipeline {
    /// An empty pipeline; add passes with [`push_pass`](Self::push_pass).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            passes: Vec::new(),
            uniforms: FrameUniforms::default(),
            time: 0.0,
            framebuffer: Framebuffer::new(width, height),
            width,
            height,
            light_range: 0.0,
            exposure: 1.0,
            frame_index: 0,
        }
    }

    /// Background, geometry, star surface, corona and cel passes.
    pub fn with_default_passes(settings: &PipelineSettings) -> Self {
        let mut pipeline = Self::new(settings.width, settings.height);
        pipeline.uniforms.levels = settings.levels.max(1);
        pipeline.uniforms.intensities = settings.intensities.clone();
        pipeline.light_range = settings.light_range;
        pipeline.exposure = settings.exposure;

        pipeline.push_pass(Box::new(BackgroundPass::new(
            settings.sky_seed,
            settings.star_count,
            settings.milky_way,
        )));
        pipeline.push_pass(Box::new(GeometryPass::default()));
        pipeline.push_pass(Box::new(StarSurfacePass::new(
            settings.noise_seed,
            settings.star_surface.clone(),
        )));
        pipeline.push_pass(Box::new(CoronaPass::new(settings.noise_seed.wrapping_add(1))));
        pipeline.push_pass(Box::new(CelPass::new(settings.outline.clone())));
        pipeline
    }

    /// Append a pass at the end of the sequence.
    pub fn push_pass(&mut self, pass: Box<dyn RenderPass>) {
        log::debug!("Added render pass '{}'", pass.name());
        self.passes.push(pass);
    }

    /// Names of all passes in execution order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Toggle a pass by name. Returns false if no pass has that name.
    pub fn set_pass_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.passes.iter_mut().find(|p| p.name() == name) {
            Some(pass) => {
                pass.set_enabled(enabled);
                log::info!(
                    "Render pass '{}' {}",
                    name,
                    if enabled { "enabled" } else { "disabled" }
                );
                true
            }
            None => {
                log::warn!("No render pass named '{}'", name);
                false
            }
        }
    }

    pub fn is_pass_enabled(&self, name: &str) -> Option<bool> {
        self.passes
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.enabled())
    }

    /// Typed access to a pass for reconfiguration.
    pub fn pass_mut<T: RenderPass + 'static>(&mut self) -> Option<&mut T> {
        self.passes
            .iter_mut()
            .find_map(|p| p.as_any_mut().downcast_mut::<T>())
    }

    /// Set the cel band count (at least 1).
    pub fn set_levels(&mut self, levels: u32) {
        self.uniforms.levels = levels.max(1);
    }

    pub fn intensities_mut(&mut self) -> &mut PassIntensities {
        &mut self.uniforms.intensities
    }

    pub fn uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    /// Update the per-frame uniforms. Call once before [`render`](Self::render).
    pub fn update_uniforms(&mut self, time: f64) {
        self.time = time;
        self.uniforms.time = time as f32;
    }

    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure.max(0.0);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of frames presented so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// The framebuffer of the last rendered frame.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Resize the output: updates the camera aspect and every pass.
    /// Zero-sized requests are ignored.
    pub fn on_resize(&mut self, width: u32, height: u32, camera: &mut Camera) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::info!(
            "Resizing output {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        camera.set_aspect_ratio(width, height);
        for pass in &mut self.passes {
            pass.resize(width, height);
        }
        self.framebuffer.clear(width, height);
    }

    /// Run every enabled pass over the scene and present the result.
    pub fn render(
        &mut self,
        scene: &SceneRoot,
        camera: &Camera,
        target: &mut dyn DisplayTarget,
    ) -> Result<(), OutputError> {
        let mut framebuffer = std::mem::replace(&mut self.framebuffer, Framebuffer::new(0, 0));
        framebuffer.clear(self.width, self.height);

        let ctx = PassContext::new(scene, camera, &self.uniforms, self.light_range);
        for pass in self.passes.iter_mut().filter(|p| p.enabled()) {
            framebuffer = pass.execute(&ctx, framebuffer);
        }
        debug_assert_eq!(framebuffer.width(), self.width);
        debug_assert_eq!(framebuffer.height(), self.height);

        let frame = Frame {
            width: self.width,
            height: self.height,
            index: self.frame_index,
            time: self.time,
            pixels: framebuffer.to_rgba8(self.exposure),
        };
        self.framebuffer = framebuffer;
        self.frame_index += 1;
        target.present(&frame)
    }
}
