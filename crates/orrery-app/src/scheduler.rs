//! Explicit frame scheduler: one call to [`FrameScheduler::run_frame`] per
//! frame, driven by whatever loop the host runs.

use orrery_orbit::OrbitalKinematics;
use orrery_render::{Camera, DisplayTarget, OutputError, ShadingPipeline};
use orrery_scene::{AssetResolver, ImageHandle, Ray, SceneRoot};
use tracing::{debug, info};

use crate::clock::SimulationClock;

/// What one frame did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Index of the presented frame.
    pub index: u64,
    /// Simulation delta of this frame's tick.
    pub delta: f64,
    /// Simulation time the scene was advanced to.
    pub elapsed: f64,
    /// Textures bound before this frame.
    pub bound_assets: usize,
}

/// Owns the scene and every stage of the frame loop.
///
/// Within a frame the order is fixed: pending assets are retried, the clock
/// ticks, every node is advanced, then the scene is rendered. The pipeline
/// never sees a partially advanced scene.
pub struct FrameScheduler {
    scene: SceneRoot,
    camera: Camera,
    clock: SimulationClock,
    kinematics: OrbitalKinematics,
    pipeline: ShadingPipeline,
    fixed_frame_time: Option<f64>,
    resolver: Option<Box<dyn AssetResolver>>,
}

impl FrameScheduler {
    pub fn new(
        scene: SceneRoot,
        camera: Camera,
        clock: SimulationClock,
        kinematics: OrbitalKinematics,
        pipeline: ShadingPipeline,
    ) -> Self {
        Self {
            scene,
            camera,
            clock,
            kinematics,
            pipeline,
            fixed_frame_time: None,
            resolver: None,
        }
    }

    /// Tick by a fixed frame time instead of the wall clock.
    pub fn with_fixed_frame_time(mut self, frame_time: f64) -> Self {
        self.fixed_frame_time = Some(frame_time);
        self
    }

    /// Resolver retried every frame while placeholder materials remain.
    pub fn with_asset_resolver(mut self, resolver: Box<dyn AssetResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Run one frame: tick, advance, render.
    pub fn run_frame(
        &mut self,
        target: &mut dyn DisplayTarget,
    ) -> Result<FrameReport, OutputError> {
        let bound_assets = match self.resolver.as_deref_mut() {
            Some(resolver) => self.scene.refresh_pending(resolver),
            None => 0,
        };

        let delta = match self.fixed_frame_time {
            Some(frame_time) => self.clock.tick_with(frame_time),
            None => self.clock.tick(),
        };
        let elapsed = self.clock.elapsed();

        self.kinematics.advance_scene(&mut self.scene, elapsed);

        let index = self.pipeline.frame_count();
        self.pipeline.update_uniforms(elapsed);
        self.pipeline.render(&self.scene, &self.camera, target)?;
        debug!("Frame {index}: t={elapsed:.3}s, dt={delta:.4}s");

        Ok(FrameReport {
            index,
            delta,
            elapsed,
            bound_assets,
        })
    }

    /// Advance the scene to the clock's current time without ticking or
    /// rendering.
    pub fn sync_scene(&mut self) {
        self.kinematics
            .advance_scene(&mut self.scene, self.clock.elapsed());
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    /// Returns the clamped scale in effect.
    pub fn set_time_scale(&mut self, scale: f64) -> f64 {
        self.clock.set_time_scale(scale)
    }

    /// Id of the nearest body hit by a world-space ray.
    pub fn pick_body(&self, ray: &Ray) -> Option<&str> {
        self.scene.pick_body(ray)
    }

    /// Id of the nearest body under an output pixel.
    pub fn pick_pixel(&self, x: u32, y: u32) -> Option<&str> {
        let (width, height) = self.pipeline.size();
        if x >= width || y >= height {
            return None;
        }
        let ray = self.camera.ray_for_pixel(x, y, width, height);
        self.scene.pick_body(&ray)
    }

    /// Resize the output: camera aspect and every pass framebuffer.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.pipeline.on_resize(width, height, &mut self.camera);
    }

    /// Bind a texture that finished loading to every node waiting for it.
    pub fn bind_asset(&mut self, name: &str, image: ImageHandle) -> usize {
        let bound = self.scene.bind_asset(name, image);
        if bound == 0 {
            info!("Asset '{name}' arrived but no body is waiting for it");
        }
        bound
    }

    pub fn scene(&self) -> &SceneRoot {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneRoot {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn pipeline(&self) -> &ShadingPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut ShadingPipeline {
        &mut self.pipeline
    }
}
