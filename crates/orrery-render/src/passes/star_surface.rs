//! Procedural star surface: blackbody color modulated by animated fractal
//! turbulence and darkened toward the limb.

use std::any::Any;

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::color::{blackbody_to_rgb, luminance, scale};
use crate::framebuffer::{Framebuffer, NO_BODY};
use crate::pass::{PassContext, RenderPass};

/// Surface shading parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct StarSurfaceConfig {
    /// Base frequency of the granulation noise on the unit sphere.
    pub frequency: f64,
    /// Number of noise octaves.
    pub octaves: u32,
    /// Turbulence drift speed.
    pub flow_speed: f64,
    /// How strongly turbulence modulates brightness, `[0, 1]`.
    pub turbulence: f32,
    /// Limb darkening coefficient `u` in `1 - u(1 - mu)`.
    pub limb_darkening: f32,
    /// Blend of the surface texture into the procedural color, `[0, 1]`.
    pub texture_mix: f32,
}

impl Default for StarSurfaceConfig {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            octaves: 4,
            flow_speed: 0.05,
            turbulence: 0.45,
            limb_darkening: 0.6,
            texture_mix: 0.3,
        }
    }
}

/// Replaces star pixels with the procedural surface.
pub struct StarSurfacePass {
    enabled: bool,
    noise: Simplex,
    /// Shading parameters.
    pub config: StarSurfaceConfig,
}

impl StarSurfacePass {
    pub const NAME: &'static str = "star_surface";

    pub fn new(seed: u32, config: StarSurfaceConfig) -> Self {
        Self {
            enabled: true,
            noise: Simplex::new(seed),
            config,
        }
    }

    /// Fractal turbulence in `[0, 1]` at a point on the unit sphere.
    pub fn turbulence(&self, normal: DVec3, time: f64) -> f32 {
        let drift = time * self.config.flow_speed;
        let flow = DVec3::new(drift, 0.0, -drift * 0.7);
        let mut total = 0.0;
        let mut frequency = self.config.frequency;
        let mut amplitude = 1.0;
        let mut norm = 0.0;
        for _ in 0..self.config.octaves.max(1) {
            let p = normal * frequency + flow;
            total += self.noise.get([p.x, p.y, p.z]).abs() * amplitude;
            norm += amplitude;
            frequency *= 2.0;
            amplitude *= 0.5;
        }
        (total / norm).clamp(0.0, 1.0) as f32
    }

    /// Brightness factor for the cosine `mu` between normal and view direction.
    pub fn limb_factor(&self, mu: f32) -> f32 {
        1.0 - self.config.limb_darkening * (1.0 - mu.clamp(0.0, 1.0))
    }
}

impl RenderPass for StarSurfacePass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn execute(&mut self, ctx: &PassContext<'_>, mut target: Framebuffer) -> Framebuffer {
        let time = ctx.uniforms.time as f64;
        let strength = ctx.uniforms.intensities.star_surface;
        let (width, height) = (target.width(), target.height());

        for y in 0..height {
            for x in 0..width {
                let i = target.index(x, y);
                let slot = target.body[i];
                if slot == NO_BODY {
                    continue;
                }
                let body = &ctx.bodies[slot as usize];
                let Some(star) = body.star else {
                    continue;
                };

                let normal = DVec3::from_array(target.normal[i].map(f64::from));
                let view = ctx.camera.ray_for_pixel(x, y, width, height).direction;
                let mu = normal.dot(-view) as f32;
                let local = body.orientation.inverse() * normal;

                let base = scale(blackbody_to_rgb(star.temperature), star.luminosity * strength);
                let turbulence = self.turbulence(local, time);
                let swing = self.config.turbulence;
                let granulation = 1.0 - swing + 2.0 * swing * turbulence;
                let [u, v] = target.uv[i];
                let texture = body.material.albedo(u, v);
                let texture_gain = 1.0 - self.config.texture_mix
                    + self.config.texture_mix * luminance(texture) * 2.0;

                let color = scale(base, granulation * self.limb_factor(mu) * texture_gain);
                target.color[i] = [color[0], color[1], color[2], 1.0];
            }
        }
        target
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
