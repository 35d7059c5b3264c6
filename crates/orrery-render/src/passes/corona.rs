//! Additive corona around every star: a pulsing radial glow broken up by
//! layered noise and flare spikes.

use std::any::Any;
use std::f64::consts::TAU;

use noise::{NoiseFn, Simplex};

use crate::color::blackbody_to_rgb;
use crate::framebuffer::{Framebuffer, NO_BODY};
use crate::pass::{PassContext, RenderPass};

/// Corona overlay pass.
pub struct CoronaPass {
    enabled: bool,
    noise: Simplex,
    /// Noise layers summed into the glow.
    pub layers: u32,
    /// Relative amplitude of the pulse.
    pub pulse_depth: f32,
}

impl CoronaPass {
    pub const NAME: &'static str = "corona";

    pub fn new(seed: u32) -> Self {
        Self {
            enabled: true,
            noise: Simplex::new(seed),
            layers: 3,
            pulse_depth: 0.15,
        }
    }

    /// Glow multiplier over time for a pulse speed in radians per second.
    pub fn pulse(&self, time: f64, pulse_speed: f32) -> f32 {
        1.0 + self.pulse_depth * (time * pulse_speed as f64).sin() as f32
    }

    /// Glow strength at `ratio` star radii from the centre, at screen angle
    /// `angle` around the disk. Zero inside the disk and beyond `size` radii.
    pub fn glow(
        &self,
        ratio: f64,
        angle: f64,
        time: f64,
        flare_frequency: f32,
        size: f32,
    ) -> f32 {
        let size = size as f64;
        if ratio <= 1.0 || ratio >= size || size <= 1.0 {
            return 0.0;
        }
        let falloff = ((size - ratio) / (size - 1.0)).powi(2);

        let mut layered = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.5;
        for layer in 0..self.layers.max(1) {
            let p = [
                angle.cos() * frequency,
                angle.sin() * frequency,
                time * 0.15 + layer as f64 * 17.0,
            ];
            layered += (self.noise.get(p) * 0.5 + 0.5) * amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        let layered = layered / (2.0 - 0.5f64.powi(self.layers.max(1) as i32 - 1));

        let spikes = (angle * flare_frequency as f64 + time * 0.3).cos().max(0.0).powi(8);
        let spike_reach = 1.0 + spikes * 1.5;

        (falloff * (0.6 + 0.4 * layered) * spike_reach).min(4.0) as f32
    }
}

impl RenderPass for CoronaPass {
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
        let strength = ctx.uniforms.intensities.corona;
        let (width, height) = (target.width(), target.height());
        let (right, up) = (ctx.camera.right(), ctx.camera.up());

        for body in &ctx.bodies {
            let Some(star) = body.star else {
                continue;
            };
            let corona = &star.corona;
            let color = blackbody_to_rgb(star.temperature);
            let gain = corona.intensity
                * strength
                * star.luminosity
                * self.pulse(time, corona.pulse_speed);

            for y in 0..height {
                for x in 0..width {
                    let ray = ctx.camera.ray_for_pixel(x, y, width, height);
                    let along = (body.center - ray.origin).dot(ray.direction);
                    if along <= 0.0 {
                        continue;
                    }
                    let i = target.index(x, y);
                    // Occluded by a body in front of the star.
                    if target.body[i] != NO_BODY && (target.depth[i] as f64) < along {
                        continue;
                    }
                    let offset = ray.at(along) - body.center;
                    let ratio = offset.length() / body.radius;
                    let angle = offset.dot(up).atan2(offset.dot(right)).rem_euclid(TAU);
                    let glow = gain
                        * self.glow(ratio, angle, time, corona.flare_frequency, corona.size);
                    if glow <= 0.0 {
                        continue;
                    }
                    let px = &mut target.color[i];
                    px[0] += color[0] * glow;
                    px[1] += color[1] * glow;
                    px[2] += color[2] * glow;
                }
            }
        }
        target
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
