//! Procedural sky: a seeded starfield with a faint milky-way band, baked once
//! into an equirectangular panorama and looked up per pixel ray.

use std::any::Any;
use std::f64::consts::{PI, TAU};

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::color::blackbody_to_rgb;
use crate::framebuffer::Framebuffer;
use crate::pass::{PassContext, RenderPass};

const PANORAMA_WIDTH: u32 = 1024;
const PANORAMA_HEIGHT: u32 = 512;

/// A single background star.
#[derive(Clone, Debug)]
pub struct StarPoint {
    /// Unit direction on the sky sphere.
    pub direction: DVec3,
    /// Brightness in `[0, 1]`.
    pub brightness: f32,
    /// Linear color from the star's temperature.
    pub color: [f32; 3],
}

/// Deterministic star catalog for a seed.
pub fn generate_stars(seed: u64, count: u32) -> Vec<StarPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let theta = rng.random::<f64>() * TAU;
            let phi = (1.0 - 2.0 * rng.random::<f64>()).acos();
            let direction = DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

            // Power-law: many dim, few bright.
            let brightness = rng.random::<f32>().powf(4.0);
            let temperature = 2500.0 + rng.random::<f32>() * 12_000.0;
            StarPoint {
                direction,
                brightness,
                color: blackbody_to_rgb(temperature),
            }
        })
        .collect()
}

fn direction_to_uv(direction: DVec3) -> (f64, f64) {
    let u = 0.5 + direction.z.atan2(direction.x) / TAU;
    let v = direction.y.clamp(-1.0, 1.0).acos() / PI;
    (u, v)
}

fn uv_to_direction(u: f64, v: f64) -> DVec3 {
    let theta = (u - 0.5) * TAU;
    let phi = v * PI;
    DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

struct Panorama {
    texels: Vec<[f32; 3]>,
}

impl Panorama {
    fn bake(seed: u64, star_count: u32, milky_way: f32) -> Self {
        let (w, h) = (PANORAMA_WIDTH as usize, PANORAMA_HEIGHT as usize);
        let mut texels = vec![[0.0f32; 3]; w * h];

        if milky_way > 0.0 {
            let noise = Simplex::new(seed as u32);
            let band_normal = DVec3::new(0.3, 1.0, 0.2).normalize();
            for y in 0..h {
                for x in 0..w {
                    let u = (x as f64 + 0.5) / w as f64;
                    let v = (y as f64 + 0.5) / h as f64;
                    let dir = uv_to_direction(u, v);
                    let off_plane = dir.dot(band_normal) / 0.22;
                    let band = (-off_plane * off_plane).exp();
                    if band < 1e-3 {
                        continue;
                    }
                    let mut total = 0.0;
                    let mut frequency = 2.5;
                    let mut amplitude = 1.0;
                    for _ in 0..4 {
                        let p = dir * frequency;
                        total += noise.get([p.x, p.y, p.z]) * amplitude;
                        frequency *= 2.0;
                        amplitude *= 0.5;
                    }
                    let clouds = ((total + 1.0) * 0.5).clamp(0.0, 1.0) as f32;
                    let glow = band as f32 * clouds.powf(2.0) * milky_way * 0.12;
                    texels[y * w + x] = [glow * 0.9, glow * 0.85, glow];
                }
            }
        }

        for star in generate_stars(seed, star_count) {
            let (u, v) = direction_to_uv(star.direction);
            let px = ((u * w as f64) as usize).min(w - 1);
            let py = ((v * h as f64) as usize).min(h - 1);
            let b = star.brightness * 3.0 + 0.15;
            for (channel, c) in texels[py * w + px].iter_mut().zip(star.color) {
                *channel += c * b;
            }
        }

        Self { texels }
    }

    fn sample(&self, direction: DVec3) -> [f32; 3] {
        let (u, v) = direction_to_uv(direction);
        let w = PANORAMA_WIDTH as usize;
        let h = PANORAMA_HEIGHT as usize;
        let px = ((u * w as f64) as usize).min(w - 1);
        let py = ((v * h as f64) as usize).min(h - 1);
        self.texels[py * w + px]
    }
}

/// Fills the framebuffer with the sky behind every body.
pub struct BackgroundPass {
    enabled: bool,
    seed: u64,
    star_count: u32,
    milky_way: f32,
    panorama: Option<Panorama>,
}

impl BackgroundPass {
    pub const NAME: &'static str = "background";

    pub fn new(seed: u64, star_count: u32, milky_way: f32) -> Self {
        Self {
            enabled: true,
            seed,
            star_count,
            milky_way,
            panorama: None,
        }
    }

    /// Change the sky; the panorama is re-baked on the next frame.
    pub fn reseed(&mut self, seed: u64, star_count: u32) {
        self.seed = seed;
        self.star_count = star_count;
        self.panorama = None;
    }

    /// Sky radiance in a direction.
    pub fn sample(&mut self, direction: DVec3) -> [f32; 3] {
        let (seed, count, milky_way) = (self.seed, self.star_count, self.milky_way);
        self.panorama
            .get_or_insert_with(|| Panorama::bake(seed, count, milky_way))
            .sample(direction)
    }
}

impl RenderPass for BackgroundPass {
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
        if self.panorama.is_none() {
            log::debug!(
                "Baking sky panorama (seed {}, {} stars)",
                self.seed,
                self.star_count
            );
        }
        let brightness = ctx.uniforms.intensities.background;
        let (width, height) = (target.width(), target.height());
        for y in 0..height {
            for x in 0..width {
                let ray = ctx.camera.ray_for_pixel(x, y, width, height);
                let sky = self.sample(ray.direction);
                let i = target.index(x, y);
                target.color[i] = [
                    sky[0] * brightness,
                    sky[1] * brightness,
                    sky[2] * brightness,
                    1.0,
                ];
            }
        }
        target
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stars() {
        let a = generate_stars(42, 100);
        let b = generate_stars(42, 100);
        for (sa, sb) in a.iter().zip(&b) {
            assert_eq!(sa.direction, sb.direction);
            assert_eq!(sa.brightness, sb.brightness);
        }
        let c = generate_stars(43, 100);
        assert_ne!(a[0].direction, c[0].direction);
    }

    #[test]
    fn test_star_directions_are_unit() {
        for star in generate_stars(7, 500) {
            assert!((star.direction.length() - 1.0).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&star.brightness));
        }
    }

    #[test]
    fn test_uv_mapping_roundtrips() {
        let dir = DVec3::new(0.3, -0.5, 0.8).normalize();
        let (u, v) = direction_to_uv(dir);
        assert!((uv_to_direction(u, v) - dir).length() < 1e-9);
    }

    #[test]
    fn test_sky_contains_light() {
        let mut pass = BackgroundPass::new(1, 50, 1.0);
        for star in generate_stars(1, 50) {
            let c = pass.sample(star.direction);
            assert!(c.iter().all(|v| v.is_finite()));
            assert!(c[0] + c[1] + c[2] > 0.0);
        }
    }
}
