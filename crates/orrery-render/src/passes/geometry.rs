//! Lit geometry: ray-cast body spheres and atmosphere shells, then splat ring
//! particles and comet tails. Writes color, depth, body slot, normal and UV.

use std::any::Any;
use std::f64::consts::{PI, TAU};

use glam::DVec3;
use orrery_scene::{Ray, ray_sphere_intersect};

use crate::color::{mix, modulate, scale};
use crate::framebuffer::Framebuffer;
use crate::pass::{BodyView, PassContext, RenderPass};

/// Samples along a comet tail.
const TAIL_STEPS: usize = 32;

/// Ray-cast geometry pass.
pub struct GeometryPass {
    enabled: bool,
    /// Draw ring particles.
    pub rings: bool,
    /// Draw atmosphere shells.
    pub atmospheres: bool,
    /// Draw comet tails.
    pub tails: bool,
}

impl Default for GeometryPass {
    fn default() -> Self {
        Self {
            enabled: true,
            rings: true,
            atmospheres: true,
            tails: true,
        }
    }
}

/// Spherical texture coordinates of a body-local unit normal.
pub fn sphere_uv(local_normal: DVec3) -> [f32; 2] {
    let u = 0.5 + local_normal.z.atan2(local_normal.x) / TAU;
    let v = 0.5 - local_normal.y.clamp(-1.0, 1.0).asin() / PI;
    [u as f32, v as f32]
}

fn light_term(ctx: &PassContext<'_>, point: DVec3, normal: Option<DVec3>) -> [f32; 3] {
    let to_light = ctx.light.position - point;
    let distance = to_light.length();
    let facing = match normal {
        Some(n) if distance > 0.0 => n.dot(to_light / distance).max(0.0) as f32,
        Some(_) => 0.0,
        None => 1.0,
    };
    let strength = ctx.light.intensity * ctx.light.attenuation(distance) * facing;
    let ambient = ctx.uniforms.intensities.ambient;
    [
        ambient + ctx.light.color[0] * strength,
        ambient + ctx.light.color[1] * strength,
        ambient + ctx.light.color[2] * strength,
    ]
}

/// Blend a disc into the framebuffer behind the existing depth.
fn splat(
    target: &mut Framebuffer,
    center: (f64, f64),
    radius_px: f64,
    depth: f32,
    color: [f32; 3],
    alpha: f32,
) {
    let (width, height) = (target.width() as i64, target.height() as i64);
    let (cx, cy) = center;
    let r = radius_px.max(0.5);
    let x0 = (cx - r).floor().max(0.0) as i64;
    let x1 = ((cx + r).ceil() as i64).min(width - 1);
    let y0 = (cy - r).floor().max(0.0) as i64;
    let y1 = ((cy + r).ceil() as i64).min(height - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let i = target.index(x as u32, y as u32);
            if depth >= target.depth[i] {
                continue;
            }
            let px = &mut target.color[i];
            let blended = mix([px[0], px[1], px[2]], color, alpha);
            *px = [blended[0], blended[1], blended[2], px[3]];
        }
    }
}

impl GeometryPass {
    pub const NAME: &'static str = "geometry";

    fn nearest_hit(ctx: &PassContext<'_>, ray: &Ray) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, body) in ctx.bodies.iter().enumerate() {
            let Some((near, far)) = ray_sphere_intersect(ray, body.center, body.radius) else {
                continue;
            };
            let t = if near >= ctx.camera.near { near } else { far };
            if t < ctx.camera.near || t > ctx.camera.far {
                continue;
            }
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }
        best
    }

    fn shade_surface(
        ctx: &PassContext<'_>,
        target: &mut Framebuffer,
        i: usize,
        ray: &Ray,
        index: usize,
        t: f64,
    ) {
        let body = &ctx.bodies[index];
        let point = ray.at(t);
        let normal = (point - body.center).normalize_or_zero();
        let uv = sphere_uv(body.orientation.inverse() * normal);
        let albedo = body.material.albedo(uv[0], uv[1]);

        let color = if body.star.is_some() {
            scale(albedo, ctx.light.intensity)
        } else {
            modulate(albedo, light_term(ctx, point, Some(normal)))
        };

        target.color[i] = [color[0], color[1], color[2], 1.0];
        target.depth[i] = t as f32;
        target.body[i] = index as u32;
        target.normal[i] = normal.as_vec3().to_array();
        target.uv[i] = uv;
    }

    fn blend_atmospheres(ctx: &PassContext<'_>, target: &mut Framebuffer, i: usize, ray: &Ray) {
        for body in &ctx.bodies {
            let Some(shell) = body.atmosphere else {
                continue;
            };
            let Some((near, far)) = ray_sphere_intersect(ray, body.center, shell.radius) else {
                continue;
            };
            if far <= 0.0 {
                continue;
            }
            let entry = near.max(0.0);
            if entry as f32 >= target.depth[i] {
                continue;
            }
            let point = ray.at(entry);
            let normal = (point - body.center).normalize_or_zero();
            let facing = normal.dot(-ray.direction).clamp(0.0, 1.0) as f32;
            let alpha = shell.opacity * (1.0 - facing).powi(2);
            if alpha <= 0.0 {
                continue;
            }
            let lit = modulate(shell.color, light_term(ctx, point, Some(normal)));
            let px = target.color[i];
            let blended = mix([px[0], px[1], px[2]], lit, alpha);
            target.color[i] = [blended[0], blended[1], blended[2], px[3]];
        }
    }

    fn splat_rings(ctx: &PassContext<'_>, target: &mut Framebuffer, body: &BodyView<'_>) {
        let Some(rings) = body.rings else {
            return;
        };
        let (width, height) = (target.width(), target.height());
        for particle in rings.field.particles() {
            let local = DVec3::from_array(particle.local_position(rings.drift));
            let world = body.center + rings.orientation * local;
            let Some(p) = ctx.camera.project(world, width, height) else {
                continue;
            };
            let radius_px = particle.size as f64 * p.pixels_per_unit;
            // Sub-pixel particles fade by their covered area.
            let coverage = (radius_px / 0.5).min(1.0).powi(2) as f32;
            let color = modulate(particle.color, light_term(ctx, world, None));
            splat(target, (p.x, p.y), radius_px, p.depth as f32, color, 0.9 * coverage);
        }
    }

    fn splat_tail(ctx: &PassContext<'_>, target: &mut Framebuffer, body: &BodyView<'_>) {
        let Some(tail) = body.tail else {
            return;
        };
        if tail.direction == DVec3::ZERO {
            return;
        }
        let (width, height) = (target.width(), target.height());
        for step in 0..TAIL_STEPS {
            let f = (step as f64 + 0.5) / TAIL_STEPS as f64;
            let world = body.center + tail.direction * (body.radius + tail.tail.length * f);
            let Some(p) = ctx.camera.project(world, width, height) else {
                continue;
            };
            let radius_px = tail.tail.width * (1.0 - f) * p.pixels_per_unit;
            let alpha = tail.tail.opacity * (1.0 - f as f32);
            splat(target, (p.x, p.y), radius_px, p.depth as f32, tail.tail.color, alpha);
        }
    }
}

impl RenderPass for GeometryPass {
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
        let (width, height) = (target.width(), target.height());
        for y in 0..height {
            for x in 0..width {
                let ray = ctx.camera.ray_for_pixel(x, y, width, height);
                let i = target.index(x, y);
                if let Some((index, t)) = Self::nearest_hit(ctx, &ray) {
                    Self::shade_surface(ctx, &mut target, i, &ray, index, t);
                }
                if self.atmospheres {
                    Self::blend_atmospheres(ctx, &mut target, i, &ray);
                }
            }
        }

        for body in &ctx.bodies {
            if self.rings {
                Self::splat_rings(ctx, &mut target, body);
            }
            if self.tails {
                Self::splat_tail(ctx, &mut target, body);
            }
        }
        target
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
