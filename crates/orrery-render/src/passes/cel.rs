//! Stylization: quantize lit body pixels into discrete brightness bands and
//! outline silhouettes where depth or body identity changes.

use std::any::Any;

use crate::color::{luminance, mix, scale};
use crate::framebuffer::{Framebuffer, NO_BODY};
use crate::pass::{PassContext, RenderPass};

/// Outline parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineConfig {
    /// Draw outlines at all.
    pub enabled: bool,
    /// Color on the near side of a silhouette.
    pub visible_color: [f32; 3],
    /// Color on the far side, where a body disappears behind another.
    pub hidden_color: [f32; 3],
    /// Blend weight of the outline, `[0, 1]`.
    pub strength: f32,
    /// Relative depth jump that counts as an edge.
    pub depth_threshold: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visible_color: [1.0, 1.0, 1.0],
            hidden_color: [0.098, 0.039, 0.020],
            strength: 0.85,
            depth_threshold: 0.05,
        }
    }
}

/// Quantize a luminance into `levels` bands: `floor(lum * levels) / levels`.
pub fn band(lum: f32, levels: u32) -> f32 {
    let levels = levels.max(1) as f32;
    (lum * levels).floor() / levels
}

/// Cel-shading pass.
pub struct CelPass {
    enabled: bool,
    /// Silhouette outline settings.
    pub outline: OutlineConfig,
}

impl Default for CelPass {
    fn default() -> Self {
        Self {
            enabled: true,
            outline: OutlineConfig::default(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Edge {
    None,
    Visible,
    Hidden,
}

impl CelPass {
    pub const NAME: &'static str = "cel";

    pub fn new(outline: OutlineConfig) -> Self {
        Self {
            enabled: true,
            outline,
        }
    }

    fn classify(&self, fb: &Framebuffer, x: u32, y: u32) -> Edge {
        let i = fb.index(x, y);
        let body = fb.body[i];
        let depth = fb.depth[i];
        let mut edge = Edge::None;

        let neighbours = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbours {
            if nx >= fb.width() || ny >= fb.height() {
                continue;
            }
            let j = fb.index(nx, ny);
            let other_body = fb.body[j];
            let other_depth = fb.depth[j];
            if body == NO_BODY && other_body == NO_BODY {
                continue;
            }
            let differs = if body != other_body {
                true
            } else {
                let nearest = depth.min(other_depth);
                (depth - other_depth).abs() > nearest * self.outline.depth_threshold
            };
            if !differs {
                continue;
            }
            if body == NO_BODY {
                // Sky side of a silhouette: nothing to outline.
                continue;
            }
            if depth <= other_depth {
                return Edge::Visible;
            }
            edge = Edge::Hidden;
        }
        edge
    }
}

impl RenderPass for CelPass {
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
        let levels = ctx.uniforms.levels;
        let (width, height) = (target.width(), target.height());

        let edges: Vec<Edge> = if self.outline.enabled {
            (0..height)
                .flat_map(|y| (0..width).map(move |x| (x, y)))
                .map(|(x, y)| self.classify(&target, x, y))
                .collect()
        } else {
            Vec::new()
        };

        for i in 0..target.len() {
            if target.body[i] == NO_BODY {
                continue;
            }
            let px = target.color[i];
            let rgb = [px[0], px[1], px[2]];
            let lum = luminance(rgb);
            let mut color = if lum > 0.0 {
                scale(rgb, band(lum, levels) / lum)
            } else {
                rgb
            };

            let outline = match edges.get(i).copied().unwrap_or(Edge::None) {
                Edge::Visible => Some(self.outline.visible_color),
                Edge::Hidden => Some(self.outline.hidden_color),
                Edge::None => None,
            };
            if let Some(edge_color) = outline {
                color = mix(color, edge_color, self.outline.strength);
            }
            target.color[i] = [color[0], color[1], color[2], px[3]];
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
    use crate::camera::Camera;
    use crate::pass::FrameUniforms;
    use crate::testing::context_with;

    fn assert_rgb(actual: [f32; 4], expected: [f32; 3]) {
        for c in 0..3 {
            assert!((actual[c] - expected[c]).abs() < 1e-5, "{actual:?} vs {expected:?}");
        }
    }

    fn frame(levels: u32) -> FrameUniforms {
        FrameUniforms {
            levels,
            ..FrameUniforms::default()
        }
    }

    #[test]
    fn test_band_formula() {
        assert_eq!(band(0.0, 4), 0.0);
        assert_eq!(band(0.3, 4), 0.25);
        assert_eq!(band(0.99, 4), 0.75);
        assert_eq!(band(1.0, 4), 1.0);
        assert_eq!(band(0.7, 0), 0.0);
    }

    #[test]
    fn test_body_pixels_take_few_distinct_values() {
        let camera = Camera::default();
        let uniforms = frame(3);
        let ctx = context_with(&camera, &uniforms, Vec::new());

        let mut fb = Framebuffer::new(16, 1);
        for x in 0..16 {
            let v = x as f32 / 16.0;
            fb.color[x as usize] = [v, v, v, 1.0];
            fb.body[x as usize] = 0;
            fb.depth[x as usize] = 10.0;
        }
        let mut pass = CelPass::default();
        pass.outline.enabled = false;
        let out = pass.execute(&ctx, fb);

        let mut distinct: Vec<f32> = out.color.iter().map(|c| c[0]).collect();
        distinct.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
        assert!(distinct.len() <= 3, "{distinct:?}");
    }

    #[test]
    fn test_sky_is_untouched() {
        let camera = Camera::default();
        let uniforms = frame(2);
        let ctx = context_with(&camera, &uniforms, Vec::new());
        let mut fb = Framebuffer::new(4, 4);
        fb.color[5] = [0.3, 0.2, 0.1, 1.0];
        let before = fb.clone();
        let out = CelPass::default().execute(&ctx, fb);
        assert_eq!(out, before);
    }

    #[test]
    fn test_silhouette_outlined_with_visible_color() {
        let camera = Camera::default();
        let uniforms = frame(4);
        let ctx = context_with(&camera, &uniforms, Vec::new());

        // A 3x3 body block in the middle of a 5x5 sky.
        let mut fb = Framebuffer::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                let i = fb.index(x, y);
                fb.body[i] = 0;
                fb.depth[i] = 10.0;
                fb.color[i] = [0.5, 0.5, 0.5, 1.0];
            }
        }
        let mut pass = CelPass::default();
        pass.outline.strength = 1.0;
        let out = pass.execute(&ctx, fb);

        assert_rgb(out.color[out.index(1, 1)], [1.0, 1.0, 1.0]);
        assert_rgb(out.color[out.index(2, 2)], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_far_side_of_overlap_gets_hidden_color() {
        let camera = Camera::default();
        let uniforms = frame(4);
        let ctx = context_with(&camera, &uniforms, Vec::new());

        let mut fb = Framebuffer::new(4, 1);
        for x in 0..4u32 {
            let i = x as usize;
            fb.body[i] = if x < 2 { 0 } else { 1 };
            fb.depth[i] = if x < 2 { 10.0 } else { 50.0 };
            fb.color[i] = [0.5, 0.5, 0.5, 1.0];
        }
        let mut pass = CelPass::default();
        pass.outline.strength = 1.0;
        let out = pass.execute(&ctx, fb);

        assert_rgb(out.color[1], pass.outline.visible_color);
        assert_rgb(out.color[2], pass.outline.hidden_color);
        assert_rgb(out.color[3], [0.5, 0.5, 0.5]);
    }
}
