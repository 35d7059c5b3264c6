//! Render pass abstraction and the per-frame context every pass reads.

use std::any::Any;

use glam::{DQuat, DVec3};
use orrery_catalog::{StarProperties, TailDescriptor};
use orrery_rings::RingField;
use orrery_scene::{AtmosphereShell, Material, SceneNode, SceneRoot};

use crate::camera::Camera;
use crate::color::blackbody_to_rgb;
use crate::framebuffer::Framebuffer;

/// Per-pass strength multipliers.
#[derive(Clone, Debug, PartialEq)]
pub struct PassIntensities {
    /// Unlit fraction of surface albedo.
    pub ambient: f32,
    /// Point light strength at the star.
    pub light: f32,
    /// Procedural star surface brightness.
    pub star_surface: f32,
    /// Corona glow strength.
    pub corona: f32,
    /// Background starfield brightness.
    pub background: f32,
}

impl Default for PassIntensities {
    fn default() -> Self {
        Self {
            ambient: 0.08,
            light: 1.0,
            star_surface: 1.0,
            corona: 1.0,
            background: 1.0,
        }
    }
}

/// Values shared by every pass, updated once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Simulation time in seconds.
    pub time: f32,
    /// Number of cel-shading bands.
    pub levels: u32,
    /// Per-pass strengths.
    pub intensities: PassIntensities,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            levels: 4,
            intensities: PassIntensities::default(),
        }
    }
}

/// Ring field placed in the world for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RingView<'a> {
    pub field: &'a RingField,
    /// Ring plane orientation (normal is the local +Y axis).
    pub orientation: DQuat,
    /// Drift rotation around the ring normal, radians.
    pub drift: f64,
}

/// Tail placed in the world for one frame.
#[derive(Clone, Copy, Debug)]
pub struct TailView<'a> {
    pub tail: &'a TailDescriptor,
    /// Unit vector from the star through the body.
    pub direction: DVec3,
}

/// One scene node flattened for rendering.
#[derive(Clone, Debug)]
pub struct BodyView<'a> {
    pub id: &'a str,
    pub center: DVec3,
    pub radius: f64,
    pub orientation: DQuat,
    pub material: &'a Material,
    pub star: Option<&'a StarProperties>,
    pub atmosphere: Option<&'a AtmosphereShell>,
    pub rings: Option<RingView<'a>>,
    pub tail: Option<TailView<'a>>,
}

impl<'a> BodyView<'a> {
    fn from_node(node: &'a SceneNode) -> Self {
        Self {
            id: node.id(),
            center: node.state.world_position,
            radius: node.radius(),
            orientation: node.orientation(),
            material: node.material(),
            star: node.star(),
            atmosphere: node.atmosphere(),
            rings: node.ring_field().map(|field| RingView {
                field,
                orientation: node.ring_orientation(),
                drift: node.state.ring_drift,
            }),
            tail: node.tail().map(|tail| TailView {
                tail,
                direction: node.state.tail_direction,
            }),
        }
    }
}

/// The point light sitting at the star.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLight {
    pub position: DVec3,
    /// Linear light color.
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance where the light reaches zero; `0` means unbounded.
    pub range: f64,
}

impl SceneLight {
    /// Light contribution factor at `distance`, windowed to zero at `range`.
    pub fn attenuation(&self, distance: f64) -> f32 {
        if self.range <= 0.0 {
            return 1.0;
        }
        if distance >= self.range {
            return 0.0;
        }
        let ratio = distance / self.range;
        let t = (1.0 - ratio * ratio).max(0.0);
        (t * t) as f32
    }
}

/// Read-only inputs of a frame.
pub struct PassContext<'a> {
    pub camera: &'a Camera,
    pub uniforms: &'a FrameUniforms,
    /// Every node, depth-first from the star. Framebuffer body slots index this.
    pub bodies: Vec<BodyView<'a>>,
    pub light: SceneLight,
}

impl<'a> PassContext<'a> {
    /// Flatten the scene for one frame.
    pub fn new(
        scene: &'a SceneRoot,
        camera: &'a Camera,
        uniforms: &'a FrameUniforms,
        light_range: f64,
    ) -> Self {
        let bodies: Vec<BodyView<'a>> = scene
            .nodes()
            .into_iter()
            .map(BodyView::from_node)
            .collect();

        let star = scene.star();
        let (color, luminosity) = star
            .star()
            .map_or(([1.0; 3], 1.0), |s| (blackbody_to_rgb(s.temperature), s.luminosity));
        let light = SceneLight {
            position: star.state.world_position,
            color,
            intensity: luminosity * uniforms.intensities.light,
            range: light_range,
        };

        Self {
            camera,
            uniforms,
            bodies,
            light,
        }
    }
}

/// One stage of the shading pipeline.
pub trait RenderPass {
    /// Stable name used to toggle the pass.
    fn name(&self) -> &'static str;

    /// Whether the pipeline runs this pass.
    fn enabled(&self) -> bool;

    /// Enable or disable the pass.
    fn set_enabled(&mut self, enabled: bool);

    /// Called when the output size changes.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Transform the framebuffer.
    fn execute(&mut self, ctx: &PassContext<'_>, target: Framebuffer) -> Framebuffer;

    /// Access to the concrete pass for reconfiguration.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_light_does_not_attenuate() {
        let light = SceneLight {
            position: DVec3::ZERO,
            color: [1.0; 3],
            intensity: 1.0,
            range: 0.0,
        };
        assert_eq!(light.attenuation(1.0e9), 1.0);
    }

    #[test]
    fn test_windowed_light_reaches_zero_at_range() {
        let light = SceneLight {
            position: DVec3::ZERO,
            color: [1.0; 3],
            intensity: 1.0,
            range: 2000.0,
        };
        assert_eq!(light.attenuation(0.0), 1.0);
        assert!(light.attenuation(1000.0) > light.attenuation(1500.0));
        assert_eq!(light.attenuation(2000.0), 0.0);
        assert_eq!(light.attenuation(5000.0), 0.0);
    }
}
