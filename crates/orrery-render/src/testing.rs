//! Hand-built frame contexts for pass tests.

use glam::{DQuat, DVec3};
use orrery_scene::Material;

use crate::camera::Camera;
use crate::pass::{BodyView, FrameUniforms, PassContext, SceneLight};

static UNIFORMS: FrameUniforms = FrameUniforms {
    time: 0.0,
    levels: 4,
    intensities: crate::pass::PassIntensities {
        ambient: 0.08,
        light: 1.0,
        star_surface: 1.0,
        corona: 1.0,
        background: 1.0,
    },
};

pub(crate) fn body<'a>(
    id: &'a str,
    center: DVec3,
    radius: f64,
    material: &'a Material,
) -> BodyView<'a> {
    BodyView {
        id,
        center,
        radius,
        orientation: DQuat::IDENTITY,
        material,
        star: None,
        atmosphere: None,
        rings: None,
        tail: None,
    }
}

/// White unbounded light at the origin.
pub(crate) fn context<'a>(camera: &'a Camera, bodies: Vec<BodyView<'a>>) -> PassContext<'a> {
    context_with(camera, &UNIFORMS, bodies)
}

pub(crate) fn context_with<'a>(
    camera: &'a Camera,
    uniforms: &'a FrameUniforms,
    bodies: Vec<BodyView<'a>>,
) -> PassContext<'a> {
    PassContext {
        camera,
        uniforms,
        bodies,
        light: SceneLight {
            position: DVec3::ZERO,
            color: [1.0; 3],
            intensity: uniforms.intensities.light,
            range: 0.0,
        },
    }
}
