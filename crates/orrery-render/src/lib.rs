//! CPU shading pipeline for the star system: camera, framebuffers, the
//! ordered render passes (background, geometry, star surface, corona, cel)
//! and presentation to a display target.

mod camera;
mod color;
mod framebuffer;
mod pass;
pub mod passes;
mod pipeline;
#[cfg(test)]
mod testing;

pub use camera::{Camera, Projected, Projection};
pub use color::{aces_tonemap, blackbody_to_rgb, linear_to_srgb, luminance};
pub use framebuffer::{Frame, Framebuffer, NO_BODY};
pub use pass::{
    BodyView, FrameUniforms, PassContext, PassIntensities, RenderPass, RingView, SceneLight,
    TailView,
};
pub use pipeline::{DisplayTarget, FrameCapture, OutputError, PipelineSettings, ShadingPipeline};
