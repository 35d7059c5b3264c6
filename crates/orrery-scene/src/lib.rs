//! Scene graph for the star system: composition of body descriptors into an
//! owned node hierarchy (star → planets → moons), typed per-body
//! capabilities, material binding through an injected asset resolver, and
//! ray picking.

mod assets;
mod composer;
mod node;
mod pick;
mod root;

pub use assets::{
    AssetError, AssetResolver, AssetState, Image, ImageHandle, Material, MemoryAssetResolver,
};
pub use composer::{ComposeError, Composition, SceneComposer};
pub use node::{AtmosphereShell, Capability, KinematicState, SceneNode};
pub use pick::{Ray, ray_sphere_intersect};
pub use root::SceneRoot;
