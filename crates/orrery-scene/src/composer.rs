//! Builds the scene hierarchy from a catalog.
//!
//! Composition is all-or-nothing only for the star. Every other body is
//! validated on its own; a rejected planet drops its subtree, a rejected moon
//! drops only itself, and the errors are returned alongside the scene.

use std::collections::HashSet;
use std::sync::Arc;

use orrery_catalog::{BodyKind, CelestialBodyDescriptor, CelestialCatalog, DescriptorError};
use orrery_rings::RingFieldGenerator;
use rand::Rng;

use crate::assets::{AssetResolver, AssetState, Material};
use crate::node::{AtmosphereShell, Capability, SceneNode};
use crate::root::SceneRoot;

/// Fatal composition failures. Anything else is collected per body.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The catalog has no star.
    #[error("catalog contains no star")]
    NoStar,

    /// The catalog has more than one star.
    #[error("catalog contains {} stars ({}); exactly one is required", ids.len(), ids.join(", "))]
    MultipleStars { ids: Vec<String> },

    /// The star itself failed validation.
    #[error("star rejected: {0}")]
    InvalidStar(#[source] DescriptorError),
}

/// Result of a successful composition.
#[derive(Debug)]
pub struct Composition {
    /// The composed scene.
    pub scene: SceneRoot,
    /// Bodies left out of the scene, in catalog order.
    pub rejected: Vec<DescriptorError>,
}

/// Turns catalog descriptors into an owned scene.
#[derive(Clone, Debug, Default)]
pub struct SceneComposer {
    rings: RingFieldGenerator,
}

impl SceneComposer {
    /// Composer with a full-quality ring generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer using the given ring generator.
    pub fn with_ring_generator(rings: RingFieldGenerator) -> Self {
        Self { rings }
    }

    /// Compose the catalog. Ring fields draw from `rng` in catalog order, so
    /// a seeded generator yields a reproducible scene.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        catalog: &CelestialCatalog,
        assets: &mut dyn AssetResolver,
        rng: &mut R,
    ) -> Result<Composition, ComposeError> {
        let stars: Vec<&CelestialBodyDescriptor> = catalog.stars().collect();
        let star = match stars.as_slice() {
            [] => return Err(ComposeError::NoStar),
            [star] => *star,
            many => {
                return Err(ComposeError::MultipleStars {
                    ids: many.iter().map(|s| s.id.clone()).collect(),
                });
            }
        };
        star.validate().map_err(ComposeError::InvalidStar)?;

        let mut seen = HashSet::new();
        seen.insert(star.id.clone());
        let mut rejected = Vec::new();
        let mut root = self.build_node(star, assets, rng);

        for body in &catalog.bodies {
            match body.kind {
                BodyKind::Star => continue,
                BodyKind::Moon => {
                    rejected.push(invalid(&body.id, "moon listed without a parent planet"));
                    continue;
                }
                BodyKind::Planet => {}
            }
            if let Err(e) = body.validate() {
                rejected.push(e);
                continue;
            }
            if !seen.insert(body.id.clone()) {
                rejected.push(invalid(&body.id, "duplicate id"));
                continue;
            }

            let mut planet = self.build_node(body, assets, rng);
            for moon in &body.moons {
                if let Err(e) = moon.validate_as_moon() {
                    rejected.push(e);
                    continue;
                }
                if !seen.insert(moon.id.clone()) {
                    rejected.push(invalid(&moon.id, "duplicate id"));
                    continue;
                }
                planet.push_child(self.build_node(moon, assets, rng));
            }
            root.push_child(planet);
        }

        for error in &rejected {
            log::warn!("Rejected body: {error}");
        }
        let scene = SceneRoot::new(root);
        log::info!(
            "Composed scene around `{}`: {} nodes, {} rejected",
            star.id,
            scene.len(),
            rejected.len()
        );

        Ok(Composition { scene, rejected })
    }

    fn build_node<R: Rng + ?Sized>(
        &self,
        descriptor: &CelestialBodyDescriptor,
        assets: &mut dyn AssetResolver,
        rng: &mut R,
    ) -> SceneNode {
        let mut capabilities = Vec::new();
        if let Some(star) = &descriptor.star {
            capabilities.push(Capability::Star(star.clone()));
        }
        if let Some(ring) = &descriptor.ring {
            capabilities.push(Capability::Rings(self.rings.generate(ring, rng)));
        }
        if let Some(atmosphere) = &descriptor.atmosphere {
            capabilities.push(Capability::Atmosphere(AtmosphereShell {
                radius: descriptor.size * atmosphere.relative_size,
                color: atmosphere.color,
                opacity: atmosphere.opacity,
            }));
        }
        if let Some(tail) = &descriptor.tail {
            capabilities.push(Capability::Tail(tail.clone()));
        }

        let material = bind_material(descriptor, assets);
        SceneNode::new(Arc::new(descriptor.clone()), capabilities, material)
    }
}

fn bind_material(descriptor: &CelestialBodyDescriptor, assets: &mut dyn AssetResolver) -> Material {
    let Some(name) = &descriptor.texture else {
        return Material::Flat {
            color: descriptor.color,
        };
    };
    match assets.resolve(name) {
        AssetState::Ready(image) => Material::Textured {
            asset: name.clone(),
            image,
        },
        AssetState::Pending => {
            log::info!(
                "Asset `{name}` not ready, using placeholder for `{}`",
                descriptor.id
            );
            Material::Placeholder {
                asset: name.clone(),
                color: descriptor.color,
            }
        }
    }
}

fn invalid(id: &str, reason: &str) -> DescriptorError {
    DescriptorError::InvalidDescriptor {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
