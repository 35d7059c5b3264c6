//! The owned scene: a single star node with planets (and their moons) as
//! descendants. Passed explicitly to the kinematics and the renderer.

use crate::assets::{AssetResolver, AssetState, ImageHandle, Material};
use crate::node::SceneNode;
use crate::pick::{Ray, ray_sphere_intersect};

/// Root of the composed star system.
#[derive(Clone, Debug)]
pub struct SceneRoot {
    star: SceneNode,
}

impl SceneRoot {
    pub(crate) fn new(star: SceneNode) -> Self {
        Self { star }
    }

    /// The star node.
    pub fn star(&self) -> &SceneNode {
        &self.star
    }

    /// The star node, mutably.
    pub fn star_mut(&mut self) -> &mut SceneNode {
        &mut self.star
    }

    /// Every node, depth-first starting at the star.
    pub fn nodes(&self) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        self.star.visit(&mut |node| out.push(node));
        out
    }

    /// Apply `f` to every node, depth-first.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut SceneNode)) {
        self.star.visit_mut(&mut f);
    }

    /// Look up a node by id.
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        let mut found = None;
        self.star.visit(&mut |node| {
            if found.is_none() && node.id() == id {
                found = Some(node);
            }
        });
        found
    }

    /// Total node count, star included.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.star.visit(&mut |_| count += 1);
        count
    }

    /// A scene always holds at least the star.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Names of all assets still bound as placeholders.
    pub fn pending_assets(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.star.visit(&mut |node| {
            if let Some(name) = node.material().pending_asset()
                && !names.iter().any(|n| n == name)
            {
                names.push(name.to_string());
            }
        });
        names
    }

    /// Replace every placeholder waiting on `name` with the loaded image.
    /// Returns the number of nodes re-bound.
    pub fn bind_asset(&mut self, name: &str, image: ImageHandle) -> usize {
        let mut bound = 0;
        self.star.visit_mut(&mut |node| {
            if node.material().pending_asset() == Some(name) {
                node.set_material(Material::Textured {
                    asset: name.to_string(),
                    image: image.clone(),
                });
                bound += 1;
            }
        });
        if bound > 0 {
            log::info!("Bound asset `{name}` to {bound} node(s)");
        }
        bound
    }

    /// Ask the resolver again for every pending asset and bind those that
    /// became ready. Returns the number of nodes re-bound.
    pub fn refresh_pending(&mut self, resolver: &mut dyn AssetResolver) -> usize {
        let mut bound = 0;
        for name in self.pending_assets() {
            if let AssetState::Ready(image) = resolver.resolve(&name) {
                bound += self.bind_asset(&name, image);
            }
        }
        bound
    }

    /// Nearest body whose sphere the ray hits, by world position. Atmosphere
    /// shells and rings are not pickable.
    pub fn pick_body(&self, ray: &Ray) -> Option<&str> {
        let mut best: Option<(f64, &str)> = None;
        self.star.visit(&mut |node| {
            let hit = ray_sphere_intersect(ray, node.state.world_position, node.radius());
            let Some((near, far)) = hit else {
                return;
            };
            let t = if near >= 0.0 { near } else { far };
            if t < 0.0 {
                return;
            }
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((t, node.id()));
            }
        });
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Image, MemoryAssetResolver};
    use crate::composer::SceneComposer;
    use glam::DVec3;
    use orrery_catalog::{
        CelestialBodyDescriptor, CelestialCatalog, CoronaDescriptor, StarProperties,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_system() -> CelestialCatalog {
        let star = CelestialBodyDescriptor::star(
            "sun",
            10.0,
            StarProperties {
                temperature: 5800.0,
                luminosity: 1.0,
                corona: CoronaDescriptor {
                    intensity: 1.0,
                    pulse_speed: 1.0,
                    flare_frequency: 6.0,
                    size: 1.5,
                },
            },
        );
        let earth = CelestialBodyDescriptor::planet("earth", 2.0, 100.0)
            .with_texture("earth")
            .with_moon(CelestialBodyDescriptor::moon("moon", 0.5, 5.0).with_texture("rock"));
        let mars = CelestialBodyDescriptor::planet("mars", 1.5, 150.0).with_texture("rock");
        CelestialCatalog::new(vec![star, earth, mars])
    }

    fn compose(resolver: &mut MemoryAssetResolver) -> SceneRoot {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        SceneComposer::new()
            .compose(&small_system(), resolver, &mut rng)
            .unwrap()
            .scene
    }

    #[test]
    fn test_find_and_len() {
        let scene = compose(&mut MemoryAssetResolver::new());
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.find("moon").unwrap().id(), "moon");
        assert!(scene.find("pluto").is_none());
    }

    #[test]
    fn test_bind_asset_replaces_every_matching_placeholder() {
        let mut scene = compose(&mut MemoryAssetResolver::new());
        assert_eq!(scene.pending_assets(), ["earth", "rock"]);

        let bound = scene.bind_asset("rock", std::sync::Arc::new(Image::solid([0.5; 3])));
        assert_eq!(bound, 2);
        assert!(scene.find("mars").unwrap().material().is_textured());
        assert!(scene.find("moon").unwrap().material().is_textured());
        assert_eq!(scene.pending_assets(), ["earth"]);
    }

    #[test]
    fn test_refresh_pending_uses_resolver() {
        let mut resolver = MemoryAssetResolver::new();
        let mut scene = compose(&mut resolver);
        assert_eq!(scene.refresh_pending(&mut resolver), 0);

        resolver.insert("earth", Image::solid([0.1, 0.3, 0.8]));
        assert_eq!(scene.refresh_pending(&mut resolver), 1);
        assert!(scene.find("earth").unwrap().material().is_textured());
    }

    #[test]
    fn test_pick_nearest_body() {
        let mut scene = compose(&mut MemoryAssetResolver::new());
        scene.for_each_mut(|node| {
            node.state.world_position = match node.id() {
                "earth" => DVec3::new(100.0, 0.0, 0.0),
                "moon" => DVec3::new(105.0, 0.0, 0.0),
                "mars" => DVec3::new(0.0, 0.0, 150.0),
                _ => DVec3::ZERO,
            };
        });

        let toward_earth = Ray::new(DVec3::new(200.0, 0.0, 0.0), DVec3::NEG_X);
        assert_eq!(scene.pick_body(&toward_earth), Some("moon"));

        let toward_mars = Ray::new(DVec3::new(0.0, 0.0, 300.0), DVec3::NEG_Z);
        assert_eq!(scene.pick_body(&toward_mars), Some("mars"));

        let empty = Ray::new(DVec3::new(0.0, 500.0, 0.0), DVec3::Y);
        assert_eq!(scene.pick_body(&empty), None);
    }
}
