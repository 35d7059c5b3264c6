//! Scene nodes: one per composed body, owning its children, its typed
//! capabilities and its live kinematic state.

use std::sync::Arc;

use glam::{DQuat, DVec3};
use orrery_catalog::{BodyKind, CelestialBodyDescriptor, StarProperties, TailDescriptor};
use orrery_rings::RingField;

use crate::assets::Material;

/// Translucent shell around a planet.
#[derive(Clone, Debug, PartialEq)]
pub struct AtmosphereShell {
    /// Absolute shell radius in scene units.
    pub radius: f64,
    /// Shell tint in linear RGB.
    pub color: [f32; 3],
    /// Peak opacity at the limb.
    pub opacity: f32,
}

/// Optional per-body feature, present only when the descriptor declares it.
#[derive(Clone, Debug)]
pub enum Capability {
    /// Procedurally generated ring particles.
    Rings(RingField),
    /// Atmosphere shell.
    Atmosphere(AtmosphereShell),
    /// Emissive star surface and corona.
    Star(StarProperties),
    /// Comet tail pointing away from the star.
    Tail(TailDescriptor),
}

/// Per-frame transform state. Everything except `rotation_angle` is
/// recomputed from the simulation time; the spin angle is integrated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KinematicState {
    /// Position relative to the parent's centre.
    pub position: DVec3,
    /// Position in the star's frame.
    pub world_position: DVec3,
    /// Accumulated spin angle in radians.
    pub rotation_angle: f64,
    /// Simulation time of the last update.
    pub last_elapsed: f64,
    /// Rotation of the ring field around the ring normal.
    pub ring_drift: f64,
    /// Unit vector from the star through the body.
    pub tail_direction: DVec3,
}

/// A composed body.
#[derive(Clone, Debug)]
pub struct SceneNode {
    descriptor: Arc<CelestialBodyDescriptor>,
    capabilities: Vec<Capability>,
    children: Vec<SceneNode>,
    material: Material,
    /// Live transform state, written by the kinematics each frame.
    pub state: KinematicState,
}

impl SceneNode {
    pub(crate) fn new(
        descriptor: Arc<CelestialBodyDescriptor>,
        capabilities: Vec<Capability>,
        material: Material,
    ) -> Self {
        Self {
            descriptor,
            capabilities,
            children: Vec::new(),
            material,
            state: KinematicState::default(),
        }
    }

    pub(crate) fn push_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// The descriptor this node was composed from.
    pub fn descriptor(&self) -> &CelestialBodyDescriptor {
        &self.descriptor
    }

    /// Body identifier.
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Body classification.
    pub fn kind(&self) -> BodyKind {
        self.descriptor.kind
    }

    /// Body radius.
    pub fn radius(&self) -> f64 {
        self.descriptor.size
    }

    /// Child nodes (planets of the star, moons of a planet).
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Mutable child nodes.
    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// All capabilities of this body.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Generated ring field, if the body has rings.
    pub fn ring_field(&self) -> Option<&RingField> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::Rings(field) => Some(field),
            _ => None,
        })
    }

    /// Atmosphere shell, if any.
    pub fn atmosphere(&self) -> Option<&AtmosphereShell> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::Atmosphere(shell) => Some(shell),
            _ => None,
        })
    }

    /// Star properties, if this node is the star.
    pub fn star(&self) -> Option<&StarProperties> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::Star(props) => Some(props),
            _ => None,
        })
    }

    /// Comet tail, if any.
    pub fn tail(&self) -> Option<&TailDescriptor> {
        self.capabilities.iter().find_map(|c| match c {
            Capability::Tail(tail) => Some(tail),
            _ => None,
        })
    }

    /// Bound surface material.
    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Body orientation: axial tilt about +Z applied after the spin about +Y.
    pub fn orientation(&self) -> DQuat {
        DQuat::from_rotation_z(self.descriptor.axial_tilt_radians())
            * DQuat::from_rotation_y(self.state.rotation_angle)
    }

    /// Orientation of the ring plane: tilted with the body, not spinning.
    pub fn ring_orientation(&self) -> DQuat {
        DQuat::from_rotation_z(self.descriptor.axial_tilt_radians())
    }

    /// Visit this node and its descendants depth-first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Visit this node and its descendants depth-first, mutably.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut SceneNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_catalog::{CoronaDescriptor, StarProperties};

    fn node(descriptor: CelestialBodyDescriptor, capabilities: Vec<Capability>) -> SceneNode {
        let color = descriptor.color;
        SceneNode::new(Arc::new(descriptor), capabilities, Material::Flat { color })
    }

    #[test]
    fn test_capability_accessors() {
        let star = node(
            CelestialBodyDescriptor::planet("sun", 10.0, 1.0),
            vec![Capability::Star(StarProperties {
                temperature: 5000.0,
                luminosity: 1.0,
                corona: CoronaDescriptor {
                    intensity: 1.0,
                    pulse_speed: 1.0,
                    flare_frequency: 4.0,
                    size: 1.5,
                },
            })],
        );
        assert!(star.star().is_some());
        assert!(star.ring_field().is_none());
        assert!(star.atmosphere().is_none());
        assert!(star.tail().is_none());
    }

    #[test]
    fn test_visit_is_depth_first() {
        let mut root = node(CelestialBodyDescriptor::planet("a", 1.0, 1.0), Vec::new());
        let mut b = node(CelestialBodyDescriptor::planet("b", 1.0, 1.0), Vec::new());
        b.push_child(node(CelestialBodyDescriptor::moon("c", 1.0, 1.0), Vec::new()));
        root.push_child(b);
        root.push_child(node(CelestialBodyDescriptor::planet("d", 1.0, 1.0), Vec::new()));

        let mut order = Vec::new();
        root.visit(&mut |n| order.push(n.id().to_string()));
        assert_eq!(order, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_orientation_applies_tilt() {
        let mut n = node(
            CelestialBodyDescriptor::planet("tilted", 1.0, 1.0).with_spin(1.0, 90.0),
            Vec::new(),
        );
        n.state.rotation_angle = 0.0;
        let axis = n.orientation() * DVec3::Y;
        assert!((axis - DVec3::NEG_X).length() < 1e-9, "axis {axis:?}");
    }
}
