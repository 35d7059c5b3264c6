//! Per-frame kinematic update of the scene.

use glam::DVec3;
use orrery_catalog::{BodyKind, CelestialBodyDescriptor, OrbitDescriptor};
use orrery_scene::{SceneNode, SceneRoot};

use crate::laws::{CircularLaw, circular_position, keplerian_position};
use crate::spin::{advance_spin, spin_rate};

/// Advances orbital position and spin of scene nodes.
#[derive(Clone, Debug)]
pub struct OrbitalKinematics {
    /// Law for planets and for Keplerian orbits without an explicit period.
    pub planets: CircularLaw,
    /// Law for moons, relative to their parent.
    pub moons: CircularLaw,
    /// Simulation seconds per unit of `rotation_period`.
    pub time_unit_scale: f64,
}

impl Default for OrbitalKinematics {
    fn default() -> Self {
        Self {
            planets: CircularLaw::PLANETARY,
            moons: CircularLaw::LUNAR,
            time_unit_scale: 1.0,
        }
    }
}

impl OrbitalKinematics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rotation period unit. Non-positive or non-finite values are ignored.
    pub fn with_time_unit_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.time_unit_scale = scale;
        } else {
            log::warn!("Ignoring invalid time unit scale {scale}");
        }
        self
    }

    /// Position of a body relative to its parent at `elapsed`.
    pub fn local_position(&self, descriptor: &CelestialBodyDescriptor, elapsed: f64) -> DVec3 {
        let law = match descriptor.kind {
            BodyKind::Moon => &self.moons,
            BodyKind::Star | BodyKind::Planet => &self.planets,
        };
        match &descriptor.orbit {
            None => DVec3::ZERO,
            Some(OrbitDescriptor::Circular { radius }) => circular_position(*radius, elapsed, law),
            Some(OrbitDescriptor::Keplerian {
                semi_major_axis,
                eccentricity,
                inclination,
                period,
            }) => {
                let period = period.unwrap_or_else(|| law.period(*semi_major_axis));
                keplerian_position(*semi_major_axis, *eccentricity, *inclination, period, elapsed)
            }
        }
    }

    /// Update one node's local state for the simulation time `elapsed`:
    /// orbital position relative to its parent, spin angle and ring drift.
    /// Calling twice with the same `elapsed` yields the same state.
    pub fn advance(&self, node: &mut SceneNode, elapsed: f64) {
        let descriptor = node.descriptor();
        let position = self.local_position(descriptor, elapsed);
        let rate = spin_rate(descriptor.rotation_period, self.time_unit_scale);
        let drift = descriptor
            .ring
            .as_ref()
            .map_or(0.0, |ring| elapsed * ring.drift_speed);

        let state = &mut node.state;
        state.position = position;
        state.ring_drift = drift;
        advance_spin(state, rate, elapsed);
    }

    /// Advance every node of the scene and compose world positions from the
    /// star outwards. Must run before the frame is rendered.
    pub fn advance_scene(&self, scene: &mut SceneRoot, elapsed: f64) {
        let star = scene.star_mut();
        self.advance(star, elapsed);
        star.state.world_position = star.state.position;
        star.state.tail_direction = DVec3::ZERO;

        let origin = star.state.world_position;
        for child in star.children_mut() {
            self.advance_subtree(child, origin, origin, elapsed);
        }
    }

    fn advance_subtree(
        &self,
        node: &mut SceneNode,
        parent_world: DVec3,
        star: DVec3,
        elapsed: f64,
    ) {
        self.advance(node, elapsed);
        let world = parent_world + node.state.position;
        node.state.world_position = world;
        node.state.tail_direction = (world - star).normalize_or_zero();

        for child in node.children_mut() {
            self.advance_subtree(child, world, star, elapsed);
        }
    }
}
