//! Ring particle generation.
//!
//! Each division receives `floor(particle_count * density)` particles with
//! uniformly distributed angle, radius and vertical offset. The random source
//! is injected so callers choose between a seeded generator (tests, replays)
//! and an entropy-seeded one.

use std::f64::consts::TAU;

use orrery_catalog::{RingDescriptor, RingDivision};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::field::{RingField, RingParticle};

/// Builds [`RingField`]s from ring descriptors.
#[derive(Clone, Debug)]
pub struct RingFieldGenerator {
    quality: f64,
}

impl Default for RingFieldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RingFieldGenerator {
    /// Generator that honours the descriptor's particle budget exactly.
    pub fn new() -> Self {
        Self { quality: 1.0 }
    }

    /// Scale every ring's particle budget by `quality`, clamped to `[0, 1]`.
    pub fn with_quality(quality: f64) -> Self {
        Self {
            quality: if quality.is_finite() {
                quality.clamp(0.0, 1.0)
            } else {
                1.0
            },
        }
    }

    /// Particle budget after applying the quality factor.
    pub fn effective_budget(&self, ring: &RingDescriptor) -> usize {
        (ring.particle_count as f64 * self.quality).floor() as usize
    }

    /// Number of particles a division receives from a given budget.
    fn division_count(budget: usize, division: &RingDivision) -> usize {
        // Nudge before flooring so densities like 0.7f32 (0.6999999...) do
        // not lose a particle to representation error.
        ((budget as f64 * division.density as f64) + 1e-6).floor() as usize
    }

    /// Generate the particle field. Per-division counts never exceed the
    /// remaining budget, so the total never exceeds the configured count.
    pub fn generate<R: Rng + ?Sized>(&self, ring: &RingDescriptor, rng: &mut R) -> RingField {
        let budget = self.effective_budget(ring);
        let mut remaining = budget;
        let mut particles = Vec::with_capacity(budget);
        let mut division_counts = Vec::with_capacity(ring.divisions.len());
        let half_thickness = ring.randomness / 2.0;

        for (index, division) in ring.divisions.iter().enumerate() {
            let count = Self::division_count(budget, division).min(remaining);
            remaining -= count;

            let color = [
                division.color[0] * division.density,
                division.color[1] * division.density,
                division.color[2] * division.density,
            ];

            for _ in 0..count {
                let angle_offset = rng.random_range(0.0..TAU);
                let radius = rng.random_range(division.inner_radius..division.outer_radius);
                let vertical_offset = if half_thickness > 0.0 {
                    rng.random_range(-half_thickness..half_thickness)
                } else {
                    0.0
                };
                particles.push(RingParticle {
                    angle_offset,
                    radius,
                    vertical_offset,
                    color,
                    size: division.particle_size,
                    division: index,
                });
            }
            division_counts.push(count);
        }

        log::debug!(
            "Generated ring field: {} particles across {} divisions (budget {})",
            particles.len(),
            division_counts.len(),
            budget
        );

        RingField::new(
            particles,
            division_counts,
            ring.inner_radius,
            ring.outer_radius,
        )
    }

    /// Generate with a deterministic ChaCha stream derived from `seed`.
    pub fn generate_seeded(&self, ring: &RingDescriptor, seed: u64) -> RingField {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(ring, &mut rng)
    }
}
