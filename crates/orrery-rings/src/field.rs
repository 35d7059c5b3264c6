//! The generated, immutable particle layout of one ring system.

/// A single ring particle in the planet's ring-plane frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RingParticle {
    /// Angle around the planet in radians, `[0, 2π)`.
    pub angle_offset: f64,
    /// Distance from the planet centre, inside the division's band.
    pub radius: f64,
    /// Offset perpendicular to the ring plane.
    pub vertical_offset: f64,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Rendered radius in scene units.
    pub size: f32,
    /// Index of the division this particle belongs to.
    pub division: usize,
}

impl RingParticle {
    /// Position in the ring-plane frame after rotating the whole field by
    /// `drift` radians. The ring plane is XZ, +Y is the ring normal.
    pub fn local_position(&self, drift: f64) -> [f64; 3] {
        let angle = self.angle_offset + drift;
        [
            self.radius * angle.cos(),
            self.vertical_offset,
            self.radius * angle.sin(),
        ]
    }
}

/// Particles of a ring system, stored contiguously and grouped by division.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RingField {
    particles: Vec<RingParticle>,
    division_counts: Vec<usize>,
    inner_radius: f64,
    outer_radius: f64,
}

impl RingField {
    pub(crate) fn new(
        particles: Vec<RingParticle>,
        division_counts: Vec<usize>,
        inner_radius: f64,
        outer_radius: f64,
    ) -> Self {
        Self {
            particles,
            division_counts,
            inner_radius,
            outer_radius,
        }
    }

    /// All particles, grouped by division in declaration order.
    pub fn particles(&self) -> &[RingParticle] {
        &self.particles
    }

    /// Particles belonging to one division.
    pub fn division(&self, index: usize) -> &[RingParticle] {
        let start: usize = self.division_counts[..index].iter().sum();
        &self.particles[start..start + self.division_counts[index]]
    }

    /// Particle count of every division.
    pub fn division_counts(&self) -> &[usize] {
        &self.division_counts
    }

    /// Total number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns true if the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Inner edge of the ring envelope.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Outer edge of the ring envelope.
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(division: usize) -> RingParticle {
        RingParticle {
            angle_offset: 0.0,
            radius: 10.0,
            vertical_offset: 0.5,
            color: [1.0; 3],
            size: 0.1,
            division,
        }
    }

    #[test]
    fn test_division_slices_follow_counts() {
        let field = RingField::new(
            vec![particle(0), particle(0), particle(1)],
            vec![2, 1],
            5.0,
            20.0,
        );
        assert_eq!(field.division(0).len(), 2);
        assert_eq!(field.division(1).len(), 1);
        assert_eq!(field.division(1)[0].division, 1);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_local_position_applies_drift() {
        let p = particle(0);
        let [x, y, z] = p.local_position(std::f64::consts::FRAC_PI_2);
        assert!(x.abs() < 1e-9);
        assert!((z - 10.0).abs() < 1e-9);
        assert_eq!(y, 0.5);
    }
}
