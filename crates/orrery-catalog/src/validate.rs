//! Descriptor validation.
//!
//! Checks one body in isolation. Moons are validated separately by the
//! composer so that a malformed moon only drops itself.

use crate::descriptor::{
    AtmosphereDescriptor, BodyKind, CelestialBodyDescriptor, OrbitDescriptor, RingDescriptor,
    StarProperties,
};
use crate::error::DescriptorError;

/// Slack allowed when summing ring densities.
const DENSITY_EPSILON: f32 = 1e-4;

impl CelestialBodyDescriptor {
    /// Validate this body's own fields. Moons are not descended into, but
    /// the `has_moon` flag must agree with the moon list.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let id = self.id.as_str();
        if id.is_empty() {
            return Err(DescriptorError::invalid("<unnamed>", "empty id"));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(DescriptorError::invalid(
                id,
                format!("size must be positive, got {}", self.size),
            ));
        }
        if !self.rotation_period.is_finite() || self.rotation_period == 0.0 {
            return Err(DescriptorError::invalid(
                id,
                format!(
                    "rotation period must be finite and nonzero, got {}",
                    self.rotation_period
                ),
            ));
        }
        if !(0.0..180.0).contains(&self.axial_tilt) {
            return Err(DescriptorError::invalid(
                id,
                format!("axial tilt {} outside [0, 180)", self.axial_tilt),
            ));
        }

        self.validate_capability_flags()?;

        match self.kind {
            BodyKind::Star => self.validate_star()?,
            BodyKind::Planet | BodyKind::Moon => self.validate_orbiting()?,
        }

        if let Some(ring) = &self.ring {
            validate_ring(id, ring, self.size)?;
        }
        if let Some(atmosphere) = &self.atmosphere {
            validate_atmosphere(id, atmosphere)?;
        }
        if let Some(tail) = &self.tail
            && !(tail.length > 0.0 && tail.width > 0.0)
        {
            return Err(DescriptorError::invalid(
                id,
                "tail length and width must be positive",
            ));
        }
        Ok(())
    }

    /// Validate a body that sits in a planet's moon list: a reduced node
    /// with a circular orbit and no rings, atmosphere, tail or children.
    pub fn validate_as_moon(&self) -> Result<(), DescriptorError> {
        self.validate()?;
        let id = self.id.as_str();
        if self.kind != BodyKind::Moon {
            return Err(DescriptorError::invalid(
                id,
                format!("moon list entry has kind {:?}", self.kind),
            ));
        }
        if self.has_rings || self.has_atmosphere || self.has_moon || self.tail.is_some() {
            return Err(DescriptorError::invalid(
                id,
                "moons cannot carry rings, atmospheres, tails or moons",
            ));
        }
        if !matches!(self.orbit, Some(OrbitDescriptor::Circular { .. })) {
            return Err(DescriptorError::invalid(id, "moons require a circular orbit"));
        }
        Ok(())
    }

    fn validate_capability_flags(&self) -> Result<(), DescriptorError> {
        let id = self.id.as_str();
        if self.has_rings != self.ring.is_some() {
            return Err(DescriptorError::invalid(
                id,
                "has_rings does not match the ring descriptor",
            ));
        }
        if self.has_atmosphere != self.atmosphere.is_some() {
            return Err(DescriptorError::invalid(
                id,
                "has_atmosphere does not match the atmosphere descriptor",
            ));
        }
        if self.has_moon != !self.moons.is_empty() {
            return Err(DescriptorError::invalid(
                id,
                "has_moon does not match the moon list",
            ));
        }
        Ok(())
    }

    fn validate_star(&self) -> Result<(), DescriptorError> {
        let id = self.id.as_str();
        let Some(star) = &self.star else {
            return Err(DescriptorError::invalid(id, "star without star properties"));
        };
        if self.orbit.is_some() {
            return Err(DescriptorError::invalid(id, "the star cannot orbit"));
        }
        if self.has_moon || self.tail.is_some() {
            return Err(DescriptorError::invalid(
                id,
                "the star cannot carry moons or a tail",
            ));
        }
        validate_star_properties(id, star)
    }

    fn validate_orbiting(&self) -> Result<(), DescriptorError> {
        let id = self.id.as_str();
        if self.star.is_some() {
            return Err(DescriptorError::invalid(
                id,
                format!("{:?} carries star properties", self.kind),
            ));
        }
        let Some(orbit) = &self.orbit else {
            return Err(DescriptorError::invalid(id, "orbiting body without orbit"));
        };
        validate_orbit(id, orbit)
    }
}

fn validate_orbit(id: &str, orbit: &OrbitDescriptor) -> Result<(), DescriptorError> {
    match orbit {
        OrbitDescriptor::Circular { radius } => {
            if !(radius.is_finite() && *radius > 0.0) {
                return Err(DescriptorError::degenerate(
                    id,
                    format!("circular radius {radius}"),
                ));
            }
        }
        OrbitDescriptor::Keplerian {
            semi_major_axis,
            eccentricity,
            inclination,
            period,
        } => {
            if !(semi_major_axis.is_finite() && *semi_major_axis > 0.0) {
                return Err(DescriptorError::degenerate(
                    id,
                    format!("semi-major axis {semi_major_axis}"),
                ));
            }
            if !(0.0..1.0).contains(eccentricity) {
                return Err(DescriptorError::invalid(
                    id,
                    format!("eccentricity {eccentricity} outside [0, 1)"),
                ));
            }
            if !(0.0..180.0).contains(inclination) || (inclination - 90.0).abs() < 1e-6 {
                return Err(DescriptorError::invalid(
                    id,
                    format!("inclination {inclination} outside [0, 180) or perpendicular"),
                ));
            }
            if let Some(p) = period
                && !(p.is_finite() && *p > 0.0)
            {
                return Err(DescriptorError::invalid(
                    id,
                    format!("orbital period {p} must be positive"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_ring(id: &str, ring: &RingDescriptor, body_size: f64) -> Result<(), DescriptorError> {
    if !(ring.inner_radius.is_finite() && ring.outer_radius.is_finite()) {
        return Err(DescriptorError::invalid(
            id,
            format!(
                "ring envelope [{}, {}) must be finite",
                ring.inner_radius, ring.outer_radius
            ),
        ));
    }
    if !(ring.inner_radius > 0.0 && ring.inner_radius < ring.outer_radius) {
        return Err(DescriptorError::invalid(
            id,
            format!(
                "ring envelope [{}, {}) is empty",
                ring.inner_radius, ring.outer_radius
            ),
        ));
    }
    if ring.outer_radius <= body_size {
        return Err(DescriptorError::invalid(
            id,
            "ring envelope lies inside the body",
        ));
    }
    if !(ring.randomness.is_finite() && ring.randomness >= 0.0) {
        return Err(DescriptorError::invalid(
            id,
            format!("ring randomness {} must be >= 0", ring.randomness),
        ));
    }
    if !ring.drift_speed.is_finite() {
        return Err(DescriptorError::invalid(
            id,
            format!("ring drift speed {} must be finite", ring.drift_speed),
        ));
    }
    for (index, division) in ring.divisions.iter().enumerate() {
        if !(division.inner_radius.is_finite() && division.outer_radius.is_finite()) {
            return Err(DescriptorError::invalid(
                id,
                format!("ring division {index} band must be finite"),
            ));
        }
        if !(division.inner_radius < division.outer_radius) {
            return Err(DescriptorError::invalid(
                id,
                format!("ring division {index} has an empty band"),
            ));
        }
        if division.inner_radius < ring.inner_radius || division.outer_radius > ring.outer_radius
        {
            return Err(DescriptorError::invalid(
                id,
                format!("ring division {index} leaves the ring envelope"),
            ));
        }
        if !(0.0..=1.0).contains(&division.density) {
            return Err(DescriptorError::invalid(
                id,
                format!("ring division {index} density {} outside [0, 1]", division.density),
            ));
        }
        if !(division.particle_size.is_finite() && division.particle_size > 0.0) {
            return Err(DescriptorError::invalid(
                id,
                format!("ring division {index} particle size must be positive"),
            ));
        }
    }
    if ring.total_density() > 1.0 + DENSITY_EPSILON {
        return Err(DescriptorError::invalid(
            id,
            format!(
                "ring division densities sum to {} (> 1)",
                ring.total_density()
            ),
        ));
    }
    Ok(())
}

fn validate_atmosphere(id: &str, atmosphere: &AtmosphereDescriptor) -> Result<(), DescriptorError> {
    if !(atmosphere.relative_size > 1.0) {
        return Err(DescriptorError::invalid(
            id,
            format!(
                "atmosphere relative size {} must exceed 1",
                atmosphere.relative_size
            ),
        ));
    }
    if !(0.0..=1.0).contains(&atmosphere.opacity) {
        return Err(DescriptorError::invalid(
            id,
            format!("atmosphere opacity {} outside [0, 1]", atmosphere.opacity),
        ));
    }
    Ok(())
}

fn validate_star_properties(id: &str, star: &StarProperties) -> Result<(), DescriptorError> {
    if !(star.temperature > 0.0) {
        return Err(DescriptorError::invalid(
            id,
            format!("star temperature {} must be positive", star.temperature),
        ));
    }
    if star.luminosity < 0.0 || star.corona.intensity < 0.0 {
        return Err(DescriptorError::invalid(
            id,
            "star luminosity and corona intensity must be non-negative",
        ));
    }
    if !(star.corona.size > 0.0) {
        return Err(DescriptorError::invalid(id, "corona size must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CoronaDescriptor, RingDivision};

    fn sun() -> CelestialBodyDescriptor {
        CelestialBodyDescriptor::star(
            "sun",
            50.0,
            StarProperties {
                temperature: 5778.0,
                luminosity: 1.0,
                corona: CoronaDescriptor {
                    intensity: 1.0,
                    pulse_speed: 1.0,
                    flare_frequency: 8.0,
                    size: 1.5,
                },
            },
        )
    }

    fn ring() -> RingDescriptor {
        RingDescriptor {
            inner_radius: 60.0,
            outer_radius: 100.0,
            divisions: vec![RingDivision {
                inner_radius: 60.0,
                outer_radius: 80.0,
                density: 0.5,
                particle_size: 0.5,
                color: [0.8, 0.7, 0.6],
            }],
            particle_count: 1000,
            randomness: 1.0,
            drift_speed: 0.0,
        }
    }

    #[test]
    fn test_valid_star_and_planet() {
        assert!(sun().validate().is_ok());
        assert!(
            CelestialBodyDescriptor::planet("earth", 5.0, 1000.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_rings_flag_without_descriptor_is_invalid() {
        let mut planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0);
        planet.has_rings = true;
        let err = planet.validate().unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidDescriptor { .. }));
        assert_eq!(err.body_id(), "saturn");
    }

    #[test]
    fn test_atmosphere_and_moon_flags_checked() {
        let mut planet = CelestialBodyDescriptor::planet("earth", 5.0, 1000.0);
        planet.has_atmosphere = true;
        assert!(planet.validate().is_err());

        let mut planet = CelestialBodyDescriptor::planet("earth", 5.0, 1000.0);
        planet.has_moon = true;
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_non_positive_size_is_invalid() {
        let planet = CelestialBodyDescriptor::planet("dust", 0.0, 1000.0);
        assert!(matches!(
            planet.validate(),
            Err(DescriptorError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_zero_radius_is_degenerate() {
        let planet = CelestialBodyDescriptor::planet("lost", 1.0, 0.0);
        assert!(matches!(
            planet.validate(),
            Err(DescriptorError::DegenerateOrbit { .. })
        ));
    }

    #[test]
    fn test_eccentricity_out_of_range() {
        for e in [1.0, 1.5, -0.1] {
            let mut comet = CelestialBodyDescriptor::planet("comet", 0.5, 1.0);
            comet.orbit = Some(OrbitDescriptor::Keplerian {
                semi_major_axis: 3500.0,
                eccentricity: e,
                inclination: 0.0,
                period: None,
            });
            assert!(
                matches!(
                    comet.validate(),
                    Err(DescriptorError::InvalidDescriptor { .. })
                ),
                "eccentricity {e} accepted"
            );
        }
    }

    #[test]
    fn test_perpendicular_inclination_rejected() {
        let mut comet = CelestialBodyDescriptor::planet("comet", 0.5, 1.0);
        comet.orbit = Some(OrbitDescriptor::Keplerian {
            semi_major_axis: 3500.0,
            eccentricity: 0.5,
            inclination: 90.0,
            period: None,
        });
        assert!(comet.validate().is_err());
    }

    #[test]
    fn test_zero_rotation_period_rejected() {
        let planet = CelestialBodyDescriptor::planet("still", 1.0, 100.0).with_spin(0.0, 0.0);
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_retrograde_spin_accepted() {
        let venus = CelestialBodyDescriptor::planet("venus", 4.7, 700.0).with_spin(-243.0, 177.4);
        assert!(venus.validate().is_ok());
        assert!(venus.is_retrograde());
    }

    #[test]
    fn test_ring_division_outside_envelope() {
        let mut r = ring();
        r.divisions[0].outer_radius = 120.0;
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_non_finite_ring_radii_rejected() {
        let mut r = ring();
        r.outer_radius = f64::INFINITY;
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(matches!(
            planet.validate(),
            Err(DescriptorError::InvalidDescriptor { .. })
        ));

        let mut r = ring();
        r.divisions[0].inner_radius = f64::NAN;
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(planet.validate().is_err());

        let mut r = ring();
        r.divisions[0].particle_size = f32::INFINITY;
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(planet.validate().is_err());

        let mut r = ring();
        r.drift_speed = f64::NEG_INFINITY;
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_ring_density_sum_above_one_rejected() {
        let mut r = ring();
        let mut second = r.divisions[0].clone();
        second.density = 0.7;
        r.divisions.push(second);
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(r);
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_valid_ring_accepted() {
        let planet = CelestialBodyDescriptor::planet("saturn", 47.0, 9500.0).with_rings(ring());
        assert!(planet.validate().is_ok());
    }

    #[test]
    fn test_atmosphere_must_be_larger_than_body() {
        let planet = CelestialBodyDescriptor::planet("earth", 5.0, 1000.0).with_atmosphere(
            AtmosphereDescriptor {
                color: [0.4, 0.6, 1.0],
                relative_size: 0.9,
                opacity: 0.5,
            },
        );
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_star_cannot_orbit() {
        let mut star = sun();
        star.orbit = Some(OrbitDescriptor::Circular { radius: 10.0 });
        assert!(star.validate().is_err());
    }

    #[test]
    fn test_star_requires_properties() {
        let mut star = sun();
        star.star = None;
        assert!(star.validate().is_err());
    }

    #[test]
    fn test_moon_must_be_reduced() {
        let moon = CelestialBodyDescriptor::moon("luna", 1.3, 15.0);
        assert!(moon.validate_as_moon().is_ok());

        let ringed = CelestialBodyDescriptor::moon("luna", 1.3, 15.0).with_rings(ring());
        assert!(ringed.validate_as_moon().is_err());

        let planet_kind = CelestialBodyDescriptor::planet("luna", 1.3, 15.0);
        assert!(planet_kind.validate_as_moon().is_err());
    }
}
