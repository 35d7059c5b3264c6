//! Closed-form motion laws. Positions are pure functions of the simulation
//! time; nothing here carries state.

use std::f64::consts::TAU;

use glam::DVec3;

/// Period law for circular orbits: `T(r) = T_ref * (r / r_ref)^1.5`, a
/// unit-free stand-in for Kepler's third law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularLaw {
    /// Orbit radius that completes one revolution in `reference_period`.
    pub reference_radius: f64,
    /// Period at the reference radius, in simulation seconds.
    pub reference_period: f64,
}

impl CircularLaw {
    /// Planets: one revolution per 80 s at 1000 units (1 AU on the preset scale).
    pub const PLANETARY: Self = Self {
        reference_radius: 1000.0,
        reference_period: 80.0,
    };

    /// Moons: one revolution per 6 s at 15 units from the parent.
    pub const LUNAR: Self = Self {
        reference_radius: 15.0,
        reference_period: 6.0,
    };

    /// Orbital period at `radius`.
    pub fn period(&self, radius: f64) -> f64 {
        self.reference_period * (radius / self.reference_radius).powf(1.5)
    }

    /// Angular speed in radians per second at `radius`.
    pub fn angular_speed(&self, radius: f64) -> f64 {
        TAU / self.period(radius)
    }
}

impl Default for CircularLaw {
    fn default() -> Self {
        Self::PLANETARY
    }
}

/// Position on a circular orbit in the parent's XZ plane.
pub fn circular_position(radius: f64, elapsed: f64, law: &CircularLaw) -> DVec3 {
    let angle = elapsed * law.angular_speed(radius);
    DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Orbit angle at `elapsed` for a period `period`, in `[0, 2π)`.
pub fn keplerian_angle(elapsed: f64, period: f64) -> f64 {
    TAU * elapsed.rem_euclid(period) / period
}

/// Distance from the focus at `angle`: `a(1 - e²) / (1 + e cos angle)`.
pub fn keplerian_radius(semi_major_axis: f64, eccentricity: f64, angle: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * angle.cos())
}

/// Position on an elliptical orbit with the parent at the focus. The
/// inclination (degrees) lifts the orbit out of the XZ plane.
pub fn keplerian_position(
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    period: f64,
    elapsed: f64,
) -> DVec3 {
    let angle = keplerian_angle(elapsed, period);
    let r = keplerian_radius(semi_major_axis, eccentricity, angle);
    let (sin, cos) = angle.sin_cos();
    DVec3::new(r * cos, r * sin * inclination.to_radians().tan(), r * sin)
}
