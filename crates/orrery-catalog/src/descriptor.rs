//! Body descriptors: the immutable, declarative description of every body in
//! the catalog. Descriptors carry no runtime state; the scene composer turns
//! them into live scene nodes.

use serde::{Deserialize, Serialize};

/// Broad classification of a celestial body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// The central star. A catalog contains exactly one.
    Star,
    /// A body orbiting the star (planets, dwarf planets, comets).
    Planet,
    /// A body orbiting a planet.
    Moon,
}

/// Orbit shape and size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrbitDescriptor {
    /// Circular orbit around the parent's centre. Angular speed follows an
    /// inverse 1.5-power law of the radius.
    Circular {
        /// Orbit radius in scene units.
        radius: f64,
    },
    /// Elliptical orbit with the parent at one focus.
    Keplerian {
        /// Semi-major axis in scene units.
        semi_major_axis: f64,
        /// Eccentricity in `[0, 1)`. 0 = circular orbit.
        eccentricity: f64,
        /// Out-of-plane tilt in degrees, `[0, 180)`, excluding 90.
        #[serde(default)]
        inclination: f64,
        /// Orbital period in simulation seconds. Derived from the
        /// semi-major axis when absent.
        #[serde(default)]
        period: Option<f64>,
    },
}

impl OrbitDescriptor {
    /// Characteristic orbit size: the radius or the semi-major axis.
    pub fn scale(&self) -> f64 {
        match self {
            OrbitDescriptor::Circular { radius } => *radius,
            OrbitDescriptor::Keplerian {
                semi_major_axis, ..
            } => *semi_major_axis,
        }
    }

    /// Farthest distance from the parent the body can reach.
    pub fn max_distance(&self) -> f64 {
        match self {
            OrbitDescriptor::Circular { radius } => *radius,
            OrbitDescriptor::Keplerian {
                semi_major_axis,
                eccentricity,
                ..
            } => semi_major_axis * (1.0 + eccentricity),
        }
    }
}

/// One concentric band of a ring system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingDivision {
    /// Inner edge of the band, measured from the planet centre.
    pub inner_radius: f64,
    /// Outer edge of the band.
    pub outer_radius: f64,
    /// Fraction of the ring's particle budget spent on this band, `[0, 1]`.
    pub density: f32,
    /// Rendered particle radius in scene units.
    pub particle_size: f32,
    /// Base particle color (linear RGB), darkened by density.
    #[serde(default = "default_ring_color")]
    pub color: [f32; 3],
}

fn default_ring_color() -> [f32; 3] {
    [0.85, 0.78, 0.62]
}

/// Ring system attached to a planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingDescriptor {
    /// Inner edge of the whole ring envelope.
    pub inner_radius: f64,
    /// Outer edge of the whole ring envelope.
    pub outer_radius: f64,
    /// Bands, each inside the envelope.
    pub divisions: Vec<RingDivision>,
    /// Total particle budget shared by all divisions.
    pub particle_count: u32,
    /// Thickness of the ring plane; vertical offsets span `±randomness/2`.
    pub randomness: f64,
    /// Slow rotation of the particle field in radians per second.
    #[serde(default)]
    pub drift_speed: f64,
}

impl RingDescriptor {
    /// Sum of all division densities.
    pub fn total_density(&self) -> f32 {
        self.divisions.iter().map(|d| d.density).sum()
    }
}

/// Thin translucent shell drawn around a planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereDescriptor {
    /// Shell tint in linear RGB.
    pub color: [f32; 3],
    /// Shell radius relative to the planet radius. Must exceed 1.
    pub relative_size: f64,
    /// Peak opacity at the limb.
    #[serde(default = "default_atmosphere_opacity")]
    pub opacity: f32,
}

fn default_atmosphere_opacity() -> f32 {
    0.6
}

/// Animated glow parameters around a star.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoronaDescriptor {
    /// Additive glow strength.
    pub intensity: f32,
    /// Pulse frequency in radians per second.
    pub pulse_speed: f32,
    /// Number of flare spikes around the disk.
    pub flare_frequency: f32,
    /// Glow extent relative to the star radius.
    pub size: f32,
}

/// Physical parameters of a star, used for procedural surface shading and
/// the scene light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarProperties {
    /// Effective temperature in Kelvin.
    pub temperature: f32,
    /// Luminosity multiplier (1.0 = Sol-like).
    pub luminosity: f32,
    /// Corona overlay parameters.
    pub corona: CoronaDescriptor,
}

/// Comet tail: a cone pointing away from the star.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TailDescriptor {
    /// Tail length in scene units.
    pub length: f64,
    /// Tail radius at the head.
    pub width: f64,
    /// Tail color in linear RGB.
    pub color: [f32; 3],
    /// Opacity at the head, fading to zero at the tip.
    pub opacity: f32,
}

/// Immutable description of one celestial body.
///
/// Capability flags (`has_rings`, `has_atmosphere`, `has_moon`) must agree
/// with the presence of the matching payload; see
/// [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialBodyDescriptor {
    /// Unique identifier.
    pub id: String,
    /// Body classification.
    pub kind: BodyKind,
    /// Body radius in scene units.
    pub size: f64,
    /// Spin period in simulation seconds. Negative = retrograde.
    pub rotation_period: f64,
    /// Axial tilt in degrees, `[0, 180)`.
    pub axial_tilt: f64,
    /// Orbit around the parent. Absent for the star.
    pub orbit: Option<OrbitDescriptor>,
    /// Declares a ring system.
    pub has_rings: bool,
    /// Declares an atmosphere shell.
    pub has_atmosphere: bool,
    /// Declares at least one moon.
    pub has_moon: bool,
    /// Ring payload, present iff `has_rings`.
    pub ring: Option<RingDescriptor>,
    /// Atmosphere payload, present iff `has_atmosphere`.
    pub atmosphere: Option<AtmosphereDescriptor>,
    /// Moons, non-empty iff `has_moon`.
    pub moons: Vec<CelestialBodyDescriptor>,
    /// Star payload, present iff `kind == Star`.
    pub star: Option<StarProperties>,
    /// Surface texture asset name.
    pub texture: Option<String>,
    /// Flat color used when no texture is bound.
    pub color: [f32; 3],
    /// Comet tail.
    pub tail: Option<TailDescriptor>,
}

impl Default for CelestialBodyDescriptor {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: BodyKind::Planet,
            size: 1.0,
            rotation_period: 1.0,
            axial_tilt: 0.0,
            orbit: None,
            has_rings: false,
            has_atmosphere: false,
            has_moon: false,
            ring: None,
            atmosphere: None,
            moons: Vec::new(),
            star: None,
            texture: None,
            color: [0.6, 0.6, 0.6],
            tail: None,
        }
    }
}

impl CelestialBodyDescriptor {
    /// A star at the origin.
    pub fn star(id: impl Into<String>, size: f64, properties: StarProperties) -> Self {
        Self {
            id: id.into(),
            kind: BodyKind::Star,
            size,
            rotation_period: 25.0,
            star: Some(properties),
            color: [1.0, 0.9, 0.5],
            ..Self::default()
        }
    }

    /// A planet on a circular orbit.
    pub fn planet(id: impl Into<String>, size: f64, orbit_radius: f64) -> Self {
        Self {
            id: id.into(),
            kind: BodyKind::Planet,
            size,
            orbit: Some(OrbitDescriptor::Circular {
                radius: orbit_radius,
            }),
            ..Self::default()
        }
    }

    /// A moon on a circular orbit around its parent.
    pub fn moon(id: impl Into<String>, size: f64, orbit_radius: f64) -> Self {
        Self {
            kind: BodyKind::Moon,
            ..Self::planet(id, size, orbit_radius)
        }
    }

    /// Attach a ring system and set the matching flag.
    pub fn with_rings(mut self, ring: RingDescriptor) -> Self {
        self.has_rings = true;
        self.ring = Some(ring);
        self
    }

    /// Attach an atmosphere shell and set the matching flag.
    pub fn with_atmosphere(mut self, atmosphere: AtmosphereDescriptor) -> Self {
        self.has_atmosphere = true;
        self.atmosphere = Some(atmosphere);
        self
    }

    /// Append a moon and set the matching flag.
    pub fn with_moon(mut self, moon: CelestialBodyDescriptor) -> Self {
        self.has_moon = true;
        self.moons.push(moon);
        self
    }

    /// Set the surface texture asset name.
    pub fn with_texture(mut self, name: impl Into<String>) -> Self {
        self.texture = Some(name.into());
        self
    }

    /// Set the flat surface color.
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set the spin period (negative for retrograde) and axial tilt.
    pub fn with_spin(mut self, rotation_period: f64, axial_tilt: f64) -> Self {
        self.rotation_period = rotation_period;
        self.axial_tilt = axial_tilt;
        self
    }

    /// Whether the body spins opposite to its orbital direction.
    pub fn is_retrograde(&self) -> bool {
        self.rotation_period < 0.0
    }

    /// Axial tilt in radians.
    pub fn axial_tilt_radians(&self) -> f64 {
        self.axial_tilt.to_radians()
    }
}
