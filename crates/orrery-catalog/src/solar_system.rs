//! Built-in preset: the Sun, the eight planets, the Moon and Halley's comet,
//! laid out on a compressed scale where one astronomical unit is
//! [`SOLAR_SYSTEM_SCALE`] scene units.

use crate::catalog::CelestialCatalog;
use crate::descriptor::{
    AtmosphereDescriptor, CelestialBodyDescriptor, CoronaDescriptor, OrbitDescriptor,
    RingDescriptor, RingDivision, StarProperties, TailDescriptor,
};

/// Scene units per astronomical unit.
pub const SOLAR_SYSTEM_SCALE: f64 = 1000.0;

/// Radius of the Sun in scene units. Planet sizes are fractions of it.
pub const SUN_SIZE: f64 = 50.0;

/// Simulation seconds for one orbit at 1 AU, and for one comet orbit.
pub const ORBIT_DURATION: f64 = 80.0;

/// Inclination of Halley's orbit in degrees (retrograde).
pub const HALLEY_ORBIT_TILT: f64 = 162.3;

struct PlanetPreset {
    id: &'static str,
    size_fraction: f64,
    distance_au: f64,
    rotation_period: f64,
    axial_tilt: f64,
    color: [f32; 3],
}

const PLANETS: [PlanetPreset; 8] = [
    PlanetPreset {
        id: "mercury",
        size_fraction: 0.038,
        distance_au: 0.4,
        rotation_period: 58.6,
        axial_tilt: 0.03,
        color: [0.55, 0.53, 0.50],
    },
    PlanetPreset {
        id: "venus",
        size_fraction: 0.095,
        distance_au: 0.7,
        rotation_period: -243.0,
        axial_tilt: 2.6,
        color: [0.90, 0.78, 0.52],
    },
    PlanetPreset {
        id: "earth",
        size_fraction: 0.1,
        distance_au: 1.0,
        rotation_period: 10.0,
        axial_tilt: 23.4,
        color: [0.22, 0.42, 0.78],
    },
    PlanetPreset {
        id: "mars",
        size_fraction: 0.053,
        distance_au: 1.5,
        rotation_period: 10.3,
        axial_tilt: 25.2,
        color: [0.76, 0.36, 0.22],
    },
    PlanetPreset {
        id: "jupiter",
        size_fraction: 1.12,
        distance_au: 5.2,
        rotation_period: 4.1,
        axial_tilt: 3.1,
        color: [0.80, 0.66, 0.50],
    },
    PlanetPreset {
        id: "saturn",
        size_fraction: 0.945,
        distance_au: 9.5,
        rotation_period: 4.4,
        axial_tilt: 26.7,
        color: [0.86, 0.76, 0.55],
    },
    PlanetPreset {
        id: "uranus",
        size_fraction: 0.4,
        distance_au: 19.2,
        rotation_period: -7.2,
        axial_tilt: 97.8,
        color: [0.60, 0.82, 0.88],
    },
    PlanetPreset {
        id: "neptune",
        size_fraction: 0.388,
        distance_au: 30.1,
        rotation_period: 6.7,
        axial_tilt: 28.3,
        color: [0.28, 0.42, 0.86],
    },
];

impl CelestialCatalog {
    /// The reference star system.
    pub fn solar_system() -> Self {
        let mut bodies = Vec::with_capacity(PLANETS.len() + 2);
        bodies.push(sun());
        for preset in &PLANETS {
            let planet = CelestialBodyDescriptor::planet(
                preset.id,
                SUN_SIZE * preset.size_fraction,
                SOLAR_SYSTEM_SCALE * preset.distance_au,
            )
            .with_spin(preset.rotation_period, preset.axial_tilt)
            .with_color(preset.color)
            .with_texture(preset.id);

            let planet = match preset.id {
                "earth" => planet
                    .with_atmosphere(AtmosphereDescriptor {
                        color: [0.4, 0.6, 1.0],
                        relative_size: 1.08,
                        opacity: 0.6,
                    })
                    .with_moon(
                        CelestialBodyDescriptor::moon("moon", SUN_SIZE * 0.027, 15.0)
                            .with_spin(27.3, 6.7)
                            .with_color([0.7, 0.7, 0.68]),
                    ),
                "saturn" => planet.with_rings(saturn_rings(SUN_SIZE * preset.size_fraction)),
                "uranus" | "neptune" => planet.with_atmosphere(AtmosphereDescriptor {
                    color: [0.5, 0.8, 0.95],
                    relative_size: 1.05,
                    opacity: 0.35,
                }),
                _ => planet,
            };
            bodies.push(planet);
        }
        bodies.push(halley());
        Self::new(bodies)
    }
}

fn sun() -> CelestialBodyDescriptor {
    CelestialBodyDescriptor::star(
        "sun",
        SUN_SIZE,
        StarProperties {
            temperature: 5778.0,
            luminosity: 2.0,
            corona: CoronaDescriptor {
                intensity: 1.0,
                pulse_speed: 1.5,
                flare_frequency: 12.0,
                size: 1.6,
            },
        },
    )
    .with_texture("sun")
}

fn saturn_rings(planet_radius: f64) -> RingDescriptor {
    let band = |inner: f64, outer: f64, density: f32, color: [f32; 3]| RingDivision {
        inner_radius: planet_radius * inner,
        outer_radius: planet_radius * outer,
        density,
        particle_size: 0.35,
        color,
    };
    RingDescriptor {
        inner_radius: planet_radius * 1.24,
        outer_radius: planet_radius * 2.27,
        divisions: vec![
            band(1.24, 1.53, 0.15, [0.55, 0.50, 0.44]),
            band(1.53, 1.95, 0.50, [0.90, 0.82, 0.66]),
            band(2.03, 2.27, 0.30, [0.80, 0.74, 0.60]),
        ],
        particle_count: 20_000,
        randomness: 0.8,
        drift_speed: 0.02,
    }
}

fn halley() -> CelestialBodyDescriptor {
    CelestialBodyDescriptor {
        orbit: Some(OrbitDescriptor::Keplerian {
            semi_major_axis: 3500.0,
            eccentricity: 0.967,
            inclination: HALLEY_ORBIT_TILT,
            period: Some(ORBIT_DURATION),
        }),
        tail: Some(TailDescriptor {
            length: SUN_SIZE * 0.1,
            width: SUN_SIZE * 0.008,
            color: [0.53, 0.67, 1.0],
            opacity: 0.6,
        }),
        ..CelestialBodyDescriptor::planet("halley", SUN_SIZE * 0.01, 1.0)
            .with_spin(2.2, 0.0)
            .with_color([0.8, 0.8, 0.8])
    }
}
