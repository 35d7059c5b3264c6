//! Celestial catalog: declarative, immutable descriptors for every body in
//! the star system, their validation rules, and the built-in solar system
//! preset.

mod catalog;
mod descriptor;
mod error;
mod solar_system;
mod validate;

pub use catalog::CelestialCatalog;
pub use descriptor::{
    AtmosphereDescriptor, BodyKind, CelestialBodyDescriptor, CoronaDescriptor, OrbitDescriptor,
    RingDescriptor, RingDivision, StarProperties, TailDescriptor,
};
pub use error::{CatalogError, DescriptorError};
pub use solar_system::{HALLEY_ORBIT_TILT, ORBIT_DURATION, SOLAR_SYSTEM_SCALE, SUN_SIZE};
