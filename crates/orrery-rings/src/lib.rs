//! Procedural ring systems: particle fields scattered across the concentric
//! bands of a ring descriptor. Generated once when a planet is composed.

mod field;
mod generator;

pub use field::{RingField, RingParticle};
pub use generator::RingFieldGenerator;
