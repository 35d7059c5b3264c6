//! Orbital kinematics: closed-form circular and Keplerian motion laws, the
//! integrated self-rotation, and the per-frame update of every scene node.

mod kinematics;
mod laws;
mod spin;

pub use kinematics::OrbitalKinematics;
pub use laws::{
    CircularLaw, circular_position, keplerian_angle, keplerian_position, keplerian_radius,
};
pub use spin::{advance_spin, spin_rate};
