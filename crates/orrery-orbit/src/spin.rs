//! Self-rotation: the one integrated quantity of a body.

use std::f64::consts::TAU;

use orrery_scene::KinematicState;

/// Signed spin rate in radians per second. Negative periods spin retrograde.
pub fn spin_rate(rotation_period: f64, time_unit_scale: f64) -> f64 {
    rotation_period.signum() * TAU / (rotation_period.abs() * time_unit_scale)
}

/// Integrate the rotation angle up to `elapsed`.
///
/// Only the time since the last update is integrated, so repeating the same
/// `elapsed` leaves the angle untouched and a paused clock (constant
/// `elapsed`) freezes the spin without a phase jump on resume. A clock that
/// moves backwards contributes nothing.
pub fn advance_spin(state: &mut KinematicState, rate: f64, elapsed: f64) {
    let delta = (elapsed - state.last_elapsed).max(0.0);
    state.rotation_angle += rate * delta;
    state.last_elapsed = elapsed;
}
