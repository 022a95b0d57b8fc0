//! Per-frame time integration for the sphere system
//!
//! Semi-implicit Euler driven by a variable frame `dt`: every position is
//! advanced (and clamped into the box) before any velocity is touched, so
//! the wall tests in the velocity pass see updated positions

use super::forces::AccelSet;
use super::params::Parameters;
use super::states::System;

/// Advance the system by one frame of length `dt` (seconds, >= 0; zero on
/// the first frame after a reset).
///
/// Pass 1 drifts positions with the pre-update velocities and clamps each
/// axis into `[-box/2, box/2]`. Pass 2 kicks velocities term by term
/// through `forces` (gravity first, then drag against the gravity-updated
/// velocity) and reflects velocity components at the walls scaled by
/// `e_wall`. Updates `sys.t` in-place.
pub fn euler_step(sys: &mut System, forces: &AccelSet, params: &Parameters, dt: f64) {
    if sys.particles.is_empty() { // no particles, return
        return;
    }

    let half = params.half_box();

    // Drift: x_n+1 = x_n + dt v_n, then clamp into the box. The clamp keeps
    // the containment invariant even when a fast particle outruns the wall
    // test below for a frame; the grid's index math relies on it.
    for p in sys.particles.iter_mut() {
        p.x += p.v * dt;
        for i in 0..3 {
            p.x[i] = p.x[i].clamp(-half, half);
        }
    }

    // Kick: each force term is applied in registration order, so drag is
    // evaluated against the velocity gravity has already updated
    let t = sys.t;
    forces.apply_kicks(t, sys, dt);

    // Reflect at the walls. A component is reflected only when the particle
    // is within `radius` of a face and still moving into it, so resting
    // contact is not re-kicked every frame.
    for p in sys.particles.iter_mut() {
        for i in 0..3 {
            if half - p.x[i] <= p.radius && p.v[i] > 0.0
                || p.x[i] + half <= p.radius && p.v[i] < 0.0
            {
                p.v[i] = -params.e_wall * p.v[i];
            }
        }
    }

    // Increment the system time by one full step
    sys.t += dt;
}
