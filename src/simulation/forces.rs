//! Acceleration contributors for the sphere simulation
//!
//! Defines the acceleration trait plus the two terms the integrator
//! applies every frame: uniform gravity and a linear-in-velocity drag

use crate::simulation::states::{NVec3, System};

/// Collection of acceleration terms (gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per particle
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all particles in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec3]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }

    /// Apply every term as its own velocity kick, in registration order.
    ///
    /// Each term's accelerations are evaluated against the current state and
    /// folded into the velocities before the next term runs, so a
    /// velocity-dependent term like drag acts on the gravity-updated
    /// velocity within the same step rather than on the pre-kick one.
    pub fn apply_kicks(&self, t: f64, sys: &mut System, dt: f64) {
        let mut accels = vec![NVec3::zeros(); sys.particles.len()];
        for term in &self.terms {
            for a in accels.iter_mut() {
                *a = NVec3::zeros();
            }
            term.acceleration(t, &*sys, &mut accels);
            for (p, a) in sys.particles.iter_mut().zip(accels.iter()) {
                p.v += *a * dt;
            }
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each particle
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec3]);
}

/// Constant gravitational acceleration, the same for every particle
/// regardless of mass
pub struct UniformGravity {
    pub g: NVec3,
}

impl Acceleration for UniformGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) {
        for a in out.iter_mut().take(sys.particles.len()) {
            *a += self.g;
        }
    }
}

/// Air drag proportional to cross-section and velocity:
///
///   a = -c_air * radius^2 / m * v
///
/// A linear-in-velocity approximation valid only at low speeds; kept as-is,
/// documented limitation rather than corrected
pub struct LinearDrag {
    pub c_air: f64,
}

impl Acceleration for LinearDrag {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) {
        for (p, a) in sys.particles.iter().zip(out.iter_mut()) {
            *a -= self.c_air * (p.radius * p.radius / p.m) * p.v;
        }
    }
}
