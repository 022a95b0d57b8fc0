//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - population size and box extent,
//! - gravity vector and drag coefficient,
//! - wall and sphere restitution coefficients,
//! - automatic reset period and random seed

use super::states::NVec3;

/// Standard gravity along -z, used when the scenario does not override it.
pub const G_GRAVITY: [f64; 3] = [0.0, 0.0, -9.80665];

#[derive(Debug, Clone)]
pub struct Parameters {
    pub n_particle: u32, // population size
    pub box_size: f64, // cubic domain edge length
    pub gravity: NVec3, // gravitational acceleration
    pub c_air: f64, // drag coefficient (>= 0)
    pub e_wall: f64, // wall restitution in [0, 1]
    pub e_sphere: f64, // sphere-sphere restitution in [0, 1]
    pub reset_delay: f64, // seconds between automatic resets
    pub seed: u64, // deterministic seed to make runs reproducible
}

impl Parameters {
    /// Half extent of the box; positions live in `[-half, half]^3`.
    pub fn half_box(&self) -> f64 {
        0.5 * self.box_size
    }
}
