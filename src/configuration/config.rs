//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – broad-phase strategy selection
//! - [`ParametersConfig`] – physical constants and population settings
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   broad_phase: "grid"     # or "direct"
//!
//! parameters:
//!   n_particle: 50          # population size
//!   box_size: 4.0           # cubic domain edge length
//!   gravity: [0.0, 0.0, -9.80665]   # optional, standard gravity if omitted
//!   c_air: 0.05             # drag coefficient
//!   e_wall: 0.6             # wall restitution
//!   e_sphere: 0.9           # sphere-sphere restitution
//!   reset_delay: 5.0        # seconds between automatic resets
//!   seed: 42                # optional, deterministic seed
//! ```
//!
//! The engine then maps this configuration into its internal runtime
//! representation. Physical plausibility (restitutions in [0,1], drag >= 0)
//! is the caller's responsibility and is not validated here.

use serde::Deserialize;

use crate::simulation::params::G_GRAVITY;
use crate::simulation::states::NVec3;

/// Which broad-phase candidate search the engine uses
/// `broad_phase: "grid"` or `broad_phase: "direct"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadPhaseConfig {
    #[serde(rename = "grid")] // Uniform grid, 3x3x3 neighborhood queries, O(n) expected
    Grid,

    #[serde(rename = "direct")] // All-pairs O(n^2) scan, exact reference path
    Direct,
}

/// High-level engine configuration
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub broad_phase: BroadPhaseConfig, // candidate search used by the collision resolver
}

/// Global physical parameters and population settings for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub n_particle: u32,          // population size
    pub box_size: f64,            // cubic domain edge length
    pub gravity: Option<Vec<f64>>, // gravitational acceleration, standard gravity if absent
    pub c_air: f64,               // drag coefficient
    pub e_wall: f64,              // wall restitution in [0, 1]
    pub e_sphere: f64,            // sphere-sphere restitution in [0, 1]
    pub reset_delay: f64,         // seconds between automatic population resets
    pub seed: Option<u64>,        // deterministic seed to make runs reproducible
}

impl ParametersConfig {
    /// Gravity vector, falling back to standard gravity along -z.
    pub fn gravity(&self) -> NVec3 {
        match &self.gravity {
            Some(g) => NVec3::new(g[0], g[1], g[2]),
            None => NVec3::new(G_GRAVITY[0], G_GRAVITY[1], G_GRAVITY[2]),
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // engine-level configuration (broad phase)
    pub parameters: ParametersConfig, // physical parameters and population settings
}
