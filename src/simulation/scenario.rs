//! Build and drive fully-initialized simulation scenarios
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! [`Scenario`] containing:
//! - engine settings (`Engine`)
//! - physical parameters (`Parameters`)
//! - system state (`System` with particles at t = 0)
//! - active acceleration set (`AccelSet`)
//! - the uniform grid, frame clock, and seeded RNG
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! per-frame step and visualization systems. All per-frame mutable state
//! lives here; there are no hidden globals.

use bevy::prelude::Resource;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::{BroadPhaseConfig, ScenarioConfig};
use crate::simulation::collisions::{resolve_collisions, resolve_collisions_direct};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, LinearDrag, UniformGravity};
use crate::simulation::grid::UniformGrid;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Clock, System};

/// Bevy resource representing a fully-initialized simulation scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// engine settings, parameters, the particle system, the active
/// acceleration terms, plus the broad-phase grid and the frame clock.
///
/// `generation` increments on every population reset so the renderer knows
/// when its per-particle entities went stale and must be respawned.
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
    pub grid: UniformGrid,
    pub clock: Clock,
    pub generation: u64,
    rng: StdRng,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            n_particle: p_cfg.n_particle,
            box_size: p_cfg.box_size,
            gravity: p_cfg.gravity(),
            c_air: p_cfg.c_air,
            e_wall: p_cfg.e_wall,
            e_sphere: p_cfg.e_sphere,
            reset_delay: p_cfg.reset_delay,
            seed: p_cfg.seed.unwrap_or(42),
        };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            broad_phase: cfg.engine.broad_phase,
        };

        // Forces: register gravity and drag
        let forces = AccelSet::new()
            .with(UniformGravity {
                g: parameters.gravity,
            })
            .with(LinearDrag {
                c_air: parameters.c_air,
            });

        let mut scenario = Self {
            system: System::empty(),
            grid: UniformGrid::new(parameters.box_size, 0.0),
            clock: Clock::new(),
            rng: StdRng::seed_from_u64(parameters.seed),
            generation: 0,
            engine,
            parameters,
            forces,
        };
        scenario.reset(scenario.parameters.n_particle);
        scenario
    }

    /// Replace the entire population with `n` fresh random particles and
    /// restart the clock. The grid is rebuilt around the new radius bounds.
    pub fn reset(&mut self, n: u32) {
        self.parameters.n_particle = n;
        self.system
            .populate(&mut self.rng, n, self.parameters.box_size);
        self.grid = UniformGrid::new(self.parameters.box_size, self.system.max_radius);
        self.clock.reset();
        self.generation += 1;
        info!(
            "reset: {} particles, radius in [{:.4}, {:.4}], grid {}^3 cells",
            n,
            self.system.min_radius,
            self.system.max_radius,
            self.grid.dim(),
        );
    }

    /// Re-seed the population at the current count (the periodic reset).
    pub fn repeat(&mut self) {
        self.reset(self.parameters.n_particle);
    }

    /// Advance one frame given the host's monotonic `timestamp` (seconds).
    ///
    /// Strict sequential pipeline: clock -> integrator -> grid rebuild ->
    /// collision resolution. The renderer reads positions afterwards.
    pub fn advance(&mut self, timestamp: f64) {
        let Scenario {
            system,
            forces,
            parameters,
            grid,
            clock,
            engine,
            ..
        } = self;

        let dt = clock.advance(timestamp);
        euler_step(system, forces, parameters, dt);

        match engine.broad_phase {
            BroadPhaseConfig::Grid => {
                grid.rebuild(&system.particles);
                resolve_collisions(system, grid, parameters.e_sphere);
            }
            BroadPhaseConfig::Direct => {
                resolve_collisions_direct(system, parameters.e_sphere);
            }
        }
    }

    /// Running frame rate, for display only.
    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }
}
