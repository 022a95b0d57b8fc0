pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Clock, NVec3, Particle, System};
pub use simulation::params::Parameters;
pub use simulation::forces::{AccelSet, Acceleration, LinearDrag, UniformGravity};
pub use simulation::integrator::euler_step;
pub use simulation::grid::UniformGrid;
pub use simulation::collisions::{resolve_collisions, resolve_collisions_direct, resolve_pair};
pub use simulation::scenario::Scenario;

pub use configuration::config::{BroadPhaseConfig, EngineConfig, ParametersConfig, ScenarioConfig};

pub use visualization::vis3d::run_3d;

pub use benchmark::benchmark::{bench_broadphase, bench_step_curve};
