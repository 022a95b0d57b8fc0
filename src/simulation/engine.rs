//! High-level runtime engine settings
//!
//! Selects the broad-phase strategy used when resolving collisions
//! for a running `Scenario`

use crate::configuration::config::BroadPhaseConfig;

#[derive(Debug, Clone)]
pub struct Engine {
    pub broad_phase: BroadPhaseConfig, // grid or direct n^2 candidate search
}
