//! CLI configuration from environment.

use roadmap_core::PlannerConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub planner: PlannerConfig,
    pub colliders_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PlannerConfig::default();
        Self {
            planner: PlannerConfig {
                planning_altitude: env_f64("PLANNER_ALTITUDE").unwrap_or(defaults.planning_altitude),
                safety_margin: env_f64("PLANNER_SAFETY_MARGIN").unwrap_or(defaults.safety_margin),
                prune_epsilon: env_f64("PLANNER_PRUNE_EPSILON").unwrap_or(defaults.prune_epsilon),
            },
            colliders_path: env::var("PLANNER_COLLIDERS").ok(),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
