//! Planner configuration.

use serde::{Deserialize, Serialize};

/// Default collinearity tolerance used when pruning paths.
pub const DEFAULT_PRUNE_EPSILON: f64 = 1e-3;

/// Parameters for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fixed flight altitude of the planning layer in meters
    pub planning_altitude: f64,
    /// Margin added around every obstacle in meters
    pub safety_margin: f64,
    /// Triangle area below which a middle path point is considered collinear
    #[serde(default = "default_prune_epsilon")]
    pub prune_epsilon: f64,
}

fn default_prune_epsilon() -> f64 {
    DEFAULT_PRUNE_EPSILON
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            planning_altitude: 5.0,
            safety_margin: 5.0,
            prune_epsilon: DEFAULT_PRUNE_EPSILON,
        }
    }
}

impl PlannerConfig {
    pub fn new(planning_altitude: f64, safety_margin: f64) -> Self {
        Self {
            planning_altitude,
            safety_margin,
            ..Self::default()
        }
    }

    pub fn with_prune_epsilon(mut self, epsilon: f64) -> Self {
        self.prune_epsilon = epsilon;
        self
    }
}
