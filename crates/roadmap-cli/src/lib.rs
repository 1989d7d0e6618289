//! Roadmap CLI - command line tools for the roadmap planner.
//!
//! Binaries:
//! - plan_route: plan waypoints over a colliders map

pub mod colliders;
pub mod config;

pub use colliders::{load_colliders, parse_colliders, ColliderMap};
pub use config::Config;
