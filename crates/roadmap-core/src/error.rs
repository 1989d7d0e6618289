//! Errors surfaced by the planning pipeline.

use thiserror::Error;

/// Fatal planning failures for a single request.
///
/// Skeleton degeneracy and an exhausted search are not errors; they are
/// reported through [`crate::skeleton::SkeletonOutcome`] and
/// [`crate::search::SearchOutcome`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("no roadmap available: the roadmap graph has no nodes")]
    EmptyRoadmap,

    #[error("obstacle record {index} is invalid: {reason}")]
    InvalidObstacleRecord { index: usize, reason: String },
}
