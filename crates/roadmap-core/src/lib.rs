pub mod config;
pub mod edges;
pub mod error;
pub mod grid;
pub mod models;
pub mod planner;
pub mod prune;
pub mod raster;
pub mod roadmap;
pub mod search;
pub mod skeleton;
pub mod spatial;

pub use config::{PlannerConfig, DEFAULT_PRUNE_EPSILON};
pub use edges::{edge_is_open, find_open_edges, OpenEdge};
pub use error::PlanningError;
pub use grid::{
    create_grid, obstacle_centers, GridBuilder, GridOffset, ObstacleGridBuilder, OccupancyGrid,
};
pub use models::{GlobalPosition, LocalPosition, ObstacleRecord, Point2, Waypoint};
pub use planner::{
    calculate_waypoints, PlanResult, PlanningContext, RoadmapPlanner, RoadmapStats,
};
pub use prune::collinearity_prune;
pub use raster::{Bresenham, Rasterizer};
pub use roadmap::{NodeId, RoadmapGraph};
pub use search::{a_star, a_star_with, heuristic, SearchOutcome, SearchPath};
pub use skeleton::{voronoi_skeleton, CandidateEdge, DegenerateSkeleton, Skeleton, SkeletonOutcome};
pub use spatial::{FrameConverter, LocalTangentFrame};
