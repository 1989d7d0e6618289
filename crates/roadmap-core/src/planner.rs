//! End-to-end planning: obstacles -> roadmap -> search -> pruned waypoints.

use crate::config::PlannerConfig;
use crate::edges::find_open_edges;
use crate::error::PlanningError;
use crate::grid::{obstacle_centers, validate_obstacles, GridBuilder, GridOffset, ObstacleGridBuilder, OccupancyGrid};
use crate::models::{GlobalPosition, LocalPosition, ObstacleRecord, Point2, Waypoint};
use crate::prune::collinearity_prune;
use crate::raster::{Bresenham, Rasterizer};
use crate::roadmap::RoadmapGraph;
use crate::search::{a_star, SearchOutcome};
use crate::skeleton::{voronoi_skeleton, SkeletonOutcome};
use crate::spatial::{FrameConverter, LocalTangentFrame};
use serde::{Deserialize, Serialize};

/// Counts gathered while building a roadmap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStats {
    pub obstacle_centers: usize,
    pub candidate_edges: usize,
    pub open_edges: usize,
    pub degenerate_skeleton: bool,
}

/// Outcome of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub success: bool,
    pub waypoints: Vec<Waypoint>,
    /// Points returned by the search, before the true goal is appended
    pub raw_path_points: usize,
    /// Points left after collinearity pruning
    pub pruned_path_points: usize,
    pub nodes_expanded: usize,
    pub search_cost: f64,
    pub roadmap_nodes: usize,
    pub roadmap_edges: usize,
}

/// Everything one planning run needs, built fresh per request.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    pub grid: OccupancyGrid,
    pub offset: GridOffset,
    pub graph: RoadmapGraph,
    pub config: PlannerConfig,
    pub stats: RoadmapStats,
}

impl PlanningContext {
    pub fn new(grid: OccupancyGrid, offset: GridOffset, graph: RoadmapGraph, config: PlannerConfig) -> Self {
        Self {
            grid,
            offset,
            graph,
            config,
            stats: RoadmapStats::default(),
        }
    }

    /// Plan between two positions in the local NED frame.
    ///
    /// Start and goal are snapped to their nearest roadmap nodes; the true
    /// goal is appended to the found path before pruning. When the true goal
    /// truncates to the same cell as its snapped node, the last two waypoints
    /// repeat that cell; they are kept as-is.
    pub fn plan_local(&self, start: LocalPosition, goal: LocalPosition) -> Result<PlanResult, PlanningError> {
        let start_point = self.offset.to_grid(start.horizontal());
        let goal_point = self.offset.to_grid(goal.horizontal());

        let graph_start = self.graph.nearest_node(start_point)?;
        let graph_goal = self.graph.nearest_node(goal_point)?;
        tracing::debug!(
            "Snapped start {:?} -> {:?}, goal {:?} -> {:?}",
            start_point,
            self.graph.node(graph_start),
            goal_point,
            self.graph.node(graph_goal)
        );

        let outcome = a_star(&self.graph, graph_start, graph_goal);
        let nodes_expanded = outcome.nodes_expanded();

        let SearchOutcome::Found(path) = outcome else {
            tracing::warn!(
                "No path between roadmap nodes after {} expansions",
                nodes_expanded
            );
            return Ok(PlanResult {
                success: false,
                waypoints: Vec::new(),
                raw_path_points: 0,
                pruned_path_points: 0,
                nodes_expanded,
                search_cost: 0.0,
                roadmap_nodes: self.graph.node_count(),
                roadmap_edges: self.graph.edge_count(),
            });
        };

        let mut points = path.points(&self.graph);
        let raw_path_points = points.len();
        points.push(goal_point);
        let pruned = collinearity_prune(&points, self.config.prune_epsilon);
        let waypoints = self.to_waypoints(&pruned);

        tracing::info!(
            "Found path: {} raw points, {} waypoints, cost {:.2}",
            raw_path_points,
            waypoints.len(),
            path.cost
        );

        Ok(PlanResult {
            success: true,
            waypoints,
            raw_path_points,
            pruned_path_points: pruned.len(),
            nodes_expanded,
            search_cost: path.cost,
            roadmap_nodes: self.graph.node_count(),
            roadmap_edges: self.graph.edge_count(),
        })
    }

    /// Convert grid-local points to waypoints at the planning altitude.
    pub fn to_waypoints(&self, points: &[Point2]) -> Vec<Waypoint> {
        points
            .iter()
            .map(|p| {
                let local = self.offset.to_local(*p);
                Waypoint {
                    north: local.north as i64,
                    east: local.east as i64,
                    altitude_m: self.config.planning_altitude,
                    heading: 0.0,
                }
            })
            .collect()
    }
}

/// Roadmap planner with pluggable grid construction, frame conversion and rasterization.
#[derive(Debug, Clone)]
pub struct RoadmapPlanner<G = ObstacleGridBuilder, F = LocalTangentFrame, R = Bresenham> {
    config: PlannerConfig,
    grid_builder: G,
    frame: F,
    rasterizer: R,
}

impl RoadmapPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            grid_builder: ObstacleGridBuilder,
            frame: LocalTangentFrame,
            rasterizer: Bresenham,
        }
    }
}

impl<G, F, R> RoadmapPlanner<G, F, R>
where
    G: GridBuilder,
    F: FrameConverter,
    R: Rasterizer,
{
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    pub fn with_grid_builder<G2: GridBuilder>(self, grid_builder: G2) -> RoadmapPlanner<G2, F, R> {
        RoadmapPlanner {
            config: self.config,
            grid_builder,
            frame: self.frame,
            rasterizer: self.rasterizer,
        }
    }

    pub fn with_frame<F2: FrameConverter>(self, frame: F2) -> RoadmapPlanner<G, F2, R> {
        RoadmapPlanner {
            config: self.config,
            grid_builder: self.grid_builder,
            frame,
            rasterizer: self.rasterizer,
        }
    }

    pub fn with_rasterizer<R2: Rasterizer>(self, rasterizer: R2) -> RoadmapPlanner<G, F, R2> {
        RoadmapPlanner {
            config: self.config,
            grid_builder: self.grid_builder,
            frame: self.frame,
            rasterizer,
        }
    }

    /// Build the grid, skeleton and validated roadmap for `obstacles`.
    pub fn build_context(&self, obstacles: &[ObstacleRecord]) -> Result<PlanningContext, PlanningError> {
        validate_obstacles(obstacles)?;
        let altitude = self.config.planning_altitude;
        let margin = self.config.safety_margin;

        let (grid, offset) = self.grid_builder.build(obstacles, altitude, margin);
        let centers = obstacle_centers(obstacles, offset, altitude, margin);

        let outcome = voronoi_skeleton(&centers);
        if let SkeletonOutcome::Degenerate(reason) = &outcome {
            tracing::warn!(
                "Skeleton construction degenerated ({:?}); continuing without candidate edges",
                reason
            );
        }
        let degenerate_skeleton = outcome.is_degenerate();
        let skeleton = outcome.into_skeleton();

        let open_edges = find_open_edges(&grid, &self.rasterizer, skeleton.edges());
        let graph = RoadmapGraph::from_edges(&open_edges);

        let stats = RoadmapStats {
            obstacle_centers: centers.len(),
            candidate_edges: skeleton.ridges.len(),
            open_edges: open_edges.len(),
            degenerate_skeleton,
        };
        tracing::debug!(
            "Roadmap built: {} centers, {} candidate edges, {} open edges, {} nodes",
            stats.obstacle_centers,
            stats.candidate_edges,
            stats.open_edges,
            graph.node_count()
        );

        Ok(PlanningContext {
            grid,
            offset,
            graph,
            config: self.config.clone(),
            stats,
        })
    }

    /// Plan from geodetic start to goal over `obstacles`, relative to `home`.
    pub fn plan(
        &self,
        global_start: GlobalPosition,
        global_goal: GlobalPosition,
        global_home: GlobalPosition,
        obstacles: &[ObstacleRecord],
    ) -> Result<PlanResult, PlanningError> {
        let context = self.build_context(obstacles)?;
        let start = self.frame.global_to_local(global_start, global_home);
        let goal = self.frame.global_to_local(global_goal, global_home);
        context.plan_local(start, goal)
    }
}

/// Waypoints from `global_start` to `global_goal` at `planning_altitude`.
///
/// Returns an empty list when the goal is unreachable on the roadmap and
/// [`PlanningError::EmptyRoadmap`] when no roadmap could be built.
pub fn calculate_waypoints(
    global_start: GlobalPosition,
    global_goal: GlobalPosition,
    global_home: GlobalPosition,
    obstacles: &[ObstacleRecord],
    planning_altitude: f64,
    safety_margin: f64,
) -> Result<Vec<Waypoint>, PlanningError> {
    let planner = RoadmapPlanner::new(PlannerConfig::new(planning_altitude, safety_margin));
    planner
        .plan(global_start, global_goal, global_home, obstacles)
        .map(|result| result.waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_edges(grid: OccupancyGrid, edges: &[((f64, f64), (f64, f64))]) -> PlanningContext {
        let mut graph = RoadmapGraph::new();
        for (a, b) in edges {
            graph.add_edge((*a).into(), (*b).into());
        }
        PlanningContext::new(grid, GridOffset::default(), graph, PlannerConfig::new(5.0, 0.0))
    }

    #[test]
    fn empty_obstacles_report_empty_roadmap() {
        let planner = RoadmapPlanner::new(PlannerConfig::default());
        let context = planner.build_context(&[]).unwrap();
        assert_eq!(context.stats.obstacle_centers, 0);
        assert_eq!(context.stats.candidate_edges, 0);
        assert!(context.stats.degenerate_skeleton);
        let start = LocalPosition::new(0.0, 0.0, 0.0);
        assert_eq!(
            context.plan_local(start, start),
            Err(PlanningError::EmptyRoadmap)
        );
    }

    #[test]
    fn waypoints_add_offset_and_truncate() {
        let mut context = context_with_edges(OccupancyGrid::new(1, 1), &[]);
        context.offset = GridOffset::new(-316.0, -445.0);
        let waypoints = context.to_waypoints(&[Point2::new(10.7, 20.2)]);
        assert_eq!(
            waypoints,
            vec![Waypoint {
                north: -305,
                east: -424,
                altitude_m: 5.0,
                heading: 0.0,
            }]
        );
    }

    #[test]
    fn identical_far_start_and_goal_snap_to_one_node() {
        let context = context_with_edges(
            OccupancyGrid::new(10, 10),
            &[((1.0, 1.0), (1.0, 8.0)), ((1.0, 8.0), (8.0, 8.0))],
        );
        let far = LocalPosition::new(-30.0, -40.0, 0.0);
        let result = context.plan_local(far, far).unwrap();
        assert!(result.success);
        assert_eq!(result.raw_path_points, 1);
        // Snapped node plus the true goal; nothing to prune.
        assert_eq!(result.pruned_path_points, 2);
        assert_eq!(result.waypoints[0].north, 1);
        assert_eq!(result.waypoints[0].east, 1);
        assert_eq!(result.waypoints[1].north, -30);
        assert_eq!(result.waypoints[1].east, -40);
    }

    #[test]
    fn goal_near_its_node_repeats_the_final_cell() {
        let context = context_with_edges(OccupancyGrid::new(20, 20), &[((0.0, 0.0), (0.0, 10.0))]);
        let result = context
            .plan_local(LocalPosition::new(0.0, 0.0, 0.0), LocalPosition::new(0.2, 10.3, 0.0))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.raw_path_points, 2);
        let cells: Vec<(i64, i64)> = result.waypoints.iter().map(|w| (w.north, w.east)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 10), (0, 10)]);
    }

    #[test]
    fn unreachable_goal_yields_no_waypoints() {
        let context = context_with_edges(
            OccupancyGrid::new(20, 20),
            &[((1.0, 1.0), (1.0, 5.0)), ((15.0, 15.0), (18.0, 15.0))],
        );
        let result = context
            .plan_local(LocalPosition::new(0.0, 0.0, 0.0), LocalPosition::new(19.0, 15.0, 0.0))
            .unwrap();
        assert!(!result.success);
        assert!(result.waypoints.is_empty());
        assert_eq!(result.search_cost, 0.0);
        assert_eq!(result.nodes_expanded, 2);
    }
}
