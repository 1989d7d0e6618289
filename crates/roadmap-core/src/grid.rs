//! Occupancy grid construction and obstacle center extraction.

use crate::error::PlanningError;
use crate::models::{ObstacleRecord, Point2};
use serde::{Deserialize, Serialize};

/// 2D binary occupancy grid indexed by (north, east) cell.
///
/// Any index outside `[0, rows) x [0, cols)` is reported as occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-free grid of `rows` north cells by `cols` east cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build from row-major rows; all rows must share the first row's length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut grid = Self::new(rows.len(), cols);
        for (north, row) in rows.iter().enumerate() {
            for (east, occupied) in row.iter().take(cols).enumerate() {
                grid.cells[north * cols + east] = *occupied;
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, north: i64, east: i64) -> bool {
        north >= 0 && east >= 0 && (north as u64) < self.rows as u64 && (east as u64) < self.cols as u64
    }

    /// Occupancy of a cell; off-map cells count as occupied.
    pub fn is_occupied(&self, north: i64, east: i64) -> bool {
        if !self.contains(north, east) {
            return true;
        }
        self.cells[north as usize * self.cols + east as usize]
    }

    /// Mark the inclusive rectangle `[n0, n1] x [e0, e1]` as occupied.
    fn fill(&mut self, n0: usize, n1: usize, e0: usize, e1: usize) {
        for north in n0..=n1.min(self.rows.saturating_sub(1)) {
            for east in e0..=e1.min(self.cols.saturating_sub(1)) {
                self.cells[north * self.cols + east] = true;
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

/// Translation from grid-local coordinates back to the local (north, east) frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridOffset {
    pub north: f64,
    pub east: f64,
}

impl GridOffset {
    pub const fn new(north: f64, east: f64) -> Self {
        Self { north, east }
    }

    /// Local frame point -> grid-local point.
    pub fn to_grid(&self, point: Point2) -> Point2 {
        point.offset(-self.north, -self.east)
    }

    /// Grid-local point -> local frame point.
    pub fn to_local(&self, point: Point2) -> Point2 {
        point.offset(self.north, self.east)
    }
}

/// Produces the occupancy grid and offsets for a set of obstacles.
pub trait GridBuilder {
    fn build(
        &self,
        obstacles: &[ObstacleRecord],
        planning_altitude: f64,
        safety_margin: f64,
    ) -> (OccupancyGrid, GridOffset);
}

/// Grid builder with 1 m cells over the obstacle bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObstacleGridBuilder;

impl GridBuilder for ObstacleGridBuilder {
    fn build(
        &self,
        obstacles: &[ObstacleRecord],
        planning_altitude: f64,
        safety_margin: f64,
    ) -> (OccupancyGrid, GridOffset) {
        create_grid(obstacles, planning_altitude, safety_margin)
    }
}

/// Rasterize obstacles that reach `planning_altitude` into a 1 m occupancy grid.
///
/// The grid spans the footprint bounding box of every record (not only the
/// tall ones). Footprints are inflated by `safety_margin` and clipped to the
/// grid. Empty input yields a 0x0 grid with zero offsets.
pub fn create_grid(
    obstacles: &[ObstacleRecord],
    planning_altitude: f64,
    safety_margin: f64,
) -> (OccupancyGrid, GridOffset) {
    if obstacles.is_empty() {
        return (OccupancyGrid::new(0, 0), GridOffset::default());
    }

    let north_min = obstacles
        .iter()
        .map(|o| o.north - o.half_size_north)
        .fold(f64::INFINITY, f64::min)
        .floor();
    let north_max = obstacles
        .iter()
        .map(|o| o.north + o.half_size_north)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil();
    let east_min = obstacles
        .iter()
        .map(|o| o.east - o.half_size_east)
        .fold(f64::INFINITY, f64::min)
        .floor();
    let east_max = obstacles
        .iter()
        .map(|o| o.east + o.half_size_east)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil();

    let rows = (north_max - north_min).ceil().max(0.0) as usize;
    let cols = (east_max - east_min).ceil().max(0.0) as usize;
    let mut grid = OccupancyGrid::new(rows, cols);

    if rows > 0 && cols > 0 {
        let clip = |value: f64, size: usize| value.clamp(0.0, (size - 1) as f64) as usize;
        for obstacle in obstacles {
            if !obstacle.reaches_altitude(planning_altitude, safety_margin) {
                continue;
            }
            let n0 = clip(obstacle.north - obstacle.half_size_north - safety_margin - north_min, rows);
            let n1 = clip(obstacle.north + obstacle.half_size_north + safety_margin - north_min, rows);
            let e0 = clip(obstacle.east - obstacle.half_size_east - safety_margin - east_min, cols);
            let e1 = clip(obstacle.east + obstacle.half_size_east + safety_margin - east_min, cols);
            grid.fill(n0, n1, e0, e1);
        }
    }

    (grid, GridOffset::new(north_min, east_min))
}

/// Grid-local centers of every obstacle that intrudes into the planning layer.
pub fn obstacle_centers(
    obstacles: &[ObstacleRecord],
    offset: GridOffset,
    planning_altitude: f64,
    safety_margin: f64,
) -> Vec<Point2> {
    obstacles
        .iter()
        .filter(|o| o.reaches_altitude(planning_altitude, safety_margin))
        .map(|o| offset.to_grid(Point2::new(o.north, o.east)))
        .collect()
}

/// Reject records with non-finite values or negative half sizes.
pub fn validate_obstacles(obstacles: &[ObstacleRecord]) -> Result<(), PlanningError> {
    for (index, obstacle) in obstacles.iter().enumerate() {
        if obstacle.values().iter().any(|value| !value.is_finite()) {
            return Err(PlanningError::InvalidObstacleRecord {
                index,
                reason: "contains a non-finite value".to_string(),
            });
        }
        if obstacle.half_size_north < 0.0
            || obstacle.half_size_east < 0.0
            || obstacle.half_size_alt < 0.0
        {
            return Err(PlanningError::InvalidObstacleRecord {
                index,
                reason: "half sizes must be non-negative".to_string(),
            });
        }
    }
    Ok(())
}
