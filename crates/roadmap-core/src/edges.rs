//! Collision validation of candidate skeleton edges against the grid.

use crate::grid::OccupancyGrid;
use crate::models::Point2;
use crate::raster::Rasterizer;

/// An edge that passed validation, with its original floating-point endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenEdge {
    pub from: Point2,
    pub to: Point2,
}

fn nearest_cell(point: Point2) -> (i64, i64) {
    (point.north.round() as i64, point.east.round() as i64)
}

/// True if the segment stays on the map and never crosses an occupied cell.
///
/// A segment that rasterizes to no cells at all is accepted.
pub fn edge_is_open<R: Rasterizer>(grid: &OccupancyGrid, rasterizer: &R, from: Point2, to: Point2) -> bool {
    rasterizer
        .cells(nearest_cell(from), nearest_cell(to))
        .into_iter()
        .all(|(north, east)| !grid.is_occupied(north, east))
}

/// Keep the candidate edges whose rasterized cells are all on-map and free.
pub fn find_open_edges<R, I>(grid: &OccupancyGrid, rasterizer: &R, candidates: I) -> Vec<OpenEdge>
where
    R: Rasterizer,
    I: IntoIterator<Item = (Point2, Point2)>,
{
    candidates
        .into_iter()
        .filter(|(from, to)| edge_is_open(grid, rasterizer, *from, *to))
        .map(|(from, to)| OpenEdge { from, to })
        .collect()
}
