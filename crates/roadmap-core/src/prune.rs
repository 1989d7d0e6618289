//! Collinearity pruning of planned paths.

use crate::models::Point2;

/// Determinant of the 3x3 matrix with rows `[p.north, p.east, 1]`.
///
/// Equals twice the signed area of the triangle `p1 p2 p3`.
pub fn collinearity_determinant(p1: Point2, p2: Point2, p3: Point2) -> f64 {
    (p2.north - p1.north) * (p3.east - p1.east) - (p2.east - p1.east) * (p3.north - p1.north)
}

pub fn is_collinear(p1: Point2, p2: Point2, p3: Point2, epsilon: f64) -> bool {
    collinearity_determinant(p1, p2, p3).abs() < epsilon
}

/// Drop every middle point of a collinear triple, re-testing from the same anchor.
pub fn collinearity_prune(path: &[Point2], epsilon: f64) -> Vec<Point2> {
    let mut pruned = path.to_vec();
    let mut i = 0;
    while i + 2 < pruned.len() {
        if is_collinear(pruned[i], pruned[i + 1], pruned[i + 2], epsilon) {
            pruned.remove(i + 1);
        } else {
            i += 1;
        }
    }
    pruned
}
