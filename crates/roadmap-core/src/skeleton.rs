//! Voronoi skeleton over obstacle centers.
//!
//! The diagram is built as the dual of a Bowyer-Watson Delaunay
//! triangulation: each Delaunay edge shared by two triangles yields a ridge
//! between their circumcenters. Ridges running off to infinity (hull edges)
//! are not emitted.

use crate::models::Point2;
use std::collections::{HashMap, HashSet};

/// Circumcenters closer than this are merged into one skeleton vertex.
const VERTEX_MERGE_RESOLUTION: f64 = 1e-6;
/// Relative tolerance for collinearity and degenerate triangles.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Unordered pair of skeleton vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateEdge {
    pub a: usize,
    pub b: usize,
}

impl CandidateEdge {
    fn new(a: usize, b: usize) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }
}

/// Skeleton vertices and the ridges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub vertices: Vec<Point2>,
    pub ridges: Vec<CandidateEdge>,
}

impl Skeleton {
    /// Ridges as coordinate pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.ridges
            .iter()
            .map(|ridge| (self.vertices[ridge.a], self.vertices[ridge.b]))
    }
}

/// Why a skeleton could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateSkeleton {
    TooFewCenters { distinct: usize },
    Collinear,
    Triangulation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkeletonOutcome {
    Built(Skeleton),
    Degenerate(DegenerateSkeleton),
}

impl SkeletonOutcome {
    /// The skeleton, or an empty one when construction degenerated.
    pub fn into_skeleton(self) -> Skeleton {
        match self {
            SkeletonOutcome::Built(skeleton) => skeleton,
            SkeletonOutcome::Degenerate(_) => Skeleton::default(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, SkeletonOutcome::Degenerate(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    center: Point2,
    radius_sq: f64,
}

impl Triangle {
    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

/// Vertex index standing for the single point at infinity.
const GHOST: usize = usize::MAX;

/// A face of the triangulation under construction.
///
/// Finite triangles are counter-clockwise. `Ghost { a, b }` is the face
/// `(a, b, infinity)` lying outside the hull edge `b -> a`; its
/// "circumcircle" is the open half-plane left of `a -> b`.
#[derive(Debug, Clone, Copy)]
enum Face {
    Finite(Triangle),
    Ghost { a: usize, b: usize },
}

impl Face {
    fn oriented_edges(&self) -> [(usize, usize); 3] {
        match *self {
            Face::Finite(triangle) => {
                let [a, b, c] = triangle.v;
                [(a, b), (b, c), (c, a)]
            }
            Face::Ghost { a, b } => [(a, b), (b, GHOST), (GHOST, a)],
        }
    }

    fn conflicts(&self, points: &[Point2], p: Point2) -> bool {
        match *self {
            Face::Finite(t) => {
                let dn = p.north - t.center.north;
                let de = p.east - t.center.east;
                dn * dn + de * de < t.radius_sq * (1.0 - DEGENERACY_TOLERANCE)
            }
            Face::Ghost { a, b } => {
                let (pa, pb) = (points[a], points[b]);
                let side = cross(pa, pb, p);
                let scale = pa.distance(pb).max(pa.distance(p));
                let tolerance = DEGENERACY_TOLERANCE * scale * scale;
                if side > tolerance {
                    true
                } else if side < -tolerance {
                    false
                } else {
                    // On the hull line: only the open segment belongs to the face.
                    dot(pa, pb, p) > 0.0 && dot(pb, pa, p) > 0.0
                }
            }
        }
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Compute the Voronoi skeleton of `centers`.
///
/// Duplicate centers are collapsed first. Fewer than three distinct centers,
/// all-collinear centers, or a numerically degenerate triangulation give
/// [`SkeletonOutcome::Degenerate`] instead of an error.
pub fn voronoi_skeleton(centers: &[Point2]) -> SkeletonOutcome {
    let mut seen = HashSet::new();
    let points: Vec<Point2> = centers
        .iter()
        .copied()
        .filter(|p| seen.insert((p.north.to_bits(), p.east.to_bits())))
        .collect();

    if points.len() < 3 {
        return SkeletonOutcome::Degenerate(DegenerateSkeleton::TooFewCenters {
            distinct: points.len(),
        });
    }
    if all_collinear(&points) {
        return SkeletonOutcome::Degenerate(DegenerateSkeleton::Collinear);
    }

    let Some(triangles) = delaunay(&points) else {
        return SkeletonOutcome::Degenerate(DegenerateSkeleton::Triangulation);
    };

    let mut vertices = Vec::new();
    let mut vertex_ids: HashMap<(i64, i64), usize> = HashMap::new();
    let triangle_vertex: Vec<usize> = triangles
        .iter()
        .map(|triangle| {
            let key = (
                (triangle.center.north / VERTEX_MERGE_RESOLUTION).round() as i64,
                (triangle.center.east / VERTEX_MERGE_RESOLUTION).round() as i64,
            );
            *vertex_ids.entry(key).or_insert_with(|| {
                vertices.push(triangle.center);
                vertices.len() - 1
            })
        })
        .collect();

    let mut first_owner: HashMap<(usize, usize), usize> = HashMap::new();
    let mut emitted = HashSet::new();
    let mut ridges = Vec::new();
    for (idx, triangle) in triangles.iter().enumerate() {
        for edge in triangle.edges() {
            match first_owner.get(&edge) {
                Some(&other) => {
                    let ridge = CandidateEdge::new(triangle_vertex[other], triangle_vertex[idx]);
                    if ridge.a != ridge.b && emitted.insert(ridge) {
                        ridges.push(ridge);
                    }
                }
                None => {
                    first_owner.insert(edge, idx);
                }
            }
        }
    }

    SkeletonOutcome::Built(Skeleton { vertices, ridges })
}

fn all_collinear(points: &[Point2]) -> bool {
    let origin = points[0];
    let scale = points
        .iter()
        .map(|p| origin.distance(*p))
        .fold(0.0, f64::max);
    let Some(anchor) = points.iter().find(|p| origin.distance(**p) > 0.0) else {
        return true;
    };
    let tolerance = DEGENERACY_TOLERANCE * scale * scale;
    points
        .iter()
        .all(|p| cross(origin, *anchor, *p).abs() <= tolerance)
}

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.north - o.north) * (b.east - o.east) - (a.east - o.east) * (b.north - o.north)
}

fn circumcircle(a: Point2, b: Point2, c: Point2) -> Option<(Point2, f64)> {
    let (bx, by) = (b.north - a.north, b.east - a.east);
    let (cx, cy) = (c.north - a.north, c.east - a.east);
    let d = 2.0 * (bx * cy - by * cx);
    let scale = (bx * bx + by * by).max(cx * cx + cy * cy);
    if d.abs() <= DEGENERACY_TOLERANCE * scale {
        return None;
    }
    let b_sq = bx * bx + by * by;
    let c_sq = cx * cx + cy * cy;
    let ux = (cy * b_sq - by * c_sq) / d;
    let uy = (bx * c_sq - cx * b_sq) / d;
    Some((a.offset(ux, uy), ux * ux + uy * uy))
}

fn dot(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.north - o.north) * (b.north - o.north) + (a.east - o.east) * (b.east - o.east)
}

fn make_triangle(points: &[Point2], v: [usize; 3]) -> Option<Triangle> {
    let (center, radius_sq) = circumcircle(points[v[0]], points[v[1]], points[v[2]])?;
    Some(Triangle {
        v,
        center,
        radius_sq,
    })
}

/// Face spanned by the oriented cavity edge `(u, v)` and the new site `p`.
fn make_face(points: &[Point2], u: usize, v: usize, p: usize) -> Option<Face> {
    match (u, v) {
        (GHOST, v) => Some(Face::Ghost { a: v, b: p }),
        (u, GHOST) => Some(Face::Ghost { a: p, b: u }),
        (u, v) => make_triangle(points, [u, v, p]).map(Face::Finite),
    }
}

/// Bowyer-Watson triangulation with ghost faces closing the hull, so hull
/// triangles are never lost. `None` if a degenerate triangle appears.
///
/// Expects at least three distinct, not all collinear, sites.
fn delaunay(sites: &[Point2]) -> Option<Vec<Triangle>> {
    let a = 0;
    let b = 1;
    let c = (2..sites.len()).max_by(|&i, &j| {
        cross(sites[a], sites[b], sites[i])
            .abs()
            .total_cmp(&cross(sites[a], sites[b], sites[j]).abs())
    })?;
    let (b, c) = if cross(sites[a], sites[b], sites[c]) > 0.0 {
        (b, c)
    } else {
        (c, b)
    };

    let mut faces = vec![
        Face::Finite(make_triangle(sites, [a, b, c])?),
        Face::Ghost { a: b, b: a },
        Face::Ghost { a: c, b },
        Face::Ghost { a, b: c },
    ];

    for (idx, p) in sites.iter().enumerate() {
        if idx == a || idx == b || idx == c {
            continue;
        }
        let (bad, good): (Vec<Face>, Vec<Face>) =
            faces.into_iter().partition(|face| face.conflicts(sites, *p));
        faces = good;
        if bad.is_empty() {
            return None;
        }

        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &bad {
            for (u, v) in face.oriented_edges() {
                *edge_count.entry(ordered(u, v)).or_insert(0) += 1;
            }
        }
        for face in &bad {
            for (u, v) in face.oriented_edges() {
                if edge_count[&ordered(u, v)] == 1 {
                    faces.push(make_face(sites, u, v, idx)?);
                }
            }
        }
    }

    Some(
        faces
            .into_iter()
            .filter_map(|face| match face {
                Face::Finite(triangle) => Some(triangle),
                Face::Ghost { .. } => None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Checks a triangulation covers the convex hull: every edge owned by a
    /// single triangle has no site strictly outside it, and the triangle
    /// count matches `2n - 2 - h` for `h` boundary vertices.
    fn assert_covers_hull(sites: &[Point2], triangles: &[Triangle]) {
        let mut owners: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
        for triangle in triangles {
            let [a, b, c] = triangle.v;
            assert!(cross(sites[a], sites[b], sites[c]) > 0.0);
            for (u, v) in [(a, b), (b, c), (c, a)] {
                owners.entry(ordered(u, v)).or_default().push((u, v));
            }
        }
        let boundary: Vec<(usize, usize)> = owners
            .values()
            .filter(|edges| edges.len() == 1)
            .map(|edges| edges[0])
            .collect();
        for &(u, v) in &boundary {
            let outside = sites
                .iter()
                .filter(|s| cross(sites[u], sites[v], **s) < -1e-9)
                .count();
            assert_eq!(outside, 0, "boundary edge {:?} is not a hull edge", (u, v));
        }
        assert_eq!(triangles.len(), 2 * sites.len() - 2 - boundary.len());
    }

    fn lattice(step: f64, count: usize) -> Vec<Point2> {
        let mut points = Vec::new();
        for i in 0..count {
            for j in 0..count {
                points.push(Point2::new(i as f64 * step, j as f64 * step));
            }
        }
        points
    }

    #[test]
    fn fewer_than_three_centers_is_degenerate() {
        assert_eq!(
            voronoi_skeleton(&[]),
            SkeletonOutcome::Degenerate(DegenerateSkeleton::TooFewCenters { distinct: 0 })
        );
        let duplicated = [Point2::new(1.0, 1.0), Point2::new(1.0, 1.0), Point2::new(4.0, 2.0)];
        assert_eq!(
            voronoi_skeleton(&duplicated),
            SkeletonOutcome::Degenerate(DegenerateSkeleton::TooFewCenters { distinct: 2 })
        );
    }

    #[test]
    fn collinear_centers_are_degenerate() {
        let line: Vec<Point2> = (0..5).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
        assert_eq!(
            voronoi_skeleton(&line),
            SkeletonOutcome::Degenerate(DegenerateSkeleton::Collinear)
        );
    }

    #[test]
    fn triangle_has_one_vertex_and_no_finite_ridges() {
        let outcome = voronoi_skeleton(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ]);
        let skeleton = outcome.into_skeleton();
        assert_eq!(skeleton.vertices.len(), 1);
        assert!((skeleton.vertices[0].north - 5.0).abs() < 1e-9);
        assert!((skeleton.vertices[0].east - 5.0).abs() < 1e-9);
        assert!(skeleton.ridges.is_empty());
    }

    #[test]
    fn three_by_three_lattice_yields_square_around_center() {
        let skeleton = voronoi_skeleton(&lattice(10.0, 3)).into_skeleton();
        assert_eq!(skeleton.vertices.len(), 4);
        assert_eq!(skeleton.ridges.len(), 4);
        for vertex in &skeleton.vertices {
            for coord in [vertex.north, vertex.east] {
                assert!((coord - 5.0).abs() < 1e-6 || (coord - 15.0).abs() < 1e-6);
            }
        }
        for (a, b) in skeleton.edges() {
            assert!((a.distance(b) - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn triangulation_keeps_hull_triangles() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in (10..=205).step_by(5) {
            let sites: Vec<Point2> = (0..n)
                .map(|_| Point2::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
                .collect();
            let triangles = delaunay(&sites).unwrap();
            assert_covers_hull(&sites, &triangles);
        }
    }

    #[test]
    fn lattice_triangulation_covers_collinear_hull() {
        let sites = lattice(10.0, 6);
        let triangles = delaunay(&sites).unwrap();
        assert_eq!(triangles.len(), 2 * 5 * 5);
        assert_covers_hull(&sites, &triangles);
    }

    #[test]
    fn hull_sites_contribute_voronoi_vertices() {
        // Square plus an inner point: four Delaunay triangles all touching the hull.
        let centers = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(4.0, 5.0),
        ];
        let skeleton = voronoi_skeleton(&centers).into_skeleton();
        assert_eq!(skeleton.vertices.len(), 4);
        assert_eq!(skeleton.ridges.len(), 4);
    }

    #[test]
    fn ridges_are_equidistant_from_nearest_centers() {
        let centers = vec![
            Point2::new(0.0, 0.0),
            Point2::new(12.0, 3.0),
            Point2::new(5.0, 17.0),
            Point2::new(-8.0, 9.0),
            Point2::new(20.0, 15.0),
            Point2::new(7.0, 6.5),
        ];
        let skeleton = voronoi_skeleton(&centers).into_skeleton();
        assert!(!skeleton.ridges.is_empty());
        for vertex in &skeleton.vertices {
            let mut distances: Vec<f64> = centers.iter().map(|c| c.distance(*vertex)).collect();
            distances.sort_by(f64::total_cmp);
            // A Voronoi vertex is equidistant from its three nearest sites.
            assert!((distances[0] - distances[2]).abs() < 1e-6);
        }
    }
}
