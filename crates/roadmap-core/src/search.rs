//! Best-first (A*-style) search over the roadmap.
//!
//! A node's cost and predecessor are fixed the first time it is enqueued and
//! never relaxed afterwards. The stored cost of a child is
//! `parent_cost + edge_weight + heuristic(child, goal)`, so heuristic terms
//! accumulate along the path. Both behaviors change which path is returned
//! compared to textbook A* and must be kept.

use crate::models::Point2;
use crate::roadmap::{NodeId, RoadmapGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Euclidean distance heuristic.
pub fn heuristic(position: Point2, goal: Point2) -> f64 {
    position.distance(goal)
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: FloatOrd,
    position: Point2,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.position.total_cmp(&other.position))
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// How a node entered the visited set.
#[derive(Debug, Clone, Copy)]
enum Discovery {
    Start,
    Reached { cost: f64, predecessor: NodeId },
}

impl Discovery {
    fn cost(&self) -> f64 {
        match self {
            Discovery::Start => 0.0,
            Discovery::Reached { cost, .. } => *cost,
        }
    }
}

/// Path found by the search, from start to goal.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    pub nodes: Vec<NodeId>,
    /// Stored search cost of each node in `nodes`.
    pub costs: Vec<f64>,
    /// Stored search cost of the goal.
    pub cost: f64,
    pub nodes_expanded: usize,
}

impl SearchPath {
    pub fn points(&self, graph: &RoadmapGraph) -> Vec<Point2> {
        self.nodes.iter().map(|id| graph.node(*id)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(SearchPath),
    NotFound { nodes_expanded: usize },
}

impl SearchOutcome {
    pub fn nodes_expanded(&self) -> usize {
        match self {
            SearchOutcome::Found(path) => path.nodes_expanded,
            SearchOutcome::NotFound { nodes_expanded } => *nodes_expanded,
        }
    }

    /// Path points and goal cost; empty with zero cost when not found.
    pub fn into_points(self, graph: &RoadmapGraph) -> (Vec<Point2>, f64) {
        match self {
            SearchOutcome::Found(path) => (path.points(graph), path.cost),
            SearchOutcome::NotFound { .. } => (Vec::new(), 0.0),
        }
    }
}

/// Search from `start` to `goal` with the Euclidean heuristic.
pub fn a_star(graph: &RoadmapGraph, start: NodeId, goal: NodeId) -> SearchOutcome {
    a_star_with(graph, start, goal, heuristic)
}

/// Search from `start` to `goal` with a caller-supplied heuristic.
pub fn a_star_with<H>(graph: &RoadmapGraph, start: NodeId, goal: NodeId, heuristic: H) -> SearchOutcome
where
    H: Fn(Point2, Point2) -> f64,
{
    let goal_position = graph.node(goal);
    let mut discovered: Vec<Option<Discovery>> = vec![None; graph.node_count()];
    let mut frontier: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();

    discovered[start] = Some(Discovery::Start);
    frontier.push(Reverse(FrontierEntry {
        cost: FloatOrd(0.0),
        position: graph.node(start),
        node: start,
    }));

    let mut nodes_expanded = 0usize;
    let mut found = false;

    while let Some(Reverse(current)) = frontier.pop() {
        nodes_expanded += 1;
        if current.node == goal {
            found = true;
            break;
        }

        for &(next, weight) in graph.neighbors(current.node) {
            if discovered[next].is_some() {
                continue;
            }
            let next_position = graph.node(next);
            let new_cost = current.cost.0 + weight + heuristic(next_position, goal_position);
            discovered[next] = Some(Discovery::Reached {
                cost: new_cost,
                predecessor: current.node,
            });
            frontier.push(Reverse(FrontierEntry {
                cost: FloatOrd(new_cost),
                position: next_position,
                node: next,
            }));
        }
    }

    if !found {
        return SearchOutcome::NotFound { nodes_expanded };
    }

    let mut nodes = vec![goal];
    let mut costs = Vec::new();
    let mut current = goal;
    while let Some(discovery) = discovered[current] {
        costs.push(discovery.cost());
        match discovery {
            Discovery::Start => break,
            Discovery::Reached { predecessor, .. } => {
                nodes.push(predecessor);
                current = predecessor;
            }
        }
    }
    nodes.reverse();
    costs.reverse();

    SearchOutcome::Found(SearchPath {
        cost: costs.last().copied().unwrap_or(0.0),
        nodes,
        costs,
        nodes_expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(edges: &[((f64, f64), (f64, f64))]) -> RoadmapGraph {
        let mut graph = RoadmapGraph::new();
        for (a, b) in edges {
            graph.add_edge((*a).into(), (*b).into());
        }
        graph
    }

    fn id(graph: &RoadmapGraph, p: (f64, f64)) -> NodeId {
        graph.node_id(p.into()).unwrap()
    }

    fn path_points(outcome: &SearchOutcome, graph: &RoadmapGraph) -> Vec<(f64, f64)> {
        match outcome {
            SearchOutcome::Found(path) => path
                .points(graph)
                .into_iter()
                .map(|p| (p.north, p.east))
                .collect(),
            SearchOutcome::NotFound { .. } => panic!("expected a path"),
        }
    }

    #[test]
    fn chain_is_walked_in_order() {
        let graph = graph_from(&[
            ((0.0, 0.0), (3.0, 4.0)),
            ((3.0, 4.0), (6.0, 8.0)),
            ((6.0, 8.0), (9.0, 12.0)),
        ]);
        let outcome = a_star(&graph, id(&graph, (0.0, 0.0)), id(&graph, (9.0, 12.0)));
        assert_eq!(
            path_points(&outcome, &graph),
            vec![(0.0, 0.0), (3.0, 4.0), (6.0, 8.0), (9.0, 12.0)]
        );
    }

    #[test]
    fn stored_cost_accumulates_heuristic_terms() {
        let graph = graph_from(&[((0.0, 0.0), (3.0, 4.0)), ((3.0, 4.0), (6.0, 8.0))]);
        let SearchOutcome::Found(path) =
            a_star(&graph, id(&graph, (0.0, 0.0)), id(&graph, (6.0, 8.0)))
        else {
            panic!("expected a path");
        };
        // (3,4): 0 + 5 + 5, goal: 10 + 5 + 0.
        assert_eq!(path.costs, vec![0.0, 10.0, 15.0]);
        assert_eq!(path.cost, 15.0);
    }

    #[test]
    fn predecessor_is_fixed_at_first_discovery() {
        let start = (0.0, 0.0);
        let side = (3.0, -4.0);
        let straight = (5.0, 0.0);
        let junction = (10.0, 0.0);
        let goal = (10.0, -6.0);
        let graph = graph_from(&[
            (start, side),
            (start, straight),
            (side, junction),
            (straight, junction),
            (junction, goal),
        ]);
        let outcome = a_star(&graph, id(&graph, start), id(&graph, goal));
        // `side` is expanded first and claims `junction`; the shorter route
        // through `straight` is never substituted.
        assert_eq!(path_points(&outcome, &graph), vec![start, side, junction, goal]);
    }

    #[test]
    fn start_equal_to_goal_is_a_single_node_path() {
        let graph = graph_from(&[((0.0, 0.0), (1.0, 1.0))]);
        let node = id(&graph, (1.0, 1.0));
        let SearchOutcome::Found(path) = a_star(&graph, node, node) else {
            panic!("expected a path");
        };
        assert_eq!(path.nodes, vec![node]);
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.nodes_expanded, 1);
    }

    #[test]
    fn disconnected_goal_is_not_found() {
        let graph = graph_from(&[
            ((0.0, 0.0), (1.0, 0.0)),
            ((1.0, 0.0), (2.0, 0.0)),
            ((10.0, 10.0), (11.0, 10.0)),
        ]);
        let outcome = a_star(&graph, id(&graph, (0.0, 0.0)), id(&graph, (11.0, 10.0)));
        assert_eq!(outcome, SearchOutcome::NotFound { nodes_expanded: 3 });
        assert_eq!(outcome.into_points(&graph), (Vec::new(), 0.0));
    }

    #[test]
    fn equal_costs_break_ties_by_coordinates() {
        let graph = graph_from(&[
            ((0.0, 0.0), (0.0, 10.0)),
            ((0.0, 0.0), (10.0, 0.0)),
            ((0.0, 10.0), (10.0, 10.0)),
            ((10.0, 0.0), (10.0, 10.0)),
        ]);
        let outcome = a_star(&graph, id(&graph, (0.0, 0.0)), id(&graph, (10.0, 10.0)));
        assert_eq!(
            path_points(&outcome, &graph),
            vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]
        );
    }

    #[test]
    fn custom_heuristic_is_used() {
        let graph = graph_from(&[((0.0, 0.0), (3.0, 4.0))]);
        let SearchOutcome::Found(path) = a_star_with(
            &graph,
            id(&graph, (0.0, 0.0)),
            id(&graph, (3.0, 4.0)),
            |_, _| 0.0,
        ) else {
            panic!("expected a path");
        };
        assert_eq!(path.cost, 5.0);
    }
}
