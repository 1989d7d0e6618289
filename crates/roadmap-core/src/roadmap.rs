//! Undirected weighted roadmap graph built from validated edges.

use crate::edges::OpenEdge;
use crate::error::PlanningError;
use crate::models::Point2;
use std::collections::HashMap;

pub type NodeId = usize;

/// Node identity is the exact coordinate value (with -0.0 folded into 0.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey(u64, u64);

impl NodeKey {
    fn of(point: Point2) -> Self {
        let canonical = |v: f64| if v == 0.0 { 0.0f64 } else { v };
        NodeKey(canonical(point.north).to_bits(), canonical(point.east).to_bits())
    }
}

/// Arena-style roadmap: nodes in insertion order, adjacency lists by node id.
#[derive(Debug, Clone, Default)]
pub struct RoadmapGraph {
    nodes: Vec<Point2>,
    index: HashMap<NodeKey, NodeId>,
    adjacency: Vec<Vec<(NodeId, f64)>>,
    edge_count: usize,
}

impl RoadmapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: &[OpenEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge.from, edge.to);
        }
        graph
    }

    fn intern(&mut self, point: Point2) -> NodeId {
        let key = NodeKey::of(point);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(point);
        self.adjacency.push(Vec::new());
        self.index.insert(key, id);
        id
    }

    /// Insert an undirected edge weighted by Euclidean length.
    ///
    /// Re-inserting an existing endpoint pair is a no-op. A zero-length edge
    /// materializes its node without adding a self-loop.
    pub fn add_edge(&mut self, p1: Point2, p2: Point2) {
        let a = self.intern(p1);
        let b = self.intern(p2);
        if a == b || self.adjacency[a].iter().any(|(n, _)| *n == b) {
            return;
        }
        let weight = p1.distance(p2);
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
        self.edge_count += 1;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Point2 {
        self.nodes[id]
    }

    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    pub fn node_id(&self, point: Point2) -> Option<NodeId> {
        self.index.get(&NodeKey::of(point)).copied()
    }

    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        &self.adjacency[id]
    }

    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency[a]
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, weight)| *weight)
    }

    /// Node closest to `point` by linear scan; ties go to the earliest inserted node.
    pub fn nearest_node(&self, point: Point2) -> Result<NodeId, PlanningError> {
        let mut best: Option<(NodeId, f64)> = None;
        for (id, node) in self.nodes.iter().enumerate() {
            let dist = node.distance(point);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id).ok_or(PlanningError::EmptyRoadmap)
    }
}
