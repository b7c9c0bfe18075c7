use indexmap::IndexMap;
use rand::Rng;

use crate::codec::StateId;
use crate::error::GraphError;
use crate::explore::ExploreSink;
use crate::vector::Vec3;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: StateId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl GraphNode {
    pub fn new(id: StateId, position: Vec3) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    pub fn label(&self) -> String {
        format!("Node {}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: StateId,
    pub to: StateId,
}

/// Nodes in discovery order; edges may repeat.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    nodes: IndexMap<StateId, GraphNode>,
    edges: Vec<GraphEdge>,
    /// Node indices of each edge's endpoints, parallel to `edges`.
    ends: Vec<(usize, usize)>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: StateId, position: Vec3) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id.clone(), GraphNode::new(id, position));
        Ok(())
    }

    pub fn add_edge(&mut self, from: &StateId, to: &StateId) -> Result<(), GraphError> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        self.edges.push(GraphEdge {
            from: from.clone(),
            to: to.clone(),
        });
        self.ends.push((a, b));
        Ok(())
    }

    fn index_of(&self, id: &StateId) -> Result<usize, GraphError> {
        self.nodes
            .get_index_of(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))
    }

    pub fn node(&self, id: &StateId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// The first node added: the configuration exploration started from.
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first().map(|(_, node)| node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.values_mut()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub(crate) fn edge_ends(&self) -> &[(usize, usize)] {
        &self.ends
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Current endpoint positions of every edge, in edge order.
    pub fn edge_segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.ends.iter().map(|&(a, b)| (self.nodes[a].position, self.nodes[b].position))
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.nodes
            .values()
            .map(|node| 0.5 * node.velocity.length_squared())
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        self.nodes.values().all(|node| {
            node.position.is_finite() && node.velocity.is_finite() && node.acceleration.is_finite()
        })
    }
}

/// Collects exploration events into a [`LayoutGraph`], scattering each new
/// node uniformly inside a cube of edge `spread` centred on the origin.
pub struct GraphBuilder<'a, R: Rng> {
    graph: LayoutGraph,
    rng: &'a mut R,
    spread: f64,
}

impl<'a, R: Rng> GraphBuilder<'a, R> {
    pub fn new(rng: &'a mut R, spread: f64) -> Self {
        Self {
            graph: LayoutGraph::new(),
            rng,
            spread,
        }
    }

    fn scatter(&mut self) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * self.spread
    }

    pub fn finish(self) -> LayoutGraph {
        self.graph
    }
}

impl<R: Rng> ExploreSink for GraphBuilder<'_, R> {
    fn node_discovered(&mut self, id: &StateId) -> Result<(), GraphError> {
        let position = Vec3::new(self.scatter(), self.scatter(), self.scatter());
        tracing::trace!(%id, ?position, "materialized node");
        self.graph.add_node(id.clone(), position)
    }

    fn edge_discovered(&mut self, from: &StateId, to: &StateId) -> Result<(), GraphError> {
        self.graph.add_edge(from, to)
    }
}
