use alloc::collections::BTreeMap;
use alloc::format;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::id::Id;
use crate::view::GraphView;

/// Attributes an edge of a [`LabeledGraph`] may carry. Which one an algorithm
/// reads is decided by the adapter feeding it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub weight: Option<f64>,
    pub capacity: Option<i64>,
}

impl EdgeData {
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: i64) -> Self {
        Self {
            weight: None,
            capacity: Some(capacity),
        }
    }
}

/// A directed graph whose vertices are identified by arbitrary labels.
///
/// Vertices and edges are kept in insertion order, which is the order the
/// adapters hand them to the solvers. Removing an edge moves the most recently
/// added edge into its slot.
#[derive(Clone, Debug)]
pub struct LabeledGraph<L> {
    graph: Graph<L, EdgeData>,
    index: BTreeMap<L, NodeIndex>,
}

impl<L: Id> Default for LabeledGraph<L> {
    fn default() -> Self {
        Self {
            graph: Graph::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<L: Id> LabeledGraph<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label` as a vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, label: L) -> bool {
        if self.index.contains_key(&label) {
            return false;
        }
        let idx = self.graph.add_node(label.clone());
        self.index.insert(label, idx);
        true
    }

    pub fn contains_vertex(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    fn node(&self, label: &L) -> Result<NodeIndex, Error> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::VertexNotFound(format!("{label:?}")))
    }

    /// Adds a `source -> target` edge. Both vertices must already exist.
    pub fn add_edge(&mut self, source: &L, target: &L, data: EdgeData) -> Result<(), Error> {
        let a = self.node(source)?;
        let b = self.node(target)?;
        self.graph.add_edge(a, b, data);
        Ok(())
    }

    /// Removes one `source -> target` edge. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, source: &L, target: &L) -> bool {
        let (Ok(a), Ok(b)) = (self.node(source), self.node(target)) else {
            return false;
        };
        match self.graph.find_edge(a, b) {
            Some(e) => self.graph.remove_edge(e).is_some(),
            None => false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Position of `label` in [`LabeledGraph::vertices`].
    pub fn position(&self, label: &L) -> Result<usize, Error> {
        self.node(label).map(NodeIndex::index)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &L> + '_ {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&L, &L, &EdgeData)> + '_ {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    &self.graph[e.source()],
                    &self.graph[e.target()],
                    &self.graph[e.id()],
                )
            })
    }

    /// Rebuilds a graph from a snapshot, turning each edge value into its
    /// attributes with `data`.
    pub fn from_view<W, F>(view: &GraphView<L, W>, mut data: F) -> Result<Self, Error>
    where
        F: FnMut(&W) -> EdgeData,
    {
        let mut graph = Self::new();
        for v in &view.vertices {
            graph.add_vertex(v.clone());
        }
        for e in &view.edges {
            graph.add_edge(&e.source, &e.target, data(&e.value))?;
        }
        Ok(graph)
    }
}
