use alloc::vec;
use alloc::vec::Vec;

use serde::Serialize;

use crate::error::Error;
use crate::node::Node;
use crate::view::{GraphView, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WeightedEdge {
    pub to: usize,
    pub weight: f64,
}

/// Adjacency list with real, possibly negative, edge weights.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeightedGraph {
    adjacency: Vec<Vec<WeightedEdge>>,
    virtual_source: Option<usize>,
}

impl WeightedGraph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            virtual_source: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<(), Error> {
        let len = self.adjacency.len();
        if let Some(&index) = [u, v].iter().find(|&&i| i >= len) {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.adjacency[u].push(WeightedEdge { to: v, weight });
        Ok(())
    }

    pub fn edges(&self, u: usize) -> &[WeightedEdge] {
        &self.adjacency[u]
    }

    /// All edges as `(from, edge)`, grouped by source vertex.
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, &WeightedEdge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, edges)| edges.iter().map(move |e| (u, e)))
    }

    /// The extra source vertex, if this graph came from [`WeightedGraph::augmented`].
    pub fn virtual_source(&self) -> Option<usize> {
        self.virtual_source
    }

    /// Copy of the graph with one more vertex that has a zero-weight edge to
    /// every original vertex.
    pub fn augmented(&self) -> Self {
        let n = self.vertex_count();
        let mut adjacency = self.adjacency.clone();
        adjacency.push((0..n).map(|to| WeightedEdge { to, weight: 0.0 }).collect());
        Self {
            adjacency,
            virtual_source: Some(n),
        }
    }

    /// Same vertices, every edge weight passed through `f(from, edge)`.
    pub fn map_weights<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, &WeightedEdge) -> f64,
    {
        let adjacency = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(u, edges)| {
                edges
                    .iter()
                    .map(|e| WeightedEdge {
                        to: e.to,
                        weight: f(u, e),
                    })
                    .collect()
            })
            .collect();
        Self {
            adjacency,
            virtual_source: self.virtual_source,
        }
    }

    fn node(&self, v: usize) -> Node<usize> {
        if Some(v) == self.virtual_source {
            Node::Virtual
        } else {
            Node::WithId(v)
        }
    }
}

impl Snapshot for WeightedGraph {
    type Weight = f64;

    fn snapshot(&self) -> GraphView<Node<usize>, f64> {
        let mut view = GraphView::new((0..self.vertex_count()).map(|v| self.node(v)).collect());
        for (u, e) in self.iter_edges() {
            view.add_edge(self.node(u), self.node(e.to), e.weight);
        }
        view
    }
}
