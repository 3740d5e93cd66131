use alloc::vec::Vec;

use serde::Serialize;

use crate::node::Node;

/// A single valued edge of a [`GraphView`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewEdge<V, W> {
    pub source: V,
    pub target: V,
    pub value: W,
}

/// A fully-labeled picture of a graph at one point of an algorithm run.
///
/// A view owns its vertices and edges outright and keeps no reference to the
/// graph it was taken from, so it stays valid after the solver moves on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphView<V, W> {
    pub vertices: Vec<V>,
    pub edges: Vec<ViewEdge<V, W>>,
}

impl<V, W> GraphView<V, W> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self {
            vertices,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, source: V, target: V, value: W) {
        self.edges.push(ViewEdge {
            source,
            target,
            value,
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Rebuild the view with every vertex passed through `f`.
    pub fn try_map_vertices<U, E, F>(self, mut f: F) -> Result<GraphView<U, W>, E>
    where
        F: FnMut(V) -> Result<U, E>,
    {
        let vertices = self
            .vertices
            .into_iter()
            .map(&mut f)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges
            .into_iter()
            .map(|e| {
                Ok(ViewEdge {
                    source: f(e.source)?,
                    target: f(e.target)?,
                    value: e.value,
                })
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(GraphView { vertices, edges })
    }
}

/// A numeric graph form that can be pictured for the trace.
pub trait Snapshot {
    type Weight;

    fn snapshot(&self) -> GraphView<Node<usize>, Self::Weight>;
}
