use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::Error;
use crate::id::Id;
use crate::labeled::{EdgeData, LabeledGraph};
use crate::node::Node;
use crate::residual::ResidualGraph;
use crate::trace::Trace;
use crate::weighted::WeightedGraph;

fn invalid<L: Id>(source: &L, target: &L, attribute: &'static str, value: impl ToString) -> Error {
    Error::InvalidAttribute {
        source: format!("{source:?}"),
        target: format!("{target:?}"),
        attribute,
        value: value.to_string(),
    }
}

/// Reads the capacity of an edge. Graphs drawn interactively only carry
/// weights, so an integral non-negative `weight` is accepted when no
/// `capacity` is set.
fn capacity_of<L: Id>(source: &L, target: &L, data: &EdgeData) -> Result<i64, Error> {
    match (data.capacity, data.weight) {
        (Some(c), _) if c >= 0 => Ok(c),
        (Some(c), _) => Err(invalid(source, target, "capacity", c)),
        (None, Some(w)) if w >= 0.0 && w < i64::MAX as f64 && (w as i64) as f64 == w => {
            Ok(w as i64)
        }
        (None, Some(w)) => Err(invalid(source, target, "weight", w)),
        (None, None) => Err(Error::MissingAttribute {
            source: format!("{source:?}"),
            target: format!("{target:?}"),
            attribute: "capacity",
        }),
    }
}

fn weight_of<L: Id>(source: &L, target: &L, data: &EdgeData) -> Result<f64, Error> {
    match data.weight {
        Some(w) if w.is_finite() => Ok(w),
        Some(w) => Err(invalid(source, target, "weight", w)),
        None => Err(Error::MissingAttribute {
            source: format!("{source:?}"),
            target: format!("{target:?}"),
            attribute: "weight",
        }),
    }
}

fn labels_of<L: Id>(graph: &LabeledGraph<L>) -> Result<Vec<L>, Error> {
    if graph.vertex_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    Ok(graph.vertices().cloned().collect())
}

/// Converts `graph` into a residual network, one forward/reverse pair per edge
/// in insertion order. The returned labels are indexed by vertex number.
pub fn labeled_graph_to_residual<L: Id>(
    graph: &LabeledGraph<L>,
) -> Result<(ResidualGraph<i64>, Vec<L>), Error> {
    let labels = labels_of(graph)?;

    let mut residual = ResidualGraph::new(labels.len());
    for (source, target, data) in graph.edges() {
        let capacity = capacity_of(source, target, data)?;
        residual.add_edge(graph.position(source)?, graph.position(target)?, capacity)?;
    }
    Ok((residual, labels))
}

/// Converts `graph` into a weighted adjacency list. The returned labels are
/// indexed by vertex number.
pub fn labeled_graph_to_weighted_adjacency<L: Id>(
    graph: &LabeledGraph<L>,
) -> Result<(WeightedGraph, Vec<L>), Error> {
    let labels = labels_of(graph)?;

    let mut weighted = WeightedGraph::new(labels.len());
    for (source, target, data) in graph.edges() {
        let weight = weight_of(source, target, data)?;
        weighted.add_edge(graph.position(source)?, graph.position(target)?, weight)?;
    }
    Ok((weighted, labels))
}

fn label<L: Clone>(labels: &[L], index: usize) -> Result<L, Error> {
    labels.get(index).cloned().ok_or(Error::IndexOutOfRange {
        index,
        len: labels.len(),
    })
}

fn with_vertices<L: Id>(vertex_count: usize, labels: &[L]) -> Result<LabeledGraph<L>, Error> {
    let mut graph = LabeledGraph::new();
    for v in 0..vertex_count {
        graph.add_vertex(label(labels, v)?);
    }
    Ok(graph)
}

/// Builds a labeled graph from the edges of `residual` that still have
/// capacity left, valued by that residual capacity.
pub fn residual_to_labeled<L: Id>(
    residual: &ResidualGraph<i64>,
    labels: &[L],
) -> Result<LabeledGraph<L>, Error> {
    let mut graph = with_vertices(residual.vertex_count(), labels)?;
    for u in 0..residual.vertex_count() {
        for edge in residual.edges(u).iter().filter(|e| e.capacity > 0) {
            graph.add_edge(
                &labels[u],
                &labels[edge.to],
                EdgeData::with_capacity(edge.capacity),
            )?;
        }
    }
    Ok(graph)
}

pub fn weighted_to_labeled<L: Id>(
    weighted: &WeightedGraph,
    labels: &[L],
) -> Result<LabeledGraph<L>, Error> {
    let mut graph = with_vertices(weighted.vertex_count(), labels)?;
    for (u, e) in weighted.iter_edges() {
        graph.add_edge(&labels[u], &labels[e.to], EdgeData::weighted(e.weight))?;
    }
    Ok(graph)
}

/// Replaces the vertex numbers in every snapshot of `trace` with their labels.
pub fn relabel_trace<L: Id, W>(
    trace: Trace<Node<usize>, W>,
    labels: &[L],
) -> Result<Trace<Node<L>, W>, Error> {
    trace.try_map_vertices(|node| match node {
        Node::Virtual => Ok(Node::Virtual),
        Node::WithId(v) => label(labels, v).map(Node::WithId),
    })
}
