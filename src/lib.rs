#![no_std]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod adapter;
pub mod algo;
pub mod capacity;
pub mod error;
pub mod id;
pub mod labeled;
pub mod node;
pub mod residual;
pub mod trace;
pub mod view;
pub mod weighted;

use alloc::vec::Vec;

use serde::Serialize;

pub use crate::capacity::Capacity;
pub use crate::error::Error;
pub use crate::id::Id;
pub use crate::labeled::{EdgeData, LabeledGraph};
pub use crate::node::Node;
pub use crate::residual::{Edge, ResidualGraph};
pub use crate::trace::{Step, Trace, TraceRecorder};
pub use crate::view::{GraphView, Snapshot, ViewEdge};
pub use crate::weighted::{WeightedEdge, WeightedGraph};

/// Shortest distances between labeled vertices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceMatrix<L> {
    labels: Vec<L>,
    rows: Vec<Vec<f64>>,
}

impl<L: Id> DistanceMatrix<L> {
    /// Vertex labels in row/column order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Distance from `from` to `to`; `f64::INFINITY` if `to` is unreachable,
    /// `None` if either label is unknown.
    pub fn distance(&self, from: &L, to: &L) -> Option<f64> {
        let u = self.labels.iter().position(|l| l == from)?;
        let v = self.labels.iter().position(|l| l == to)?;
        Some(self.rows[u][v])
    }
}

/// Maximum flow from `source` to `sink` in `graph` using Dinic's algorithm.
///
/// Edge capacities come from the `capacity` attribute, or from an integral
/// `weight` when no capacity is set. Returns the flow value and the trace of
/// the run with snapshots labeled like `graph`.
pub fn max_flow<L: Id>(
    graph: &LabeledGraph<L>,
    source: &L,
    sink: &L,
) -> Result<(i64, Trace<Node<L>, i64>), Error> {
    let (residual, labels) = adapter::labeled_graph_to_residual(graph)?;
    let s = graph.position(source)?;
    let t = graph.position(sink)?;

    let outcome = algo::dinic(residual, s, t)?;
    log::debug!("max flow {source:?} -> {sink:?}: {}", outcome.value);

    let trace = adapter::relabel_trace(outcome.trace, &labels)?;
    Ok((outcome.value, trace))
}

/// Shortest distances between all pairs of vertices of `graph` using Johnson's
/// algorithm, reading edge weights from the `weight` attribute.
///
/// Fails with [`Error::NegativeCycleDetected`] if the graph has a cycle of
/// negative total weight.
pub fn all_pairs_shortest_paths<L: Id>(
    graph: &LabeledGraph<L>,
) -> Result<(DistanceMatrix<L>, Trace<Node<L>, f64>), Error> {
    let (weighted, labels) = adapter::labeled_graph_to_weighted_adjacency(graph)?;

    let outcome = algo::johnson(&weighted)?;
    let trace = adapter::relabel_trace(outcome.trace, &labels)?;

    Ok((
        DistanceMatrix {
            labels,
            rows: outcome.distances,
        },
        trace,
    ))
}
