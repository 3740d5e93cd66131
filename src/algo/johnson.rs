use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;

use itertools::Itertools;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::Error;
use crate::node::Node;
use crate::trace::{Trace, TraceRecorder};
use crate::view::Snapshot;
use crate::weighted::WeightedGraph;

/// Result of an all-pairs shortest path run.
#[derive(Clone, Debug)]
pub struct PathsOutcome {
    /// `distances[u][v]`, `f64::INFINITY` when `v` cannot be reached from `u`.
    pub distances: Vec<Vec<f64>>,
    /// Shortest distance from the virtual source to every original vertex.
    pub potentials: Vec<f64>,
    pub trace: Trace<Node<usize>, f64>,
}

fn fmt_distance(d: f64) -> String {
    if d == f64::INFINITY {
        "∞".to_string()
    } else {
        format!("{d:.1}")
    }
}

fn vertex_name(graph: &WeightedGraph, v: usize) -> String {
    if graph.virtual_source() == Some(v) {
        "S".to_string()
    } else {
        format!("V{v}")
    }
}

/// Lays out `rows` as a text table with the first row as header.
fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|j| {
            rows.iter()
                .filter_map(|row| row.get(j))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut table = String::new();
    for (i, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(j, (cell, &width))| {
                if j == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .join(" | ");
        table.push_str(&line);
        table.push('\n');
        if i == 0 {
            let total = widths.iter().sum::<usize>() + 3 * columns.saturating_sub(1);
            table.push_str(&"-".repeat(total));
            table.push('\n');
        }
    }
    table
}

/// Bellman-Ford from `source`. Each pass relaxes every edge once and the
/// search stops after the first pass that changes nothing. If the last
/// allowed pass still improves a distance the graph has a negative cycle
/// reachable from `source`.
///
/// Returns the distances and a table of the distance vector after each pass,
/// with changed entries starred.
fn bellman_ford(graph: &WeightedGraph, source: usize) -> Result<(Vec<f64>, String), Error> {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;

    let mut rows = vec![
        core::iter::once("pass".to_string())
            .chain((0..n).map(|v| vertex_name(graph, v)))
            .collect::<Vec<_>>(),
        core::iter::once("0".to_string())
            .chain(dist.iter().map(|&d| fmt_distance(d)))
            .collect(),
    ];

    for pass in 1..=n {
        let mut changed = vec![false; n];
        for (u, e) in graph.iter_edges() {
            if dist[u] == f64::INFINITY {
                continue;
            }
            let candidate = dist[u] + e.weight;
            if candidate < dist[e.to] {
                dist[e.to] = candidate;
                changed[e.to] = true;
            }
        }

        rows.push(
            core::iter::once(pass.to_string())
                .chain(dist.iter().zip(&changed).map(|(&d, &c)| {
                    let cell = fmt_distance(d);
                    if c {
                        cell + "*"
                    } else {
                        cell
                    }
                }))
                .collect(),
        );

        if !changed.contains(&true) {
            log::debug!("bellman-ford converged after {pass} passes");
            return Ok((dist, format_table(&rows)));
        }
    }

    log::debug!("bellman-ford still relaxing after {n} passes");
    Err(Error::NegativeCycleDetected)
}

/// Computes shortest distances between every pair of vertices of `graph` with
/// Johnson's algorithm. Edge weights may be negative.
///
/// Fails with [`Error::NegativeCycleDetected`] instead of returning distances
/// when the graph contains a negative-weight cycle, and with
/// [`Error::EmptyGraph`] when it has no vertices.
pub fn johnson(graph: &WeightedGraph) -> Result<PathsOutcome, Error> {
    let n = graph.vertex_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let mut trace = TraceRecorder::new();
    trace.record(
        "Initial graph",
        graph.snapshot(),
        format!("vertices: {n}, edges: {}", graph.edge_count()),
    );

    let augmented = graph.augmented();
    trace.record(
        "Add virtual source",
        augmented.snapshot(),
        format!("added vertex S (index {n}) with a zero-weight edge to every vertex"),
    );

    let (dist, table) = bellman_ford(&augmented, n)?;
    let potentials = dist[..n].to_vec();
    let mut detail = format!("passes:\n\n{table}\npotentials h(v):");
    for (v, h) in potentials.iter().enumerate() {
        let _ = write!(detail, "\n  h(V{v}) = {}", fmt_distance(*h));
    }
    trace.record("Bellman-Ford from S", augmented.snapshot(), detail);

    let reweighted = graph.map_weights(|u, e| {
        (e.weight + potentials[u] - potentials[e.to]).max(0.0)
    });
    let mut detail = String::from("w'(u, v) = w(u, v) + h(u) - h(v)\n");
    for ((u, e), (_, r)) in graph.iter_edges().zip(reweighted.iter_edges()) {
        let _ = write!(
            detail,
            "\nV{u} -> V{}: {:.1} + {:.1} - {:.1} = {:.1}",
            e.to, e.weight, potentials[u], potentials[e.to], r.weight
        );
    }
    trace.record("Reweight edges", reweighted.snapshot(), detail);

    let mut search = DiGraph::<(), f64>::with_capacity(n, reweighted.edge_count());
    for _ in 0..n {
        search.add_node(());
    }
    for (u, e) in reweighted.iter_edges() {
        search.add_edge(NodeIndex::new(u), NodeIndex::new(e.to), e.weight);
    }

    let mut distances = Vec::with_capacity(n);
    for u in 0..n {
        let settled = dijkstra(&search, NodeIndex::new(u), None, |e| *e.weight());
        let row: Vec<f64> = (0..n)
            .map(|v| {
                settled
                    .get(&NodeIndex::new(v))
                    .map_or(f64::INFINITY, |d| d + potentials[v] - potentials[u])
            })
            .collect();

        let summary = row
            .iter()
            .enumerate()
            .map(|(v, &d)| format!("V{v}: {}", fmt_distance(d)))
            .join(", ");
        trace.record(
            format!("Dijkstra from V{u}"),
            reweighted.snapshot(),
            format!("[{summary}]"),
        );
        distances.push(row);
    }

    let rows: Vec<Vec<String>> = core::iter::once(
        core::iter::once(String::new())
            .chain((0..n).map(|v| format!("V{v}")))
            .collect(),
    )
    .chain(distances.iter().enumerate().map(|(u, row)| {
        core::iter::once(format!("V{u}"))
            .chain(row.iter().map(|&d| fmt_distance(d)))
            .collect()
    }))
    .collect();
    trace.record("Distance matrix", graph.snapshot(), format_table(&rows));

    Ok(PathsOutcome {
        distances,
        potentials,
        trace: trace.finish(),
    })
}
