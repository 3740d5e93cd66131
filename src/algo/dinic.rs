use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;
use core::fmt::Write;

use itertools::Itertools;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::node::Node;
use crate::residual::ResidualGraph;
use crate::trace::{Trace, TraceRecorder};
use crate::view::Snapshot;

/// Result of a max-flow run.
#[derive(Clone, Debug)]
pub struct FlowOutcome<C> {
    pub value: C,
    /// Residual network left behind once the sink became unreachable.
    pub residual: ResidualGraph<C>,
    /// `source_side[v]` is true when `v` is on the source side of a minimum cut.
    pub source_side: Vec<bool>,
    pub trace: Trace<Node<usize>, C>,
}

/// One level of the blocking-flow search: a vertex and the most flow the path
/// leading to it can still carry.
#[derive(Clone, Copy, Debug)]
struct Frame<C> {
    vertex: usize,
    budget: C,
}

/// Whether `v` sits exactly one level above `u`. Unreached vertices belong to
/// no level.
fn next_level(level: &[Option<usize>], u: usize, v: usize) -> bool {
    match (level[u], level[v]) {
        (Some(a), Some(b)) => b == a + 1,
        _ => false,
    }
}

struct State<C> {
    graph: ResidualGraph<C>,
    source: usize,
    target: usize,
    level: Vec<Option<usize>>,
    // current arc of every vertex
    next_edge: Vec<usize>,
    trace: TraceRecorder<Node<usize>, C>,
}

impl<C: Capacity> State<C> {
    fn new(graph: ResidualGraph<C>, source: usize, target: usize) -> Self {
        let n = graph.vertex_count();
        State {
            graph,
            source,
            target,
            level: vec![None; n],
            next_edge: vec![0; n],
            trace: TraceRecorder::new(),
        }
    }

    fn log(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        let snapshot = self.graph.snapshot();
        self.trace.record(title, snapshot, detail);
    }

    fn admissible(&self, v: usize, index: usize) -> bool {
        let edge = self.graph.edge(v, index);
        edge.capacity > C::zero() && next_level(&self.level, v, edge.to)
    }

    /// Builds the level array. Returns whether the target is reachable.
    fn bfs(&mut self) -> bool {
        self.level.iter_mut().for_each(|l| *l = None);
        self.level[self.source] = Some(0);

        let mut detail = format!("BFS from {}", self.source);
        let mut queue = VecDeque::from([self.source]);
        while let Some(u) = queue.pop_front() {
            let next = self.level[u].map(|l| l + 1);
            for edge in self.graph.edges(u) {
                if edge.capacity > C::zero() && self.level[edge.to].is_none() {
                    self.level[edge.to] = next;
                    queue.push_back(edge.to);
                    let _ = write!(
                        detail,
                        "\n  {u} -> {}: level {}, capacity {}",
                        edge.to,
                        next.unwrap_or_default(),
                        edge.capacity
                    );
                }
            }
        }

        let reachable = self.level[self.target].is_some();
        let _ = write!(detail, "\nsink reachable: {reachable}");
        log::debug!("levels: {:?}", self.level);

        let level = &self.level;
        let layered = self
            .graph
            .snapshot_filtered(|u, e| e.capacity > C::zero() && next_level(level, u, e.to));
        self.trace.record("BFS", layered, detail);

        reachable
    }

    /// Finds one augmenting path in the layered graph and pushes flow along
    /// it. Returns zero once the source has no admissible edge left.
    fn augment(&mut self) -> C {
        let mut stack = vec![Frame {
            vertex: self.source,
            budget: C::max_value(),
        }];

        while let Some(Frame { vertex, budget }) = stack.last().copied() {
            if vertex == self.target {
                for frame in &stack[..stack.len() - 1] {
                    let index = self.next_edge[frame.vertex];
                    self.graph.push(frame.vertex, index, budget);
                }
                let path = stack.iter().map(|f| f.vertex).join(" -> ");
                log::trace!("augmenting path {path}, pushed {budget}");
                self.log(
                    "Augmenting path",
                    format!("path: {path}\npushed flow: {budget}"),
                );
                return budget;
            }

            let degree = self.graph.edges(vertex).len();
            while self.next_edge[vertex] < degree
                && !self.admissible(vertex, self.next_edge[vertex])
            {
                self.next_edge[vertex] += 1;
            }

            if self.next_edge[vertex] < degree {
                let edge = self.graph.edge(vertex, self.next_edge[vertex]);
                stack.push(Frame {
                    vertex: edge.to,
                    budget: min(budget, edge.capacity),
                });
            } else {
                // dead end, so the parent's current edge is useless for this phase
                stack.pop();
                if let Some(parent) = stack.last() {
                    self.next_edge[parent.vertex] += 1;
                }
            }
        }

        C::zero()
    }

    fn run(&mut self) -> Result<C, Error> {
        self.log(
            "Start",
            format!("source: {}, sink: {}", self.source, self.target),
        );

        let mut flow = C::zero();
        if self.source == self.target {
            log::debug!("source equals sink, nothing to push");
            self.log("Finish", format!("maximum flow: {flow}"));
            return Ok(flow);
        }

        let mut phase = 1;
        while self.bfs() {
            self.next_edge.iter_mut().for_each(|i| *i = 0);
            loop {
                let pushed = self.augment();
                if pushed == C::zero() {
                    break;
                }
                flow = flow.checked_add(&pushed).ok_or(Error::ArithmeticOverflow)?;
            }
            log::debug!("phase {phase} done, flow so far {flow}");
            self.log(
                format!("End of phase {phase}"),
                format!("total flow: {flow}"),
            );
            phase += 1;
        }

        self.log("Finish", format!("maximum flow: {flow}"));
        Ok(flow)
    }
}

/// Computes a maximum flow from `source` to `target` in `graph` with Dinic's
/// algorithm.
///
/// Edges are explored in insertion order. `source == target` gives a zero
/// flow. Fails if the graph is empty, if either vertex is out of range, or if
/// the total flow overflows `C`.
pub fn dinic<C: Capacity>(
    graph: ResidualGraph<C>,
    source: usize,
    target: usize,
) -> Result<FlowOutcome<C>, Error> {
    if graph.vertex_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    graph.check_vertex(source)?;
    graph.check_vertex(target)?;

    let mut state = State::new(graph, source, target);
    let value = state.run()?;

    let source_side = state.graph.reachable_from(source);
    Ok(FlowOutcome {
        value,
        residual: state.graph,
        source_side,
        trace: state.trace.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize, i64)]) -> ResidualGraph<i64> {
        let mut g = ResidualGraph::new(n);
        for &(u, v, c) in edges {
            g.add_edge(u, v, c).unwrap();
        }
        g
    }

    fn diamond() -> ResidualGraph<i64> {
        graph(4, &[(0, 1, 1), (0, 2, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)])
    }

    #[test]
    fn diamond_has_flow_two() {
        let outcome = dinic(diamond(), 0, 3).unwrap();
        assert_eq!(outcome.value, 2);
        assert_eq!(outcome.source_side, vec![true, false, false, false]);
    }

    #[test]
    fn diamond_trace_checkpoints() {
        let outcome = dinic(diamond(), 0, 3).unwrap();
        let titles: Vec<_> = outcome.trace.steps().iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Start",
                "BFS",
                "Augmenting path",
                "Augmenting path",
                "End of phase 1",
                "BFS",
                "Finish"
            ]
        );

        // insertion order decides which path is found first
        assert!(outcome.trace.get(2).unwrap().detail().contains("0 -> 1 -> 3"));
        assert!(outcome.trace.get(3).unwrap().detail().contains("0 -> 2 -> 3"));
        assert!(outcome.trace.get(5).unwrap().detail().ends_with("sink reachable: false"));
        assert_eq!(outcome.trace.get(6).unwrap().detail(), "maximum flow: 2");
    }

    #[test]
    fn bfs_snapshot_is_layered() {
        let outcome = dinic(diamond(), 0, 3).unwrap();
        let layered = outcome.trace.get(1).unwrap().snapshot();
        // 1 -> 2 stays inside level 1 and is left out
        assert_eq!(layered.edge_count(), 4);
        assert!(!layered
            .edges
            .iter()
            .any(|e| e.source == Node::WithId(1) && e.target == Node::WithId(2)));

        // the last BFS only reaches the source
        let last = outcome.trace.get(5).unwrap();
        assert_eq!(last.title(), "BFS");
        assert!(last.snapshot().edges.is_empty());
    }

    #[test]
    fn unreached_vertices_have_no_level() {
        let level = [Some(0), None, None, Some(1)];
        assert!(next_level(&level, 0, 3));
        assert!(!next_level(&level, 1, 2));
        assert!(!next_level(&level, 3, 0));
        assert!(!next_level(&level, 0, 1));
    }

    #[test]
    fn classic_network() {
        let g = graph(
            6,
            &[
                (0, 1, 10),
                (0, 2, 10),
                (1, 3, 4),
                (1, 4, 8),
                (2, 4, 9),
                (3, 5, 10),
                (4, 3, 6),
                (4, 5, 10),
            ],
        );
        assert_eq!(dinic(g, 0, 5).unwrap().value, 19);
    }

    #[test]
    fn second_phase_undoes_flow() {
        // phase 1 saturates 0 -> 1 -> 2 -> 3, phase 2 reroutes through 2 -> 1
        let g = graph(
            8,
            &[
                (0, 1, 1),
                (1, 2, 1),
                (2, 3, 1),
                (1, 4, 1),
                (4, 5, 1),
                (5, 3, 1),
                (0, 6, 1),
                (6, 7, 1),
                (7, 2, 1),
            ],
        );
        let outcome = dinic(g, 0, 3).unwrap();
        assert_eq!(outcome.value, 2);

        let phases = outcome
            .trace
            .steps()
            .iter()
            .filter(|s| s.title().starts_with("End of phase"))
            .count();
        assert_eq!(phases, 2);
        assert!(outcome
            .trace
            .steps()
            .iter()
            .any(|s| s.detail().contains("0 -> 6 -> 7 -> 2 -> 1 -> 4 -> 5 -> 3")));
    }

    #[test]
    fn disconnected_sink() {
        let g = graph(4, &[(0, 1, 10), (2, 3, 5)]);
        let outcome = dinic(g, 0, 3).unwrap();
        assert_eq!(outcome.value, 0);
        assert_eq!(outcome.trace.len(), 3);
    }

    #[test]
    fn parallel_edges_add_up() {
        let g = graph(2, &[(0, 1, 3), (0, 1, 4)]);
        assert_eq!(dinic(g, 0, 1).unwrap().value, 7);
    }

    #[test]
    fn same_source_and_sink() {
        let outcome = dinic(diamond(), 2, 2).unwrap();
        assert_eq!(outcome.value, 0);
        assert_eq!(outcome.trace.len(), 2);
    }

    #[test]
    fn rejects_bad_indices() {
        assert_eq!(
            dinic(diamond(), 0, 4).unwrap_err(),
            Error::IndexOutOfRange { index: 4, len: 4 }
        );
        assert_eq!(
            dinic(ResidualGraph::<i64>::new(0), 0, 0).unwrap_err(),
            Error::EmptyGraph
        );
    }

    #[test]
    fn overflow_is_reported() {
        let g = graph(3, &[(0, 2, i64::MAX), (0, 1, 1), (1, 2, 1)]);
        assert_eq!(dinic(g, 0, 2).unwrap_err(), Error::ArithmeticOverflow);
    }

    #[test]
    fn residual_pairs_keep_their_sum() {
        let outcome = dinic(diamond(), 0, 3).unwrap();
        let residual = &outcome.residual;
        for f in residual.forward_edges() {
            let edge = residual.edge(f.from, f.index);
            let reverse = residual.edge(edge.to, edge.rev);
            assert_eq!(edge.capacity + reverse.capacity, f.capacity);
        }
    }
}
