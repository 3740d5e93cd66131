use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::max;

use serde::Serialize;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::node::Node;
use crate::view::{GraphView, Snapshot};

/// A residual edge. `rev` is the position of the paired edge in `to`'s list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edge<C> {
    pub to: usize,
    pub rev: usize,
    pub capacity: C,
}

/// The forward half of an `add_edge` call, kept so the flow on every original
/// edge can be read back after a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ForwardEdge<C> {
    pub from: usize,
    pub index: usize,
    pub capacity: C,
}

/// Flow carried by one original edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeFlow<C> {
    pub from: usize,
    pub to: usize,
    pub capacity: C,
    pub flow: C,
}

/// Adjacency-list residual network.
///
/// Every forward edge `u -> v` is stored together with a reverse edge
/// `v -> u` so that pushing flow only ever touches the two halves of a pair.
/// For each pair `capacity + reverse.capacity` equals the capacity the edge
/// was added with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResidualGraph<C> {
    adjacency: Vec<Vec<Edge<C>>>,
    forward: Vec<ForwardEdge<C>>,
}

impl<C: Capacity> ResidualGraph<C> {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            forward: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of original edges, reverse halves excluded.
    pub fn edge_count(&self) -> usize {
        self.forward.len()
    }

    pub fn check_vertex(&self, v: usize) -> Result<(), Error> {
        if v < self.adjacency.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: v,
                len: self.adjacency.len(),
            })
        }
    }

    /// Adds `u -> v` with `capacity` and its zero-capacity reverse `v -> u`.
    ///
    /// Negative capacities are treated the same as zero.
    pub fn add_edge(&mut self, u: usize, v: usize, capacity: C) -> Result<(), Error> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;

        let capacity = max(capacity, C::zero());
        let index = self.adjacency[u].len();
        // for a self-loop the reverse lands right after the forward edge
        let rev = if u == v { index + 1 } else { self.adjacency[v].len() };

        self.adjacency[u].push(Edge {
            to: v,
            rev,
            capacity,
        });
        self.adjacency[v].push(Edge {
            to: u,
            rev: index,
            capacity: C::zero(),
        });
        self.forward.push(ForwardEdge {
            from: u,
            index,
            capacity,
        });
        Ok(())
    }

    pub fn edges(&self, v: usize) -> &[Edge<C>] {
        &self.adjacency[v]
    }

    pub fn edge(&self, v: usize, index: usize) -> &Edge<C> {
        &self.adjacency[v][index]
    }

    /// Moves `amount` of flow along the `index`-th edge of `v`.
    pub fn push(&mut self, v: usize, index: usize, amount: C) {
        let (to, rev) = {
            let edge = &mut self.adjacency[v][index];
            debug_assert!(edge.capacity >= amount);
            edge.capacity -= amount;
            (edge.to, edge.rev)
        };
        self.adjacency[to][rev].capacity += amount;
    }

    pub fn forward_edges(&self) -> &[ForwardEdge<C>] {
        &self.forward
    }

    /// Flow on every original edge, in insertion order.
    pub fn flows(&self) -> impl Iterator<Item = EdgeFlow<C>> + '_ {
        self.forward.iter().map(move |f| {
            let edge = &self.adjacency[f.from][f.index];
            EdgeFlow {
                from: f.from,
                to: edge.to,
                capacity: f.capacity,
                flow: f.capacity - edge.capacity,
            }
        })
    }

    /// Vertices reachable from `s` over edges with residual capacity left.
    pub fn reachable_from(&self, s: usize) -> Vec<bool> {
        let mut seen = vec![false; self.vertex_count()];
        if s >= seen.len() {
            return seen;
        }

        let mut queue = VecDeque::from([s]);
        seen[s] = true;
        while let Some(u) = queue.pop_front() {
            for edge in &self.adjacency[u] {
                if edge.capacity > C::zero() && !seen[edge.to] {
                    seen[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
        seen
    }

    /// Picture of the edges that pass `keep`, valued by residual capacity.
    pub fn snapshot_filtered<F>(&self, mut keep: F) -> GraphView<Node<usize>, C>
    where
        F: FnMut(usize, &Edge<C>) -> bool,
    {
        let mut view = GraphView::new((0..self.vertex_count()).map(Node::WithId).collect());
        for (u, edges) in self.adjacency.iter().enumerate() {
            for edge in edges.iter().filter(|e| keep(u, e)) {
                view.add_edge(Node::WithId(u), Node::WithId(edge.to), edge.capacity);
            }
        }
        view
    }
}

impl<C: Capacity> Snapshot for ResidualGraph<C> {
    type Weight = C;

    fn snapshot(&self) -> GraphView<Node<usize>, C> {
        self.snapshot_filtered(|_, e| e.capacity > C::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_paired<C: Capacity>(g: &ResidualGraph<C>) {
        for u in 0..g.vertex_count() {
            for (i, e) in g.edges(u).iter().enumerate() {
                let back = g.edge(e.to, e.rev);
                assert_eq!(back.to, u);
                assert_eq!(back.rev, i);
            }
        }
    }

    #[test]
    fn add_edge_pairs_forward_and_reverse() {
        let mut g = ResidualGraph::<i64>::new(3);
        g.add_edge(0, 1, 4).unwrap();
        g.add_edge(1, 2, 3).unwrap();
        g.add_edge(0, 1, 2).unwrap();

        assert_eq!(g.edges(0).len(), 2);
        assert_eq!(g.edges(1).len(), 3);
        assert_eq!(g.edge(1, 0), &Edge { to: 0, rev: 0, capacity: 0 });
        assert_eq!(g.edge_count(), 3);
        assert_paired(&g);
    }

    #[test]
    fn self_loop_keeps_pairing() {
        let mut g = ResidualGraph::<i32>::new(2);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(1, 1, 5).unwrap();
        assert_paired(&g);
    }

    #[test]
    fn add_edge_rejects_unknown_vertex() {
        let mut g = ResidualGraph::<i64>::new(2);
        assert_eq!(
            g.add_edge(0, 2, 1),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn negative_capacity_is_clamped() {
        let mut g = ResidualGraph::<i64>::new(2);
        g.add_edge(0, 1, -3).unwrap();
        assert_eq!(g.edge(0, 0).capacity, 0);
    }

    #[test]
    fn push_moves_capacity_to_reverse() {
        let mut g = ResidualGraph::<u32>::new(2);
        g.add_edge(0, 1, 5).unwrap();
        g.push(0, 0, 3);

        assert_eq!(g.edge(0, 0).capacity, 2);
        assert_eq!(g.edge(1, 0).capacity, 3);

        let flows: Vec<_> = g.flows().collect();
        assert_eq!(flows[0].flow, 3);
        assert_eq!(flows[0].capacity, 5);
    }

    #[test]
    fn snapshot_skips_saturated_edges() {
        let mut g = ResidualGraph::<i64>::new(3);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(1, 2, 2).unwrap();
        g.push(0, 0, 1);

        let view = g.snapshot();
        assert_eq!(view.vertex_count(), 3);
        // 1 -> 0 (reverse, now 1) and 1 -> 2
        assert_eq!(view.edge_count(), 2);
        assert!(view
            .edges
            .iter()
            .all(|e| e.source == Node::WithId(1) && e.value > 0));
    }

    #[test]
    fn reachability_follows_residual_capacity() {
        let mut g = ResidualGraph::<i64>::new(4);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(1, 2, 0).unwrap();
        g.add_edge(2, 3, 1).unwrap();

        assert_eq!(g.reachable_from(0), vec![true, true, false, false]);
    }
}
