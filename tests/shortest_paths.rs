use graphstep::algo::johnson;
use graphstep::{all_pairs_shortest_paths, EdgeData, Error, LabeledGraph, WeightedGraph};
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const INF: f64 = f64::INFINITY;

type EdgeList = Vec<(usize, usize, f64)>;

fn random_graph(rng: &mut StdRng, min_weight: i32) -> (usize, EdgeList) {
    let n = rng.gen_range(1..=8);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in 0..n {
            if u != v && rng.gen_bool(0.35) {
                edges.push((u, v, f64::from(rng.gen_range(min_weight..10))));
            }
        }
    }
    (n, edges)
}

fn build(n: usize, edges: &EdgeList) -> WeightedGraph {
    let mut g = WeightedGraph::new(n);
    for &(u, v, w) in edges {
        g.add_edge(u, v, w).unwrap();
    }
    g
}

/// Floyd-Warshall; `None` when some vertex can reach itself at negative cost.
fn floyd_warshall(n: usize, edges: &EdgeList) -> Option<Vec<Vec<f64>>> {
    let mut d = vec![vec![INF; n]; n];
    for (v, row) in d.iter_mut().enumerate() {
        row[v] = 0.0;
    }
    for &(u, v, w) in edges {
        if w < d[u][v] {
            d[u][v] = w;
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if d[i][k] + d[k][j] < d[i][j] {
                    d[i][j] = d[i][k] + d[k][j];
                }
            }
        }
    }
    (0..n).all(|v| d[v][v] >= 0.0).then_some(d)
}

#[test]
fn matches_floyd_warshall_with_negative_edges() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut checked = 0;
    let mut cycles = 0;
    for _ in 0..400 {
        let (n, edges) = random_graph(&mut rng, -3);
        match (floyd_warshall(n, &edges), johnson(&build(n, &edges))) {
            (Some(expected), Ok(outcome)) => {
                assert_eq!(outcome.distances, expected, "edges = {edges:?}");
                checked += 1;
            }
            (None, Err(Error::NegativeCycleDetected)) => cycles += 1,
            (expected, got) => panic!("{edges:?}: expected {expected:?}, got {got:?}"),
        }
    }
    assert!(checked > 0);
    assert!(cycles > 0);
}

#[test]
fn matches_plain_dijkstra_without_negative_edges() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..200 {
        let (n, edges) = random_graph(&mut rng, 0);
        let outcome = johnson(&build(n, &edges)).unwrap();

        let mut g = DiGraph::<(), f64>::new();
        let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();
        for &(u, v, w) in &edges {
            g.add_edge(nodes[u], nodes[v], w);
        }

        for u in 0..n {
            let settled = dijkstra(&g, nodes[u], None, |e| *e.weight());
            for v in 0..n {
                let expected = settled.get(&NodeIndex::new(v)).copied().unwrap_or(INF);
                assert_eq!(outcome.distances[u][v], expected);
            }
        }
        assert!(outcome.potentials.iter().all(|&h| h == 0.0));
    }
}

#[test]
fn negative_cycle_scenario() {
    let g = build(3, &vec![(0, 1, 1.0), (1, 2, -5.0), (2, 0, 1.0)]);
    assert_eq!(johnson(&g).unwrap_err(), Error::NegativeCycleDetected);
}

#[test]
fn unreachable_pairs_are_infinite() {
    let g = build(3, &vec![(0, 1, -1.0)]);
    let outcome = johnson(&g).unwrap();
    assert_eq!(outcome.distances[0], vec![0.0, -1.0, INF]);
    assert_eq!(outcome.distances[2], vec![INF, INF, 0.0]);
}

#[test]
fn trace_length_is_fixed_by_vertex_count() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..50 {
        let (n, edges) = random_graph(&mut rng, 0);
        let outcome = johnson(&build(n, &edges)).unwrap();
        assert_eq!(outcome.trace.len(), 5 + n);
    }
}

#[test]
fn labeled_negative_cycle_is_reported() {
    let mut g = LabeledGraph::new();
    for v in [10u32, 20, 30] {
        g.add_vertex(v);
    }
    g.add_edge(&10, &20, EdgeData::weighted(1.0)).unwrap();
    g.add_edge(&20, &30, EdgeData::weighted(-5.0)).unwrap();
    g.add_edge(&30, &10, EdgeData::weighted(1.0)).unwrap();

    assert_eq!(
        all_pairs_shortest_paths(&g).unwrap_err(),
        Error::NegativeCycleDetected
    );
}

#[test]
fn fractional_reweighting_stays_non_negative() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..300 {
        let n = rng.gen_range(2..=6);
        let mut edges = Vec::new();
        for u in 0..n {
            for v in 0..n {
                if u != v && rng.gen_bool(0.5) {
                    edges.push((u, v, f64::from(rng.gen_range(-10..=30)) / 10.0));
                }
            }
        }
        let Ok(outcome) = johnson(&build(n, &edges)) else {
            continue;
        };
        let reweighted = outcome.trace.get(3).unwrap();
        assert_eq!(reweighted.title(), "Reweight edges");
        assert!(
            reweighted.snapshot().edges.iter().all(|e| e.value >= 0.0),
            "edges = {edges:?}"
        );
    }
}
