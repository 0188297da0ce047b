//! Test instances for the bench driver.

use blossom_core::{FractionalSolution, Graph, SepResult};
use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Built-in instance families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstanceKind {
    /// Integral tour on five nodes; nothing to separate.
    Cycle5,

    /// Five nodes, eight edges with hand-picked fractional values.
    Demo5,

    /// Random connected graph with generated fractional values.
    Random,
}

/// A graph with a fractional point on it.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub graph: Graph,
    pub x: FractionalSolution,
}

const DEMO5_EDGES: [usize; 16] = [0, 1, 0, 2, 0, 3, 1, 2, 1, 3, 2, 3, 2, 4, 3, 4];
const DEMO5_VALUES: [f64; 8] = [0.5, 0.3, 0.7, 0.2, 0.1, 0.6, 0.4, 0.8];

/// Build the requested instance. `nodes` and `density` apply to `Random` only.
pub fn build(kind: InstanceKind, nodes: usize, density: f64, seed: u64) -> SepResult<Instance> {
    match kind {
        InstanceKind::Cycle5 => {
            let graph = Graph::cycle(5)?;
            let x = FractionalSolution::for_graph(&graph, vec![1.0; 5])?;
            Ok(Instance {
                name: "cycle5".to_string(),
                graph,
                x,
            })
        }
        InstanceKind::Demo5 => {
            let graph = Graph::from_flat(5, &DEMO5_EDGES)?;
            let x = FractionalSolution::for_graph(&graph, DEMO5_VALUES.to_vec())?;
            Ok(Instance {
                name: "demo5".to_string(),
                graph,
                x,
            })
        }
        InstanceKind::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let graph = random_graph(nodes, density, &mut rng)?;
            let x = FractionalSolution::for_graph(&graph, fractional_values(&graph, &mut rng))?;
            Ok(Instance {
                name: format!("random-n{}-p{}-s{}", nodes, density, seed),
                graph,
                x,
            })
        }
    }
}

/// Hamiltonian cycle `0-1-...-(n-1)-0` plus each other pair with
/// probability `density`.
pub fn random_graph<R: Rng>(n: usize, density: f64, rng: &mut R) -> SepResult<Graph> {
    if n < 3 {
        // Let Graph::cycle produce the error
        return Graph::cycle(n);
    }
    let mut edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();

    let density = density.clamp(0.0, 1.0);
    for u in 0..n {
        for v in u + 2..n {
            if u == 0 && v == n - 1 {
                continue;
            }
            if rng.gen_bool(density) {
                edges.push((u, v));
            }
        }
    }
    Graph::new(n, edges)
}

/// Random edge values in `[0, 1]` with every incident sum at most 2.
///
/// Edges are visited in random order and each takes a uniform draw capped by
/// the remaining degree budget of its endpoints.
pub fn fractional_values<R: Rng>(graph: &Graph, rng: &mut R) -> Vec<f64> {
    let mut budget = vec![2.0_f64; graph.node_count()];
    let mut values = vec![0.0; graph.edge_count()];

    let mut order: Vec<usize> = (0..graph.edge_count()).collect();
    order.shuffle(rng);

    for e in order {
        let (u, v) = graph.edge(e);
        let cap = budget[u].min(budget[v]).min(1.0);
        if cap <= 0.0 {
            continue;
        }
        // Snap to tenths so that integral and half-integral values show up
        let draw: f64 = rng.gen_range(0.0..=1.0);
        let value = ((draw * 10.0).round() / 10.0).min(cap);
        values[e] = value;
        budget[u] -= value;
        budget[v] -= value;
    }

    values
}
