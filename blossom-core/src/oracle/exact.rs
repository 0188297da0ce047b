//! Exact blossom separation (Padberg-Rao).
//!
//! Every edge `e = (u, v)` is split by a new node `w_e` into the arcs
//! `(u, w_e)` with capacity `x_e` and `(w_e, v)` with capacity `1 - x_e`.
//! Every `w_e` is odd, and a graph node is odd when it is the second
//! endpoint of an odd number of edges. A violated blossom is exactly an odd
//! cut of capacity below one; the minimum odd cut is a fundamental cut of a
//! Gomory-Hu tree, so scanning the tree finds every candidate.
//!
//! The graph nodes on the cut side form the handle; its teeth are the edges whose
//! `(w_e, v)` arc is cut.

use rand::seq::SliceRandom;

use super::blossom::{blossom_slack, boundary_edges, teeth_disjoint, EmittedBlossoms};
use super::flow::{FlowNetwork, GomoryHuTree};
use super::{SepRng, SeparationOracle};
use crate::cuts::{CutStore, CutStoreBuilder};
use crate::error::{SepError, SepResult};
use crate::model::{FractionalSolution, Graph};
use crate::settings::OracleSettings;

const NAME: &str = "exact blossom";

/// Edge-split auxiliary network with its odd-node marking.
struct SplitNetwork {
    net: FlowNetwork,
    odd: Vec<bool>,
    /// Clamped edge values used as capacities.
    caps: Vec<f64>,
}

impl SplitNetwork {
    fn build(graph: &Graph, x: &FractionalSolution) -> SepResult<Self> {
        let n = graph.node_count();
        let m = graph.edge_count();
        let mut net = FlowNetwork::new(n + m);
        let mut odd = vec![false; n + m];
        let mut caps = Vec::with_capacity(m);

        for (e, &(u, v)) in graph.edges().iter().enumerate() {
            // Values outside [0, 1] would give negative capacities.
            let xe = x.get(e).clamp(0.0, 1.0);
            let w = n + e;
            net.add_edge(u, w, xe)?;
            net.add_edge(w, v, 1.0 - xe)?;
            odd[w] = true;
            odd[v] = !odd[v];
            caps.push(xe);
        }

        Ok(Self { net, odd, caps })
    }

    /// Capacity of the cut `side` in the split network.
    fn cut_value(&self, graph: &Graph, side: &[bool]) -> f64 {
        let n = graph.node_count();
        graph
            .edges()
            .iter()
            .enumerate()
            .map(|(e, &(u, v))| {
                let w = n + e;
                let mut value = 0.0;
                if side[u] != side[w] {
                    value += self.caps[e];
                }
                if side[w] != side[v] {
                    value += 1.0 - self.caps[e];
                }
                value
            })
            .sum()
    }
}

/// Padberg-Rao minimum odd cut separation.
#[derive(Debug, Clone, Default)]
pub struct ExactBlossom {
    settings: OracleSettings,
}

impl ExactBlossom {
    /// Create the oracle.
    pub fn new(settings: OracleSettings) -> Self {
        Self { settings }
    }
}

impl SeparationOracle for ExactBlossom {
    fn name(&self) -> &'static str {
        NAME
    }

    fn separate(
        &mut self,
        graph: &Graph,
        x: &FractionalSolution,
        rng: Option<&mut SepRng>,
    ) -> SepResult<CutStore> {
        let rng = rng.ok_or_else(|| SepError::oracle(NAME, "no random state supplied"))?;
        x.validate(graph)
            .map_err(|e| SepError::oracle(NAME, e.to_string()))?;

        let n = graph.node_count();
        let m = graph.edge_count();
        let threshold = 1.0 - self.settings.violation_tol;

        let mut split =
            SplitNetwork::build(graph, x).map_err(|e| SepError::oracle(NAME, e.to_string()))?;

        let mut order: Vec<usize> = (0..n + m).collect();
        order.shuffle(rng);
        let tree = GomoryHuTree::build(&mut split.net, &order)
            .map_err(|e| SepError::oracle(NAME, e.to_string()))?;
        let odd_below = tree.subtree_counts(&split.odd);

        let mut builder = CutStoreBuilder::new(NAME);
        let mut emitted = EmittedBlossoms::default();

        for v in 0..n + m {
            if builder.len() >= self.settings.max_cuts_per_call {
                break;
            }
            if v == tree.root() || odd_below[v] % 2 == 0 || tree.weight(v) >= threshold {
                continue;
            }

            let side = tree.subtree_mask(v);
            if split.cut_value(graph, &side) >= threshold {
                continue;
            }

            let handle: Vec<usize> = (0..n).filter(|&u| side[u]).collect();
            if handle.is_empty() || handle.len() == n {
                continue;
            }

            let teeth: Vec<usize> = graph
                .edges()
                .iter()
                .enumerate()
                .filter(|&(e, &(_, b))| side[n + e] != side[b])
                .map(|(e, _)| e)
                .collect();

            let in_handle: Vec<bool> = side[..n].to_vec();
            let boundary = boundary_edges(graph, &in_handle);
            if teeth.len() % 2 == 0
                || !teeth.iter().all(|e| boundary.contains(e))
                || !teeth_disjoint(graph, &teeth)
            {
                continue;
            }

            let slack = blossom_slack(x, &boundary, &teeth);
            emitted
                .push(&mut builder, graph, &handle, &teeth, slack)
                .map_err(|e| SepError::oracle(NAME, e.to_string()))?;
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{CombVerifier, Verdict};
    use rand::SeedableRng;

    fn triangles(tooth: f64) -> (Graph, FractionalSolution) {
        let graph = Graph::new(
            6,
            vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (0, 3), (1, 4), (2, 5)],
        )
        .unwrap();
        let side = 1.0 - tooth / 2.0;
        let x = FractionalSolution::new(vec![side, side, side, side, side, side, tooth, tooth, tooth]);
        (graph, x)
    }

    #[test]
    fn test_requires_random_state() {
        let (graph, x) = triangles(1.0);
        let err = ExactBlossom::default().separate(&graph, &x, None).unwrap_err();
        assert!(matches!(err, SepError::OracleFailure { oracle: NAME, .. }));
    }

    #[test]
    fn test_finds_triangle_blossoms() {
        for tooth in [1.0, 0.9, 0.7] {
            let (graph, x) = triangles(tooth);
            let mut rng = SepRng::seed_from_u64(12345);
            let store = ExactBlossom::default()
                .separate(&graph, &x, Some(&mut rng))
                .unwrap();
            assert!(!store.is_empty(), "no blossom for tooth value {}", tooth);

            let verifier = CombVerifier::new(&graph, &x).unwrap();
            for cut in store.iter() {
                assert_eq!(cut.tooth_count(), 3);
                let (_, verdict) = verifier.verdict(&cut).unwrap();
                assert_eq!(verdict, Verdict::Violated);
            }
        }
    }

    #[test]
    fn test_integral_cycle_has_no_blossoms() {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 5]);
        let mut rng = SepRng::seed_from_u64(7);
        let store = ExactBlossom::default()
            .separate(&graph, &x, Some(&mut rng))
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_consumes_random_state() {
        use rand::RngCore;

        let (graph, x) = triangles(0.9);
        let mut used = SepRng::seed_from_u64(1);
        let mut fresh = SepRng::seed_from_u64(1);
        ExactBlossom::default()
            .separate(&graph, &x, Some(&mut used))
            .unwrap();
        assert_ne!(used.next_u64(), fresh.next_u64());
    }
}
