//! Grötschel-Holland blossom heuristic.
//!
//! Candidate handles come from the support graph with its heavy edges
//! removed, for a ladder of heaviness thresholds, plus every single node.
//! For a fixed handle the best odd tooth set is found exactly: take every
//! boundary edge with `x_e > 1/2`, and if that count is even flip the
//! boundary edge whose value is closest to `1/2`.

use std::collections::BTreeSet;

use super::blossom::{
    boundary_edges, components, membership, teeth_disjoint, EmittedBlossoms,
};
use super::{SepRng, SeparationOracle};
use crate::cuts::{CutStore, CutStoreBuilder};
use crate::error::{SepError, SepResult};
use crate::model::{FractionalSolution, Graph};
use crate::settings::OracleSettings;

const NAME: &str = "groetschel-holland blossom";

/// Edges at or above a threshold are treated as tooth candidates and cut
/// out of the support graph before taking components.
const HEAVY_THRESHOLDS: [f64; 4] = [0.9, 0.75, 0.6, 0.5];

/// Best odd tooth set for a fixed handle.
///
/// Returns the sorted teeth and the blossom slack, or `None` when the handle
/// has no boundary.
pub(crate) fn best_odd_teeth(x: &FractionalSolution, boundary: &[usize]) -> Option<(Vec<usize>, f64)> {
    if boundary.is_empty() {
        return None;
    }

    let mut teeth: Vec<usize> = Vec::new();
    let mut slack = 0.0;
    for &e in boundary {
        let v = x.get(e);
        if v > 0.5 {
            teeth.push(e);
            slack += 1.0 - v;
        } else {
            slack += v;
        }
    }

    if teeth.len() % 2 == 0 {
        let flip = boundary
            .iter()
            .copied()
            .min_by(|&a, &b| {
                let da = (1.0 - 2.0 * x.get(a)).abs();
                let db = (1.0 - 2.0 * x.get(b)).abs();
                da.total_cmp(&db)
            })?;
        slack += (1.0 - 2.0 * x.get(flip)).abs();
        match teeth.iter().position(|&e| e == flip) {
            Some(pos) => {
                teeth.remove(pos);
            }
            None => {
                teeth.push(flip);
                teeth.sort_unstable();
            }
        }
    }

    Some((teeth, slack))
}

/// Exact-per-handle blossom heuristic over a family of candidate handles.
#[derive(Debug, Clone, Default)]
pub struct GroetschelHollandBlossom {
    settings: OracleSettings,
}

impl GroetschelHollandBlossom {
    /// Create the oracle.
    pub fn new(settings: OracleSettings) -> Self {
        Self { settings }
    }

    fn candidate_handles(&self, graph: &Graph, x: &FractionalSolution) -> Vec<Vec<usize>> {
        let eps = self.settings.eps;
        let n = graph.node_count();
        let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
        let mut handles = Vec::new();

        let mut add = |h: Vec<usize>| {
            if h.len() < n && seen.insert(h.clone()) {
                handles.push(h);
            }
        };

        // Strictly fractional components first, as the fast heuristic sees them.
        for comp in components(graph, |e| {
            let v = x.get(e);
            v > eps && v < 1.0 - eps
        }) {
            add(comp);
        }

        for &theta in &HEAVY_THRESHOLDS {
            for comp in components(graph, |e| {
                let v = x.get(e);
                v > eps && v < theta
            }) {
                add(comp);
            }
        }

        for v in 0..n {
            add(vec![v]);
        }

        handles
    }
}

impl SeparationOracle for GroetschelHollandBlossom {
    fn name(&self) -> &'static str {
        NAME
    }

    fn separate(
        &mut self,
        graph: &Graph,
        x: &FractionalSolution,
        _rng: Option<&mut SepRng>,
    ) -> SepResult<CutStore> {
        x.validate(graph)
            .map_err(|e| SepError::oracle(NAME, e.to_string()))?;

        let n = graph.node_count();
        let mut builder = CutStoreBuilder::new(NAME);
        let mut emitted = EmittedBlossoms::default();

        for handle in self.candidate_handles(graph, x) {
            if builder.len() >= self.settings.max_cuts_per_call {
                break;
            }

            let in_handle = membership(n, &handle);
            let boundary = boundary_edges(graph, &in_handle);
            let Some((teeth, slack)) = best_odd_teeth(x, &boundary) else {
                continue;
            };

            if slack < 1.0 - self.settings.violation_tol && teeth_disjoint(graph, &teeth) {
                emitted
                    .push(&mut builder, graph, &handle, &teeth, slack)
                    .map_err(|e| SepError::oracle(NAME, e.to_string()))?;
            }
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FastBlossom;

    /// Two triangles joined by a perfect matching with heavy but
    /// non-integral matching edges.
    fn soft_triangles() -> (Graph, FractionalSolution) {
        let graph = Graph::new(
            6,
            vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (0, 3), (1, 4), (2, 5)],
        )
        .unwrap();
        let x = FractionalSolution::new(vec![0.55, 0.55, 0.55, 0.55, 0.55, 0.55, 0.9, 0.9, 0.9]);
        (graph, x)
    }

    #[test]
    fn test_best_odd_teeth() {
        let boundary = [0, 1, 2];

        // Two heavy edges: flip the one nearest 1/2
        let x = FractionalSolution::new(vec![0.9, 0.6, 0.1]);
        let (teeth, slack) = best_odd_teeth(&x, &boundary).unwrap();
        assert_eq!(teeth, vec![0]);
        assert!((slack - (0.1 + 0.6 + 0.1)).abs() < 1e-12);

        // Zero heavy edges: add the lightest-cost flip
        let x = FractionalSolution::new(vec![0.2, 0.45, 0.1]);
        let (teeth, slack) = best_odd_teeth(&x, &boundary).unwrap();
        assert_eq!(teeth, vec![1]);
        assert!((slack - (0.2 + 0.55 + 0.1)).abs() < 1e-12);

        assert!(best_odd_teeth(&x, &[]).is_none());
    }

    #[test]
    fn test_finds_what_fast_misses() {
        let (graph, x) = soft_triangles();

        let fast = FastBlossom::default().separate(&graph, &x, None).unwrap();
        assert!(fast.is_empty());

        let store = GroetschelHollandBlossom::default()
            .separate(&graph, &x, None)
            .unwrap();
        assert_eq!(store.len(), 2);
        for cut in store.iter() {
            assert_eq!(cut.tooth_count(), 3);
            let slack = cut.oracle_slack().unwrap();
            assert!((slack - 0.3).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_nodes_of_integral_cycle() {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 5]);
        let store = GroetschelHollandBlossom::default()
            .separate(&graph, &x, None)
            .unwrap();
        assert!(store.is_empty());
    }
}
