//! Fast blossom heuristic.
//!
//! Handles are the connected components of the strictly fractional support
//! graph. The teeth of a handle are its near-integral boundary edges; an odd,
//! node-disjoint tooth set whose blossom slack is below one is emitted.

use super::blossom::{
    blossom_slack, boundary_edges, components, membership, teeth_disjoint, EmittedBlossoms,
};
use super::{SepRng, SeparationOracle};
use crate::cuts::{CutStore, CutStoreBuilder};
use crate::error::{SepError, SepResult};
use crate::model::{FractionalSolution, Graph};
use crate::settings::OracleSettings;

const NAME: &str = "fast blossom";

/// Padberg-Hong style component heuristic.
#[derive(Debug, Clone, Default)]
pub struct FastBlossom {
    settings: OracleSettings,
}

impl FastBlossom {
    /// Create the oracle.
    pub fn new(settings: OracleSettings) -> Self {
        Self { settings }
    }
}

impl SeparationOracle for FastBlossom {
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

        let eps = self.settings.eps;
        let n = graph.node_count();
        let mut builder = CutStoreBuilder::new(NAME);
        let mut emitted = EmittedBlossoms::default();

        let handles = components(graph, |e| {
            let v = x.get(e);
            v > eps && v < 1.0 - eps
        });

        for handle in handles {
            if builder.len() >= self.settings.max_cuts_per_call {
                break;
            }

            let in_handle = membership(n, &handle);
            let boundary = boundary_edges(graph, &in_handle);
            let teeth: Vec<usize> = boundary
                .iter()
                .copied()
                .filter(|&e| x.get(e) >= 1.0 - eps)
                .collect();

            if teeth.len() % 2 == 0 || !teeth_disjoint(graph, &teeth) {
                continue;
            }

            let slack = blossom_slack(x, &boundary, &teeth);
            if slack < 1.0 - self.settings.violation_tol {
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
    use crate::cuts::Interval;

    fn two_triangles() -> (Graph, FractionalSolution) {
        let graph = Graph::new(
            6,
            vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (0, 3), (1, 4), (2, 5)],
        )
        .unwrap();
        let x = FractionalSolution::new(vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]);
        (graph, x)
    }

    #[test]
    fn test_finds_two_triangle_blossoms() {
        let (graph, x) = two_triangles();
        let store = FastBlossom::default().separate(&graph, &x, None).unwrap();
        assert_eq!(store.len(), 2);

        let first = store.get(0).unwrap();
        assert_eq!(first.handle().unwrap().intervals(), &[Interval::new(0, 2)]);
        assert_eq!(first.tooth_count(), 3);
        assert_eq!(first.oracle_slack(), Some(0.0));
    }

    #[test]
    fn test_integral_cycle_has_no_blossoms() {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 5]);
        let store = FastBlossom::default().separate(&graph, &x, None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_length_mismatch_is_oracle_failure() {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 4]);
        let err = FastBlossom::default().separate(&graph, &x, None).unwrap_err();
        assert!(matches!(err, SepError::OracleFailure { oracle: NAME, .. }));
    }
}
