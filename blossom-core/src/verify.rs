//! Independent comb inequality verification.
//!
//! For a comb with handle `H` and teeth `T_1..T_k` the inequality is
//!
//! ```text
//! x(δ(H)) + Σ_j x(δ(T_j)) >= 3k + 1
//! ```
//!
//! The verifier recomputes both sides from the graph and fractional values
//! without looking at anything the oracle computed.

use std::fmt;

use crate::cuts::{CliqueRef, CutRef, CutStore, Interval};
use crate::error::{MalformedCut, SepError, SepResult};
use crate::model::{FractionalSolution, Graph};
use crate::oracle::OracleStage;

/// Outcome of checking one cut.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// `LHS >= RHS`.
    Satisfied,

    /// `LHS < RHS`.
    Violated,

    /// The cut was rejected before evaluation.
    Malformed(MalformedCut),
}

impl Verdict {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Satisfied => "satisfied",
            Verdict::Violated => "violated",
            Verdict::Malformed(_) => "malformed",
        }
    }
}

/// Recomputed sides of a comb inequality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombEvaluation {
    /// x(δ(H)).
    pub delta_handle: f64,

    /// Σ_j x(δ(T_j)).
    pub delta_teeth: f64,

    /// Number of teeth.
    pub tooth_count: usize,
}

impl CombEvaluation {
    /// Left-hand side.
    pub fn lhs(&self) -> f64 {
        self.delta_handle + self.delta_teeth
    }

    /// Right-hand side, `3T + 1`.
    pub fn rhs(&self) -> f64 {
        (3 * self.tooth_count + 1) as f64
    }

    /// `LHS - RHS`; negative when violated.
    pub fn margin(&self) -> f64 {
        self.lhs() - self.rhs()
    }

    /// Strict comparison, no tolerance.
    pub fn is_violated(&self) -> bool {
        self.lhs() < self.rhs()
    }

    /// Verdict for this evaluation.
    pub fn verdict(&self) -> Verdict {
        if self.is_violated() {
            Verdict::Violated
        } else {
            Verdict::Satisfied
        }
    }
}

/// Check that a cut can be evaluated.
///
/// A cut with any negative or inverted interval is rejected as a whole.
pub fn check_shape(cut: &CutRef<'_>) -> Result<(), MalformedCut> {
    if cut.clique_count() == 0 {
        return Err(MalformedCut::NoCliques);
    }
    for (clique, c) in cut.cliques().enumerate() {
        if c.segcount() == 0 {
            return Err(MalformedCut::EmptyClique { clique });
        }
        for iv in c.intervals() {
            if iv.has_negative_bound() {
                return Err(MalformedCut::NegativeBound {
                    clique,
                    lo: iv.lo,
                    hi: iv.hi,
                });
            }
            if iv.lo > iv.hi {
                return Err(MalformedCut::InvertedInterval {
                    clique,
                    lo: iv.lo,
                    hi: iv.hi,
                });
            }
        }
    }
    Ok(())
}

/// Verification record for one cut.
#[derive(Debug, Clone)]
pub struct CutReport {
    /// Oracle stage that produced the cut.
    pub stage: OracleStage,

    /// Outer round (1-based).
    pub round: usize,

    /// Inner pass within the round (1-based).
    pub pass: usize,

    /// Index within its cut store.
    pub index: usize,

    /// Handle intervals (empty for a cut without cliques).
    pub handle: Vec<Interval>,

    /// Intervals of each tooth.
    pub teeth: Vec<Vec<Interval>>,

    /// Recomputed inequality, absent for malformed cuts.
    pub evaluation: Option<CombEvaluation>,

    /// Verdict.
    pub verdict: Verdict,
}

impl CutReport {
    /// Left-hand side, if evaluated.
    pub fn lhs(&self) -> Option<f64> {
        self.evaluation.map(|e| e.lhs())
    }

    /// Right-hand side, if evaluated.
    pub fn rhs(&self) -> Option<f64> {
        self.evaluation.map(|e| e.rhs())
    }

    /// `LHS - RHS`, if evaluated.
    pub fn margin(&self) -> Option<f64> {
        self.evaluation.map(|e| e.margin())
    }

    /// Check if the cut was found violated.
    pub fn is_violated(&self) -> bool {
        self.verdict == Verdict::Violated
    }
}

fn write_clique(f: &mut fmt::Formatter<'_>, intervals: &[Interval]) -> fmt::Result {
    // Negative bounds are left out of the display only.
    let mut first = true;
    for iv in intervals.iter().filter(|iv| !iv.has_negative_bound()) {
        if !first {
            write!(f, " ")?;
        }
        write!(f, "{}", iv)?;
        first = false;
    }
    Ok(())
}

impl fmt::Display for CutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} r{} p{} #{}] handle: ",
            self.stage, self.round, self.pass, self.index
        )?;
        write_clique(f, &self.handle)?;
        for (j, tooth) in self.teeth.iter().enumerate() {
            write!(f, " | tooth {}: ", j + 1)?;
            write_clique(f, tooth)?;
        }
        match (&self.verdict, self.evaluation) {
            (Verdict::Malformed(reason), _) => write!(f, " => malformed ({})", reason),
            (verdict, Some(eval)) => write!(
                f,
                " => LHS {:.6} RHS {:.0} margin {:+.6} {}",
                eval.lhs(),
                eval.rhs(),
                eval.margin(),
                verdict.label()
            ),
            (verdict, None) => write!(f, " => {}", verdict.label()),
        }
    }
}

/// Tally of verdicts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSummary {
    /// Cuts found satisfied.
    pub satisfied: usize,

    /// Cuts found violated.
    pub violated: usize,

    /// Cuts rejected as malformed.
    pub malformed: usize,
}

impl VerificationSummary {
    /// Count one verdict.
    pub fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Satisfied => self.satisfied += 1,
            Verdict::Violated => self.violated += 1,
            Verdict::Malformed(_) => self.malformed += 1,
        }
    }

    /// Total cuts checked.
    pub fn total(&self) -> usize {
        self.satisfied + self.violated + self.malformed
    }
}

/// Recomputes comb inequalities for cuts against one graph and solution.
#[derive(Debug, Clone, Copy)]
pub struct CombVerifier<'a> {
    graph: &'a Graph,
    x: &'a FractionalSolution,
}

impl<'a> CombVerifier<'a> {
    /// Create a verifier; the solution must match the graph.
    pub fn new(graph: &'a Graph, x: &'a FractionalSolution) -> SepResult<Self> {
        x.validate(graph)?;
        Ok(Self { graph, x })
    }

    /// Recompute both sides of the comb inequality for `cut`.
    pub fn evaluate(&self, cut: &CutRef<'_>) -> SepResult<CombEvaluation> {
        check_shape(cut)?;

        let n = self.graph.node_count();
        let cliques: Vec<CliqueRef<'_>> = cut.cliques().collect();
        let mut delta_handle = 0.0;
        let mut delta_teeth = 0.0;

        for (e, &(u, v)) in self.graph.edges().iter().enumerate() {
            debug_assert!(u < n && v < n, "edge {} = ({}, {}) outside [0, {})", e, u, v, n);
            let xe = self.x.get(e);
            for (t, clique) in cliques.iter().enumerate() {
                if !clique.crosses(u, v) {
                    continue;
                }
                if t == 0 {
                    delta_handle += xe;
                } else {
                    delta_teeth += xe;
                }
            }
        }

        Ok(CombEvaluation {
            delta_handle,
            delta_teeth,
            tooth_count: cut.tooth_count(),
        })
    }

    /// Verdict for `cut`; malformed cuts become a verdict, not an error.
    pub fn verdict(&self, cut: &CutRef<'_>) -> SepResult<(Option<CombEvaluation>, Verdict)> {
        match self.evaluate(cut) {
            Ok(eval) => Ok((Some(eval), eval.verdict())),
            Err(SepError::MalformedCut(reason)) => Ok((None, Verdict::Malformed(reason))),
            Err(e) => Err(e),
        }
    }

    /// Build the full report for `cut`.
    pub fn report(
        &self,
        cut: &CutRef<'_>,
        stage: OracleStage,
        round: usize,
        pass: usize,
    ) -> SepResult<CutReport> {
        let (evaluation, verdict) = self.verdict(cut)?;
        if let Verdict::Malformed(reason) = &verdict {
            log::warn!("{} cut #{} skipped: {}", stage, cut.index(), reason);
        }

        Ok(CutReport {
            stage,
            round,
            pass,
            index: cut.index(),
            handle: cut
                .handle()
                .map(|h| h.intervals().to_vec())
                .unwrap_or_default(),
            teeth: cut.teeth().map(|t| t.intervals().to_vec()).collect(),
            evaluation,
            verdict,
        })
    }

    /// Report every cut of `store`, in store order. The store is only read.
    pub fn verify_store(
        &self,
        store: &CutStore,
        stage: OracleStage,
        round: usize,
        pass: usize,
    ) -> SepResult<Vec<CutReport>> {
        store
            .iter()
            .map(|cut| self.report(&cut, stage, round, pass))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::CutStoreBuilder;

    fn verifier_fixture() -> (Graph, FractionalSolution) {
        // Path 0-1-2-3-4 plus chord (1,3)
        let graph = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4), (1, 3)]).unwrap();
        let x = FractionalSolution::new(vec![1.0, 0.5, 0.5, 1.0, 0.25]);
        (graph, x)
    }

    #[test]
    fn test_inequality_arithmetic() {
        let eval = CombEvaluation {
            delta_handle: 1.0,
            delta_teeth: 2.5,
            tooth_count: 1,
        };
        assert_eq!(eval.lhs(), 3.5);
        assert_eq!(eval.rhs(), 4.0);
        assert!(eval.is_violated());
        assert_eq!(eval.margin(), -0.5);
    }

    #[test]
    fn test_strict_comparison() {
        let eval = CombEvaluation {
            delta_handle: 2.0,
            delta_teeth: 2.0,
            tooth_count: 1,
        };
        assert_eq!(eval.verdict(), Verdict::Satisfied);
    }

    #[test]
    fn test_evaluate_boundary_sums() {
        let (graph, x) = verifier_fixture();
        let verifier = CombVerifier::new(&graph, &x).unwrap();

        let mut builder = CutStoreBuilder::new("test");
        builder.push_cut(&[vec![Interval::new(0, 2)], vec![Interval::new(2, 4)]], None);
        let store = builder.build();
        let cut = store.get(0).unwrap();

        let eval = verifier.evaluate(&cut).unwrap();
        // Handle {0,1,2}: crossing edges (2,3)=0.5 and (1,3)=0.25
        assert!((eval.delta_handle - 0.75).abs() < 1e-12);
        // Tooth {2,3,4}: crossing edges (1,2)=0.5 and (1,3)=0.25
        assert!((eval.delta_teeth - 0.75).abs() < 1e-12);
        assert_eq!(eval.verdict(), Verdict::Violated);
    }

    #[test]
    fn test_malformed_cuts() {
        let (graph, x) = verifier_fixture();
        let verifier = CombVerifier::new(&graph, &x).unwrap();

        let mut builder = CutStoreBuilder::new("test");
        builder.finish_cut(None);
        builder.push_cut(&[vec![Interval::new(0, 1)], vec![]], None);
        builder.push_cut(&[vec![Interval::new(-1, 1)]], None);
        builder.push_cut(&[vec![Interval::new(3, 1)]], None);
        let store = builder.build();

        let reports = verifier
            .verify_store(&store, OracleStage::Fast, 1, 1)
            .unwrap();
        let verdicts: Vec<Verdict> = reports.iter().map(|r| r.verdict.clone()).collect();
        assert_eq!(
            verdicts,
            vec![
                Verdict::Malformed(MalformedCut::NoCliques),
                Verdict::Malformed(MalformedCut::EmptyClique { clique: 1 }),
                Verdict::Malformed(MalformedCut::NegativeBound {
                    clique: 0,
                    lo: -1,
                    hi: 1
                }),
                Verdict::Malformed(MalformedCut::InvertedInterval {
                    clique: 0,
                    lo: 3,
                    hi: 1
                }),
            ]
        );
        assert!(reports.iter().all(|r| r.evaluation.is_none()));
    }

    #[test]
    fn test_report_display_skips_negative_intervals() {
        let report = CutReport {
            stage: OracleStage::Exact,
            round: 1,
            pass: 2,
            index: 0,
            handle: vec![Interval::new(-3, -1), Interval::new(0, 2)],
            teeth: vec![vec![Interval::new(3, 4)]],
            evaluation: None,
            verdict: Verdict::Malformed(MalformedCut::NegativeBound {
                clique: 0,
                lo: -3,
                hi: -1,
            }),
        };
        let text = report.to_string();
        assert!(text.contains("handle: [0, 2] |"));
        assert!(!text.contains("[-3, -1] |"));
        assert!(text.contains("malformed"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = VerificationSummary::default();
        summary.record(&Verdict::Violated);
        summary.record(&Verdict::Violated);
        summary.record(&Verdict::Satisfied);
        summary.record(&Verdict::Malformed(MalformedCut::NoCliques));
        assert_eq!(summary.violated, 2);
        assert_eq!(summary.total(), 4);
    }
}
