//! Convergence controller for the separation loop.
//!
//! One pass calls the fast, strong and exact oracles in that order. Each
//! oracle's cut store is verified and released before the next oracle runs.
//! The inner loop repeats passes until a pass finds nothing or the inner cap
//! is hit; the outer loop bounds the number of inner loops.

use std::time::Instant;

use crate::error::{SepError, SepResult};
use crate::model::{validate_input, FractionalSolution, Graph, RunState, RunStats, SeparationOutcome};
use crate::oracle::{OracleSet, OracleStage, SepRng};
use crate::settings::SeparationSettings;
use crate::verify::{CombVerifier, CutReport, VerificationSummary};

/// Drives separation passes to a fixed point within a bounded budget.
pub struct ConvergenceController {
    /// Oracles, one per stage.
    oracles: OracleSet,

    /// Current state.
    state: RunState,

    /// Reports collected so far.
    reports: Vec<CutReport>,

    /// Verdict tallies.
    summary: VerificationSummary,

    /// Counters.
    stats: RunStats,

    /// Start time.
    start_time: Option<Instant>,

    /// Settings.
    settings: SeparationSettings,
}

impl ConvergenceController {
    /// Create a controller over arbitrary oracles.
    pub fn new(oracles: OracleSet, settings: SeparationSettings) -> Self {
        Self {
            oracles,
            state: RunState::Running,
            reports: Vec::new(),
            summary: VerificationSummary::default(),
            stats: RunStats::default(),
            start_time: None,
            settings,
        }
    }

    /// Create a controller over the built-in blossom oracles.
    pub fn standard(settings: SeparationSettings) -> Self {
        let oracles = OracleSet::standard(&settings.oracle);
        Self::new(oracles, settings)
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Settings in use.
    pub fn settings(&self) -> &SeparationSettings {
        &self.settings
    }

    /// Run separation on `graph` and `x` until convergence, budget
    /// exhaustion, or oracle failure.
    ///
    /// Invalid input is returned as an error before any oracle runs. An
    /// oracle failure ends the run in [`RunState::Failed`] with the error
    /// recorded in the outcome.
    pub fn run(
        &mut self,
        graph: &Graph,
        x: &FractionalSolution,
        rng: &mut SepRng,
    ) -> SepResult<SeparationOutcome> {
        validate_input(graph, x)?;
        if self.settings.outer_limit == 0 || self.settings.max_inner_passes == 0 {
            return Err(SepError::InvalidInput(format!(
                "outer_limit ({}) and max_inner_passes ({}) must be positive",
                self.settings.outer_limit, self.settings.max_inner_passes
            )));
        }
        let degree_excess = x.max_degree_excess(graph);
        if degree_excess > self.settings.oracle.eps {
            log::debug!("Degree bound exceeded by up to {:.3e}", degree_excess);
        }

        let verifier = CombVerifier::new(graph, x)?;
        self.reset();

        let state = loop {
            self.stats.rounds += 1;
            let round = self.stats.rounds;

            let mut drained = false;
            for pass in 1..=self.settings.max_inner_passes {
                match self.run_pass(&verifier, graph, x, rng, round, pass) {
                    Ok(0) => {
                        drained = true;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Separation failed in round {} pass {}: {}", round, pass, e);
                        return Ok(self.finish(RunState::Failed, Some(e)));
                    }
                }
            }

            if drained {
                break RunState::Converged;
            }
            if round >= self.settings.outer_limit {
                break RunState::BudgetExhausted;
            }
        };

        Ok(self.finish(state, None))
    }

    /// One pass over the three oracles. Returns the number of cuts found.
    fn run_pass(
        &mut self,
        verifier: &CombVerifier<'_>,
        graph: &Graph,
        x: &FractionalSolution,
        rng: &mut SepRng,
        round: usize,
        pass: usize,
    ) -> SepResult<usize> {
        self.stats.passes += 1;
        let mut cuts_this_pass = 0;

        for stage in OracleStage::ORDER {
            let oracle = self.oracles.get_mut(stage);
            let name = oracle.name();
            let stage_rng = if stage.takes_random_state() {
                Some(&mut *rng)
            } else {
                None
            };

            let store = oracle.separate(graph, x, stage_rng).map_err(|e| match e {
                SepError::OracleFailure { .. } => e,
                other => SepError::oracle(name, other.to_string()),
            })?;
            self.stats.oracle_calls += 1;

            let count = store.len();
            if self.settings.verbose {
                log::info!("Found {} {} cuts", count, name);
            } else {
                log::debug!("Found {} {} cuts", count, name);
            }

            let verified = verifier.verify_store(&store, stage, round, pass);
            self.stats.cuts_released += store.release();
            self.stats.stores_released += 1;

            for report in verified? {
                self.summary.record(&report.verdict);
                if self.settings.keep_reports {
                    self.reports.push(report);
                }
            }

            self.stats.cuts_by_stage[stage.index()] += count;
            cuts_this_pass += count;
        }

        Ok(cuts_this_pass)
    }

    fn reset(&mut self) {
        self.state = RunState::Running;
        self.reports.clear();
        self.summary = VerificationSummary::default();
        self.stats = RunStats::default();
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time in milliseconds.
    fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn finish(&mut self, state: RunState, error: Option<SepError>) -> SeparationOutcome {
        self.state = state;
        self.stats.elapsed_ms = self.elapsed_ms();

        if self.settings.verbose {
            log::info!(
                "{:?} after {} rounds, {} passes | cuts: {} | violated: {} satisfied: {} malformed: {} | {:.1}s",
                state,
                self.stats.rounds,
                self.stats.passes,
                self.stats.total_cuts(),
                self.summary.violated,
                self.summary.satisfied,
                self.summary.malformed,
                self.stats.elapsed_ms as f64 / 1000.0,
            );
        }

        SeparationOutcome {
            state,
            reports: std::mem::take(&mut self.reports),
            summary: self.summary,
            stats: self.stats.clone(),
            error,
        }
    }
}

/// Run the built-in oracles to a fixed point.
///
/// `rng` is usually seeded from `settings.seed`.
pub fn separate_blossoms(
    graph: &Graph,
    x: &FractionalSolution,
    rng: &mut SepRng,
    settings: &SeparationSettings,
) -> SepResult<SeparationOutcome> {
    ConvergenceController::standard(settings.clone()).run(graph, x, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::{CutStore, CutStoreBuilder, Interval};
    use crate::oracle::SeparationOracle;
    use rand::SeedableRng;

    /// Oracle that returns a fixed number of one-tooth cuts per call.
    struct Constant(usize);

    impl SeparationOracle for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn separate(
            &mut self,
            _graph: &Graph,
            _x: &FractionalSolution,
            _rng: Option<&mut SepRng>,
        ) -> SepResult<CutStore> {
            let mut builder = CutStoreBuilder::new("constant");
            for _ in 0..self.0 {
                builder.push_cut(&[vec![Interval::new(0, 1)], vec![Interval::new(1, 2)]], None);
            }
            Ok(builder.build())
        }
    }

    fn controller(fast: usize, strong: usize, exact: usize, settings: SeparationSettings) -> ConvergenceController {
        let oracles = OracleSet::new(
            Box::new(Constant(fast)),
            Box::new(Constant(strong)),
            Box::new(Constant(exact)),
        );
        ConvergenceController::new(oracles, settings)
    }

    fn cycle5() -> (Graph, FractionalSolution) {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 5]);
        (graph, x)
    }

    #[test]
    fn test_converges_when_nothing_found() {
        let (graph, x) = cycle5();
        let mut rng = SepRng::seed_from_u64(0);
        let mut ctl = controller(0, 0, 0, SeparationSettings::default().with_outer_limit(5));

        let outcome = ctl.run(&graph, &x, &mut rng).unwrap();
        assert_eq!(outcome.state, RunState::Converged);
        assert_eq!(ctl.state(), RunState::Converged);
        assert_eq!(outcome.stats.rounds, 1);
        assert_eq!(outcome.stats.passes, 1);
        assert_eq!(outcome.stats.oracle_calls, 3);
        assert_eq!(outcome.stats.stores_released, 3);
    }

    #[test]
    fn test_budget_exhausted() {
        let (graph, x) = cycle5();
        let mut rng = SepRng::seed_from_u64(0);
        let settings = SeparationSettings::default()
            .with_outer_limit(3)
            .with_max_inner_passes(2);
        let mut ctl = controller(1, 0, 0, settings);

        let outcome = ctl.run(&graph, &x, &mut rng).unwrap();
        assert_eq!(outcome.state, RunState::BudgetExhausted);
        assert_eq!(outcome.stats.rounds, 3);
        assert_eq!(outcome.stats.passes, 6);
        assert_eq!(outcome.stats.cuts_for(OracleStage::Fast), 6);
        assert_eq!(outcome.stats.cuts_released, 6);
        assert_eq!(outcome.reports.len(), 6);
    }

    #[test]
    fn test_reports_follow_stage_order() {
        let (graph, x) = cycle5();
        let mut rng = SepRng::seed_from_u64(0);
        let settings = SeparationSettings::default().with_max_inner_passes(1);
        let mut ctl = controller(1, 2, 1, settings);

        let outcome = ctl.run(&graph, &x, &mut rng).unwrap();
        let stages: Vec<OracleStage> = outcome.reports.iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![OracleStage::Fast, OracleStage::Strong, OracleStage::Strong, OracleStage::Exact]
        );
        // Handle {0,1}, tooth {1,2} on a unit cycle: 2 + 2 = 4 >= 4
        assert!(outcome.reports.iter().all(|r| r.lhs() == Some(4.0)));
        assert_eq!(outcome.summary.satisfied, 4);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let graph = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 3]);
        let mut rng = SepRng::seed_from_u64(0);
        let mut ctl = controller(0, 0, 0, SeparationSettings::default());
        assert!(matches!(
            ctl.run(&graph, &x, &mut rng),
            Err(SepError::InvalidInput(_))
        ));
        assert_eq!(ctl.state(), RunState::Running);

        let (graph, x) = cycle5();
        let mut ctl = controller(0, 0, 0, SeparationSettings::default().with_outer_limit(0));
        assert!(ctl.run(&graph, &x, &mut rng).is_err());
    }

    #[test]
    fn test_keep_reports_off() {
        let (graph, x) = cycle5();
        let mut rng = SepRng::seed_from_u64(0);
        let mut settings = SeparationSettings::default().with_max_inner_passes(1);
        settings.keep_reports = false;
        let mut ctl = controller(2, 0, 0, settings);

        let outcome = ctl.run(&graph, &x, &mut rng).unwrap();
        assert!(outcome.reports.is_empty());
        assert_eq!(outcome.summary.total(), 2);
    }
}
