//! Separation run outcome types.

use crate::error::{SepError, SepResult};
use crate::oracle::OracleStage;
use crate::verify::{CutReport, VerificationSummary};

/// State of the convergence controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Passes are still being run.
    Running,

    /// A pass found no cuts.
    Converged,

    /// The outer round limit was reached while oracles kept finding cuts.
    /// A normal but incomplete result.
    BudgetExhausted,

    /// An oracle failed.
    Failed,
}

impl RunState {
    /// Returns true for the three terminal states.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }

    /// Returns true for terminal states that are not errors.
    pub fn is_success(&self) -> bool {
        matches!(self, RunState::Converged | RunState::BudgetExhausted)
    }
}

/// Counters collected while running.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    /// Outer rounds started.
    pub rounds: usize,

    /// Inner passes run, over all rounds.
    pub passes: usize,

    /// Oracle calls that returned a cut store.
    pub oracle_calls: usize,

    /// Cuts found per stage, indexed by [`OracleStage::index`].
    pub cuts_by_stage: [usize; 3],

    /// Cut stores released.
    pub stores_released: usize,

    /// Cuts released, over all stores.
    pub cuts_released: usize,

    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

impl RunStats {
    /// Total cuts found.
    pub fn total_cuts(&self) -> usize {
        self.cuts_by_stage.iter().sum()
    }

    /// Cuts found by `stage`.
    pub fn cuts_for(&self, stage: OracleStage) -> usize {
        self.cuts_by_stage[stage.index()]
    }
}

/// Result of a separation run.
#[derive(Debug)]
pub struct SeparationOutcome {
    /// Terminal state.
    pub state: RunState,

    /// Report for every verified cut, in processing order.
    pub reports: Vec<CutReport>,

    /// Verdict tallies.
    pub summary: VerificationSummary,

    /// Counters.
    pub stats: RunStats,

    /// The oracle failure, when `state` is `Failed`.
    pub error: Option<SepError>,
}

impl SeparationOutcome {
    /// Reports of cuts the verifier found violated.
    pub fn violated(&self) -> impl Iterator<Item = &CutReport> {
        self.reports.iter().filter(|r| r.is_violated())
    }

    /// Turn a failed outcome into its error.
    pub fn into_result(self) -> SepResult<Self> {
        match (self.state, self.error) {
            (RunState::Failed, Some(e)) => Err(e),
            (RunState::Failed, None) => Err(SepError::Internal(
                "run failed without a recorded error".to_string(),
            )),
            (state, error) => Ok(Self {
                state,
                error,
                ..self
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(state: RunState, error: Option<SepError>) -> SeparationOutcome {
        SeparationOutcome {
            state,
            reports: Vec::new(),
            summary: VerificationSummary::default(),
            stats: RunStats::default(),
            error,
        }
    }

    #[test]
    fn test_state_methods() {
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Converged.is_success());
        assert!(RunState::BudgetExhausted.is_success());
        assert!(RunState::Failed.is_terminal());
        assert!(!RunState::Failed.is_success());
    }

    #[test]
    fn test_into_result() {
        assert!(outcome(RunState::Converged, None).into_result().is_ok());
        assert!(outcome(RunState::BudgetExhausted, None).into_result().is_ok());

        let err = outcome(RunState::Failed, Some(SepError::oracle("mock", "boom")))
            .into_result()
            .unwrap_err();
        assert!(matches!(err, SepError::OracleFailure { oracle: "mock", .. }));
    }
}
