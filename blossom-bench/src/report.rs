//! Text and JSON rendering of separation outcomes.

use blossom_core::{CutReport, Interval, RunState, SeparationOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonInterval {
    pub lo: i32,
    pub hi: i32,
}

impl From<&Interval> for JsonInterval {
    fn from(iv: &Interval) -> Self {
        Self { lo: iv.lo, hi: iv.hi }
    }
}

/// One verified cut.
#[derive(Debug, Serialize)]
pub struct JsonCut {
    pub stage: String,
    pub round: usize,
    pub pass: usize,
    pub index: usize,
    pub handle: Vec<JsonInterval>,
    pub teeth: Vec<Vec<JsonInterval>>,
    pub lhs: Option<f64>,
    pub rhs: Option<f64>,
    pub verdict: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&CutReport> for JsonCut {
    fn from(r: &CutReport) -> Self {
        let reason = match &r.verdict {
            blossom_core::Verdict::Malformed(m) => Some(m.to_string()),
            _ => None,
        };
        Self {
            stage: r.stage.to_string(),
            round: r.round,
            pass: r.pass,
            index: r.index,
            handle: r.handle.iter().map(JsonInterval::from).collect(),
            teeth: r
                .teeth
                .iter()
                .map(|t| t.iter().map(JsonInterval::from).collect())
                .collect(),
            lhs: r.lhs(),
            rhs: r.rhs(),
            verdict: r.verdict.label().to_string(),
            reason,
        }
    }
}

/// Whole-run summary written by `run --json`.
#[derive(Debug, Serialize)]
pub struct JsonRun {
    pub instance: String,
    pub nodes: usize,
    pub edges: usize,
    pub state: String,
    pub rounds: usize,
    pub passes: usize,
    pub oracle_calls: usize,
    pub cuts_fast: usize,
    pub cuts_strong: usize,
    pub cuts_exact: usize,
    pub violated: usize,
    pub satisfied: usize,
    pub malformed: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cuts: Vec<JsonCut>,
}

impl JsonRun {
    pub fn new(instance: &str, nodes: usize, edges: usize, outcome: &SeparationOutcome) -> Self {
        let [cuts_fast, cuts_strong, cuts_exact] = outcome.stats.cuts_by_stage;
        Self {
            instance: instance.to_string(),
            nodes,
            edges,
            state: state_name(outcome.state).to_string(),
            rounds: outcome.stats.rounds,
            passes: outcome.stats.passes,
            oracle_calls: outcome.stats.oracle_calls,
            cuts_fast,
            cuts_strong,
            cuts_exact,
            violated: outcome.summary.violated,
            satisfied: outcome.summary.satisfied,
            malformed: outcome.summary.malformed,
            elapsed_ms: outcome.stats.elapsed_ms,
            error: outcome.error.as_ref().map(|e| e.to_string()),
            cuts: outcome.reports.iter().map(JsonCut::from).collect(),
        }
    }
}

pub fn state_name(state: RunState) -> &'static str {
    match state {
        RunState::Running => "running",
        RunState::Converged => "converged",
        RunState::BudgetExhausted => "budget-exhausted",
        RunState::Failed => "failed",
    }
}

/// Plain-text report, one line per cut followed by a summary block.
pub fn print_text(instance: &str, outcome: &SeparationOutcome) {
    for report in &outcome.reports {
        println!("{}", report);
    }

    println!();
    println!("{}", "=".repeat(60));
    println!("instance:     {}", instance);
    println!("state:        {}", state_name(outcome.state));
    println!(
        "rounds:       {} ({} passes, {} oracle calls)",
        outcome.stats.rounds, outcome.stats.passes, outcome.stats.oracle_calls
    );
    println!(
        "cuts:         fast {} | strong {} | exact {}",
        outcome.stats.cuts_by_stage[0], outcome.stats.cuts_by_stage[1], outcome.stats.cuts_by_stage[2]
    );
    println!(
        "verdicts:     {} violated, {} satisfied, {} malformed",
        outcome.summary.violated, outcome.summary.satisfied, outcome.summary.malformed
    );
    println!("time:         {} ms", outcome.stats.elapsed_ms);
    if let Some(e) = &outcome.error {
        println!("error:        {}", e);
    }
    println!("{}", "=".repeat(60));
}
