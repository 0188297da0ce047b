//! Input and outcome types for separation runs.

mod graph;
mod outcome;

pub use graph::{validate_input, FractionalSolution, Graph, MAX_NODES};
pub use outcome::{RunState, RunStats, SeparationOutcome};
