//! Blossom and comb separation for the TSP LP relaxation.
//!
//! Given a graph and a fractional edge vector `x` from the subtour LP, this
//! crate searches for violated comb inequalities
//!
//! ```text
//! x(δ(H)) + Σ_j x(δ(T_j)) >= 3T + 1
//! ```
//!
//! using three blossom oracles of increasing strength:
//!
//! - **Fast**: handles are components of the strictly fractional support
//!   graph, teeth are the integral boundary edges.
//! - **Strong (Grötschel-Holland)**: a family of candidate handles, each with
//!   its best odd tooth set.
//! - **Exact (Padberg-Rao)**: minimum odd cuts of an edge-split network via a
//!   Gomory-Hu tree.
//!
//! Cuts are returned in a compact interval-encoded [`CutStore`]. The
//! [`ConvergenceController`] runs the oracles in passes, verifies every cut
//! against the comb inequality and releases each store before the next
//! oracle runs.
//!
//! # Example
//!
//! ```ignore
//! use blossom_core::{separate_blossoms, FractionalSolution, Graph, SepRng, SeparationSettings};
//! use rand::SeedableRng;
//!
//! let graph = Graph::from_flat(5, &[0, 1, 0, 2, 0, 3, 1, 2, 1, 3, 2, 3, 2, 4, 3, 4])?;
//! let x = FractionalSolution::for_graph(&graph, vec![0.5, 0.3, 0.7, 0.2, 0.1, 0.6, 0.4, 0.8])?;
//!
//! let settings = SeparationSettings::verbose();
//! let mut rng = SepRng::seed_from_u64(settings.seed);
//! let outcome = separate_blossoms(&graph, &x, &mut rng, &settings)?;
//! println!("{:?}: {} violated", outcome.state, outcome.summary.violated);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]

pub mod controller;
pub mod cuts;
pub mod error;
pub mod model;
pub mod oracle;
pub mod settings;
pub mod verify;

pub use controller::{separate_blossoms, ConvergenceController};
pub use cuts::{CutRef, CutStore, CutStoreBuilder, Interval};
pub use error::{MalformedCut, SepError, SepResult};
pub use model::{FractionalSolution, Graph, RunState, RunStats, SeparationOutcome, MAX_NODES};
pub use oracle::{OracleSet, OracleStage, SepRng, SeparationOracle};
pub use settings::{OracleSettings, SeparationSettings};
pub use verify::{CombVerifier, CutReport, Verdict, VerificationSummary};
