//! Separation oracles.
//!
//! Every oracle implements [`SeparationOracle`]: given a graph and a
//! fractional solution it returns a [`CutStore`] (possibly empty) or fails.
//! The controller calls the stages in a fixed order and hands the random
//! state only to the exact stage.

mod blossom;
mod exact;
mod fast;
mod flow;
mod groetschel_holland;

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::cuts::CutStore;
use crate::error::SepResult;
use crate::model::{FractionalSolution, Graph};
use crate::settings::OracleSettings;

pub use exact::ExactBlossom;
pub use fast::FastBlossom;
pub use flow::{FlowNetwork, GomoryHuTree};
pub use groetschel_holland::GroetschelHollandBlossom;

/// Random state threaded through exact-oracle calls.
pub type SepRng = ChaCha8Rng;

/// Position of an oracle in a separation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OracleStage {
    /// Cheap heuristic, run first.
    Fast,

    /// Stronger heuristic.
    Strong,

    /// Exact separation, run last.
    Exact,
}

impl OracleStage {
    /// Stages in call order.
    pub const ORDER: [OracleStage; 3] = [OracleStage::Fast, OracleStage::Strong, OracleStage::Exact];

    /// Only the exact stage receives the random state.
    pub fn takes_random_state(self) -> bool {
        matches!(self, OracleStage::Exact)
    }

    /// Index into per-stage arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            OracleStage::Fast => "fast",
            OracleStage::Strong => "strong",
            OracleStage::Exact => "exact",
        }
    }
}

impl fmt::Display for OracleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A blossom/comb separation procedure.
pub trait SeparationOracle {
    /// Human-readable oracle name.
    fn name(&self) -> &'static str;

    /// Search for violated cuts.
    ///
    /// `rng` is `Some` only for the exact stage. Implementations must not
    /// reseed it. A returned error is fatal to the current pass.
    fn separate(
        &mut self,
        graph: &Graph,
        x: &FractionalSolution,
        rng: Option<&mut SepRng>,
    ) -> SepResult<CutStore>;
}

/// The three oracles of a separation pass.
pub struct OracleSet {
    fast: Box<dyn SeparationOracle>,
    strong: Box<dyn SeparationOracle>,
    exact: Box<dyn SeparationOracle>,
}

impl OracleSet {
    /// Assemble a set from arbitrary oracles.
    pub fn new(
        fast: Box<dyn SeparationOracle>,
        strong: Box<dyn SeparationOracle>,
        exact: Box<dyn SeparationOracle>,
    ) -> Self {
        Self {
            fast,
            strong,
            exact,
        }
    }

    /// Fast blossom, Grötschel-Holland blossom, exact blossom.
    pub fn standard(settings: &OracleSettings) -> Self {
        Self::new(
            Box::new(FastBlossom::new(settings.clone())),
            Box::new(GroetschelHollandBlossom::new(settings.clone())),
            Box::new(ExactBlossom::new(settings.clone())),
        )
    }

    /// Oracle registered for `stage`.
    pub fn get_mut(&mut self, stage: OracleStage) -> &mut dyn SeparationOracle {
        match stage {
            OracleStage::Fast => self.fast.as_mut(),
            OracleStage::Strong => self.strong.as_mut(),
            OracleStage::Exact => self.exact.as_mut(),
        }
    }

    /// Oracle names in call order.
    pub fn names(&self) -> [&'static str; 3] {
        [self.fast.name(), self.strong.name(), self.exact.name()]
    }
}

impl fmt::Debug for OracleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(
            OracleStage::ORDER.map(|s| s.index()),
            [0, 1, 2]
        );
        assert!(!OracleStage::Fast.takes_random_state());
        assert!(!OracleStage::Strong.takes_random_state());
        assert!(OracleStage::Exact.takes_random_state());
    }

    #[test]
    fn test_standard_set() {
        let set = OracleSet::standard(&OracleSettings::default());
        assert_eq!(set.names(), ["fast blossom", "groetschel-holland blossom", "exact blossom"]);
    }
}
