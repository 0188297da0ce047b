//! Configuration settings for the separation loop.

/// Settings shared by the concrete blossom oracles.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Values within `eps` of 0 or 1 are treated as integral.
    pub eps: f64,

    /// Minimum blossom violation (1 - slack) for a cut to be emitted.
    pub violation_tol: f64,

    /// Maximum cuts returned by a single oracle call.
    pub max_cuts_per_call: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            eps: 1e-6,
            violation_tol: 1e-6,
            max_cuts_per_call: 1000,
        }
    }
}

/// Separation loop settings.
#[derive(Debug, Clone)]
pub struct SeparationSettings {
    // === Termination criteria ===
    /// Number of outer rounds before giving up with `BudgetExhausted`.
    pub outer_limit: usize,

    /// Maximum passes of the inner loop within one outer round.
    pub max_inner_passes: usize,

    // === Oracles ===
    /// Settings for the built-in oracles.
    pub oracle: OracleSettings,

    /// Seed for the random state handed to the exact oracle.
    pub seed: u64,

    // === Output ===
    /// Keep a `CutReport` for every verified cut.
    pub keep_reports: bool,

    /// Log per-oracle progress at info level.
    pub verbose: bool,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            // Termination
            outer_limit: 1,
            max_inner_passes: 100,

            // Oracles
            oracle: OracleSettings::default(),
            seed: 12345,

            // Output
            keep_reports: true,
            verbose: false,
        }
    }
}

impl SeparationSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        let mut s = Self::default();
        s.verbose = true;
        s
    }

    /// Set the outer round limit.
    pub fn with_outer_limit(mut self, rounds: usize) -> Self {
        self.outer_limit = rounds;
        self
    }

    /// Set the inner pass cap.
    pub fn with_max_inner_passes(mut self, passes: usize) -> Self {
        self.max_inner_passes = passes;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let s = SeparationSettings::default()
            .with_outer_limit(4)
            .with_max_inner_passes(7)
            .with_seed(99);
        assert_eq!(s.outer_limit, 4);
        assert_eq!(s.max_inner_passes, 7);
        assert_eq!(s.seed, 99);
        assert!(!s.verbose);
        assert!(SeparationSettings::verbose().verbose);
    }
}
