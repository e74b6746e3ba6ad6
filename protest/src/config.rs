//! Run-level configuration.
//!
//! Covers the knobs this engine actually has: a default sample count per
//! non-exhaustible `ForAll`, an optional seed, and the default recursion
//! depth cap for `recursive` domains. There is no shrink-iteration or
//! shrink-timeout knob, since shrinking is out of scope.

use crate::error::ConfigError;

/// Default `n_samples` for a `ForAll` over a non-exhaustible domain.
pub const DEFAULT_N_SAMPLES: usize = 100;

/// Default recursion depth cap for `recursive` domains.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Run-wide configuration: the seed to replay with, and the default sample
/// count/recursion depth new quantifier nodes and recursive domains pick up
/// when the caller doesn't override them explicitly.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub default_n_samples: usize,
    pub default_max_depth: usize,
    pub seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            default_n_samples: DEFAULT_N_SAMPLES,
            default_max_depth: DEFAULT_MAX_DEPTH,
            seed: None,
        }
    }
}

impl TestConfig {
    pub fn new(
        default_n_samples: usize,
        default_max_depth: usize,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if default_n_samples == 0 {
            return Err(ConfigError::InvalidIterations(default_n_samples));
        }
        if default_max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(default_max_depth));
        }
        Ok(Self {
            default_n_samples,
            default_max_depth,
            seed,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_n_samples == 0 {
            return Err(ConfigError::InvalidIterations(self.default_n_samples));
        }
        if self.default_max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.default_max_depth));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_n_samples(mut self, n: usize) -> Self {
        self.default_n_samples = n;
        self
    }
}
