use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ik::DEFAULT_ITERATIONS;

/// Relaxation settings for a pose session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(iterations: u32) -> Result<Self, ConfigError> {
        Self { iterations }.validated()
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(self)
    }
}
