use crate::GreedyRollout;
use farkle_core::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ITERATIONS: u32 = 1000;

/// How long one decision may search. Checked between full cycles only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBudget {
    Iterations(u32),
    TimeMs(u64),
}

impl SearchBudget {
    pub fn describe(&self) -> String {
        match self {
            SearchBudget::Iterations(n) => format!("{n} iterations"),
            SearchBudget::TimeMs(ms) => format!("{ms} ms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    pub seed: u64,
    pub max_steps: u32,
    pub time_limit_ms: Option<u64>,
    pub iteration_limit: Option<u32>,
    pub exploration_c: f64,
    pub rollout: GreedyRollout,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            max_steps: 200,
            time_limit_ms: None,
            iteration_limit: None,
            exploration_c: std::f64::consts::SQRT_2,
            rollout: GreedyRollout::default(),
        }
    }
}

impl AutoplayConfig {
    /// The budget in force; with neither limit set the search runs
    /// [`DEFAULT_ITERATIONS`] cycles.
    pub fn budget(&self) -> Result<SearchBudget, ConfigError> {
        match (self.time_limit_ms, self.iteration_limit) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingBudgets),
            (Some(0), None) | (None, Some(0)) => Err(ConfigError::ZeroBudget),
            (Some(ms), None) => Ok(SearchBudget::TimeMs(ms)),
            (None, Some(n)) => Ok(SearchBudget::Iterations(n)),
            (None, None) => Ok(SearchBudget::Iterations(DEFAULT_ITERATIONS)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget()?;
        if !self.exploration_c.is_finite() || self.exploration_c < 0.0 {
            return Err(ConfigError::Exploration(self.exploration_c));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::NonPositive("max_steps"));
        }
        if self.rollout.max_rolls == 0 {
            return Err(ConfigError::NonPositive("rollout.max_rolls"));
        }
        Ok(())
    }
}
