use crate::{DiceError, DiceSet, Die, DieId, ScoringRules, ThreePairsRule, STANDARD_FACES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_DICE: usize = 6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dice pool of {0} is outside 1..=6")]
    DiceCount(usize),
    #[error("{lists} weight lists given for {dice} dice")]
    TooManyWeightLists { lists: usize, dice: usize },
    #[error("die {die} has {found} weights, expected {expected}")]
    WeightCount {
        die: usize,
        found: usize,
        expected: usize,
    },
    #[error("die {die} weights rejected: {error}")]
    InvalidWeights {
        die: usize,
        #[source]
        error: DiceError,
    },
    #[error("set either time_limit_ms or iteration_limit, not both")]
    ConflictingBudgets,
    #[error("search budget must be positive")]
    ZeroBudget,
    #[error("exploration constant {0} must be finite and non-negative")]
    Exploration(f64),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// Rules of one game: dice pool shape and scoring variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub dice: usize,
    /// One list of six weights per die, applied from the first die on.
    pub weights: Vec<Vec<f64>>,
    pub three_pairs: ThreePairsRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dice: MAX_DICE,
            weights: Vec::new(),
            three_pairs: ThreePairsRule::Strict,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dice == 0 || self.dice > MAX_DICE {
            return Err(ConfigError::DiceCount(self.dice));
        }
        if self.weights.len() > self.dice {
            return Err(ConfigError::TooManyWeightLists {
                lists: self.weights.len(),
                dice: self.dice,
            });
        }
        for (die, list) in self.weights.iter().enumerate() {
            if list.len() != STANDARD_FACES.len() {
                return Err(ConfigError::WeightCount {
                    die,
                    found: list.len(),
                    expected: STANDARD_FACES.len(),
                });
            }
            Die::weighted(DieId::new(die as u32), list)
                .map_err(|error| ConfigError::InvalidWeights { die, error })?;
        }
        Ok(())
    }

    pub fn rules(&self) -> ScoringRules {
        ScoringRules::with_three_pairs(self.three_pairs)
    }

    pub fn build_dice(&self) -> Result<DiceSet, ConfigError> {
        self.validate()?;
        let dice = (0..self.dice)
            .map(|die| {
                let id = DieId::new(die as u32);
                match self.weights.get(die) {
                    Some(list) => Die::weighted(id, list)
                        .map_err(|error| ConfigError::InvalidWeights { die, error }),
                    None => Ok(Die::fair(id)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DiceSet::from_dice(dice)?)
    }
}
