use crate::Rollout;
use farkle_core::{FarkleAction, FarkleState, RngState, TurnError};
use serde::{Deserialize, Serialize};

/// Plays the rest of a turn by always setting aside the best meld.
///
/// Banks as soon as a bank is offered and either fewer than
/// `bank_below_dice` dice would be left to roll or `max_rolls` rolls have
/// happened. A chain of hot dice past `max_rolls` is scored as if the top
/// meld had been banked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreedyRollout {
    pub bank_below_dice: usize,
    pub max_rolls: u32,
}

impl Default for GreedyRollout {
    fn default() -> Self {
        Self {
            bank_below_dice: 3,
            max_rolls: 32,
        }
    }
}

impl Rollout<FarkleState> for GreedyRollout {
    fn evaluate(&self, state: &FarkleState, rng: &mut RngState) -> Result<f64, TurnError> {
        let mut current = state.clone();
        let mut rolls = 0u32;
        loop {
            if current.is_terminal() {
                return Ok(current.reward());
            }
            let actions = current.possible_actions();
            let Some(FarkleAction::Take { meld }) = actions.first() else {
                return Ok(current.reward());
            };
            let left = current.roll().len() - meld.len();
            let out_of_rolls = rolls >= self.max_rolls;
            match actions.iter().find(|action| action.is_bank()) {
                Some(bank) if left < self.bank_below_dice || out_of_rolls => {
                    current = current.take_action(bank, rng)?;
                    continue;
                }
                None if out_of_rolls => {
                    return Ok((current.bank() + meld.points) as f64);
                }
                _ => {}
            }
            current = current.take_action(&actions[0], rng)?;
            rolls += 1;
        }
    }
}
