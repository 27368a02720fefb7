use crate::Meld;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FarkleAction {
    /// Set the meld aside and roll what is left.
    Take { meld: Meld },
    /// End the turn, keeping the bank plus `points`.
    Bank { points: u32 },
}

impl FarkleAction {
    pub fn points(&self) -> u32 {
        match self {
            Self::Take { meld } => meld.points,
            Self::Bank { points } => *points,
        }
    }

    pub fn is_bank(&self) -> bool {
        matches!(self, Self::Bank { .. })
    }

    pub fn stable_key(&self) -> String {
        match self {
            Self::Take { meld } => {
                let ids = meld
                    .ids()
                    .iter()
                    .map(|id| id.raw().to_string())
                    .collect::<Vec<_>>();
                format!("take:{}:{}", ids.join(","), meld.points)
            }
            Self::Bank { points } => format!("bank:{points}"),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Self::Take { meld } => format!("take {meld}"),
            Self::Bank { points } => format!("bank +{points}"),
        }
    }
}
