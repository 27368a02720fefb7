use crate::{
    has_scoring_subset, score_faces, scoring_combinations, DiceError, DiceSet, DieId, Event,
    EventBus, FarkleAction, Meld, RngState, Roll, ScoringRules,
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TurnError {
    #[error("the turn is already over")]
    TerminalState,
    #[error("meld selects no dice")]
    EmptyMeld,
    #[error("die {0} is selected more than once")]
    DuplicateDie(DieId),
    #[error("die {0} is not in the current roll")]
    UnknownDie(DieId),
    #[error("meld claims {claimed} points but the dice score {actual}")]
    MeldMismatch { claimed: u32, actual: u32 },
    #[error("cannot bank with hot dice, the whole roll must be set aside")]
    BankOnHotDice,
    #[error("turn total overflows adding {points} to {bank}")]
    ScoreOverflow { bank: u32, points: u32 },
    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// One decision point within a solo turn.
///
/// States are snapshots: every transition returns a new state and leaves the
/// old one untouched. The dice set is shared so hot-dice refills can reroll
/// the whole pool.
#[derive(Debug, Clone)]
pub struct FarkleState {
    dice: Arc<DiceSet>,
    roll: Roll,
    bank: u32,
    rules: ScoringRules,
    terminal: bool,
}

impl FarkleState {
    /// Rolls the full pool. A first roll with nothing to score is already a
    /// bust.
    pub fn new_turn(dice: Arc<DiceSet>, rules: ScoringRules, rng: &mut RngState) -> Self {
        let roll = dice.roll_all(rng);
        let terminal = !has_scoring_subset(&roll.faces(), rules);
        Self {
            dice,
            roll,
            bank: 0,
            rules,
            terminal,
        }
    }

    /// Resumes a turn from a known roll. Fails if the roll uses dice the set
    /// does not own.
    pub fn from_roll(
        dice: Arc<DiceSet>,
        roll: Roll,
        bank: u32,
        rules: ScoringRules,
    ) -> Result<Self, TurnError> {
        if let Some(rolled) = roll.dice().iter().find(|r| dice.get(r.die).is_none()) {
            return Err(TurnError::UnknownDie(rolled.die));
        }
        let terminal = !has_scoring_subset(&roll.faces(), rules);
        Ok(Self {
            dice,
            roll,
            bank: if terminal { 0 } else { bank },
            rules,
            terminal,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn bank(&self) -> u32 {
        self.bank
    }

    /// Points this state is worth if the turn ended here.
    pub fn reward(&self) -> f64 {
        self.bank as f64
    }

    pub fn roll(&self) -> &Roll {
        &self.roll
    }

    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    pub fn dice(&self) -> &Arc<DiceSet> {
        &self.dice
    }

    /// True once the state is terminal with nothing banked from a bust.
    pub fn is_bust(&self) -> bool {
        self.terminal && !self.roll.is_empty()
    }

    pub fn melds(&self) -> Vec<Meld> {
        if self.terminal {
            return Vec::new();
        }
        scoring_combinations(&self.roll, self.rules)
    }

    pub fn possible_actions(&self) -> Vec<FarkleAction> {
        let melds = self.melds();
        let Some(top) = melds.first() else {
            return Vec::new();
        };
        let hot_dice = top.len() == self.roll.len();
        let bank = FarkleAction::Bank { points: top.points };
        let mut actions: Vec<FarkleAction> = melds
            .into_iter()
            .map(|meld| FarkleAction::Take { meld })
            .collect();
        if !hot_dice {
            actions.push(bank);
        }
        actions
    }

    pub fn take_action(
        &self,
        action: &FarkleAction,
        rng: &mut RngState,
    ) -> Result<Self, TurnError> {
        self.transition(action, rng, None)
    }

    /// Same transition as [`FarkleState::take_action`], reporting what
    /// happened to `events`.
    pub fn take_action_logged(
        &self,
        action: &FarkleAction,
        rng: &mut RngState,
        events: &mut EventBus,
    ) -> Result<Self, TurnError> {
        self.transition(action, rng, Some(events))
    }

    fn transition(
        &self,
        action: &FarkleAction,
        rng: &mut RngState,
        mut events: Option<&mut EventBus>,
    ) -> Result<Self, TurnError> {
        if self.terminal {
            return Err(TurnError::TerminalState);
        }
        match action {
            FarkleAction::Bank { points } => {
                self.check_bank(*points)?;
                let total = self.add_to_bank(*points)?;
                if let Some(bus) = events.as_mut() {
                    bus.push(Event::Banked {
                        points: *points,
                        total,
                    });
                }
                Ok(Self {
                    dice: Arc::clone(&self.dice),
                    roll: Roll::empty(),
                    bank: total,
                    rules: self.rules,
                    terminal: true,
                })
            }
            FarkleAction::Take { meld } => {
                let taken = self.check_meld(meld)?;
                let bank = self.add_to_bank(meld.points)?;
                if let Some(bus) = events.as_mut() {
                    bus.push(Event::MeldTaken {
                        faces: meld.faces(),
                        points: meld.points,
                        bank,
                    });
                }

                let mut remaining: Vec<DieId> = self
                    .roll
                    .ids()
                    .into_iter()
                    .filter(|id| !taken.contains(id))
                    .collect();
                if remaining.is_empty() {
                    remaining = self.dice.ids();
                    if let Some(bus) = events.as_mut() {
                        bus.push(Event::HotDice {
                            dice: remaining.len(),
                        });
                    }
                }
                let roll = self.dice.roll_subset(&remaining, rng)?;
                if let Some(bus) = events.as_mut() {
                    bus.push(Event::Rolled {
                        faces: roll.faces(),
                        dice: roll.ids(),
                    });
                }

                if !has_scoring_subset(&roll.faces(), self.rules) {
                    log::trace!("farkle on {roll} with {bank} at stake");
                    if let Some(bus) = events.as_mut() {
                        bus.push(Event::Farkled {
                            faces: roll.faces(),
                            lost: bank,
                        });
                    }
                    return Ok(Self {
                        dice: Arc::clone(&self.dice),
                        roll,
                        bank: 0,
                        rules: self.rules,
                        terminal: true,
                    });
                }
                Ok(Self {
                    dice: Arc::clone(&self.dice),
                    roll,
                    bank,
                    rules: self.rules,
                    terminal: false,
                })
            }
        }
    }

    fn add_to_bank(&self, points: u32) -> Result<u32, TurnError> {
        self.bank.checked_add(points).ok_or(TurnError::ScoreOverflow {
            bank: self.bank,
            points,
        })
    }

    /// Banking scores the best meld of the current roll, and is only allowed
    /// when that meld leaves dice behind.
    fn check_bank(&self, points: u32) -> Result<(), TurnError> {
        let melds = self.melds();
        let Some(top) = melds.first() else {
            return Err(TurnError::MeldMismatch {
                claimed: points,
                actual: 0,
            });
        };
        if top.len() == self.roll.len() {
            return Err(TurnError::BankOnHotDice);
        }
        if top.points != points {
            return Err(TurnError::MeldMismatch {
                claimed: points,
                actual: top.points,
            });
        }
        Ok(())
    }

    fn check_meld(&self, meld: &Meld) -> Result<HashSet<DieId>, TurnError> {
        if meld.is_empty() {
            return Err(TurnError::EmptyMeld);
        }
        let mut taken = HashSet::with_capacity(meld.len());
        let mut faces = Vec::with_capacity(meld.len());
        for selected in &meld.dice {
            if !taken.insert(selected.die) {
                return Err(TurnError::DuplicateDie(selected.die));
            }
            let rolled = self
                .roll
                .dice()
                .iter()
                .find(|rolled| rolled.die == selected.die)
                .ok_or(TurnError::UnknownDie(selected.die))?;
            faces.push(rolled.face);
        }
        let actual = score_faces(&faces, self.rules);
        if actual == 0 || actual != meld.points {
            return Err(TurnError::MeldMismatch {
                claimed: meld.points,
                actual,
            });
        }
        Ok(taken)
    }
}
