use crate::RngState;
use rand::distributions::{Uniform, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub const STANDARD_FACES: [u8; 6] = [1, 2, 3, 4, 5, 6];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiceError {
    #[error("die has no faces")]
    NoFaces,
    #[error("die has {faces} faces but {weights} weights")]
    WeightCount { faces: usize, weights: usize },
    #[error("weight {value} for face {face} must be finite and non-negative")]
    InvalidWeight { face: u8, value: f64 },
    #[error("all face weights are zero")]
    ZeroWeights,
    #[error("{lists} weight lists given for a pool of {dice} dice")]
    TooManyWeightLists { lists: usize, dice: usize },
    #[error("die {0} appears more than once")]
    DuplicateDie(DieId),
    #[error("die {0} is not part of this set")]
    UnknownDie(DieId),
}

/// Opaque identity of one die inside a [`DiceSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DieId(u32);

impl DieId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum FaceSampler {
    Uniform(Uniform<usize>),
    Weighted(WeightedIndex<f64>),
}

#[derive(Debug, Clone)]
pub struct Die {
    id: DieId,
    faces: Vec<u8>,
    weights: Vec<f64>,
    sampler: FaceSampler,
}

impl Die {
    pub fn fair(id: DieId) -> Self {
        let faces = STANDARD_FACES.to_vec();
        Self {
            id,
            weights: vec![1.0; faces.len()],
            sampler: FaceSampler::Uniform(Uniform::new(0, faces.len())),
            faces,
        }
    }

    /// Builds a die from parallel face/weight lists.
    pub fn new(id: DieId, faces: Vec<u8>, weights: Vec<f64>) -> Result<Self, DiceError> {
        if faces.is_empty() {
            return Err(DiceError::NoFaces);
        }
        if faces.len() != weights.len() {
            return Err(DiceError::WeightCount {
                faces: faces.len(),
                weights: weights.len(),
            });
        }
        for (face, value) in faces.iter().zip(&weights) {
            if !value.is_finite() || *value < 0.0 {
                return Err(DiceError::InvalidWeight {
                    face: *face,
                    value: *value,
                });
            }
        }
        let dist = WeightedIndex::new(&weights).map_err(|_| DiceError::ZeroWeights)?;
        Ok(Self {
            id,
            faces,
            weights,
            sampler: FaceSampler::Weighted(dist),
        })
    }

    /// Standard six faces with the given weights.
    pub fn weighted(id: DieId, weights: &[f64]) -> Result<Self, DiceError> {
        Self::new(id, STANDARD_FACES.to_vec(), weights.to_vec())
    }

    pub fn id(&self) -> DieId {
        self.id
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn roll(&self, rng: &mut RngState) -> u8 {
        let idx = match &self.sampler {
            FaceSampler::Uniform(dist) => rng.sample_index(dist),
            FaceSampler::Weighted(dist) => rng.sample_index(dist),
        };
        self.faces[idx]
    }

    pub fn probability_map(&self) -> Vec<(u8, f64)> {
        let total: f64 = self.weights.iter().sum();
        self.faces
            .iter()
            .zip(&self.weights)
            .map(|(face, weight)| (*face, weight / total))
            .collect()
    }

    pub fn is_fair(&self) -> bool {
        matches!(self.sampler, FaceSampler::Uniform(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolledDie {
    pub face: u8,
    pub die: DieId,
}

/// Faces showing on the dice currently in hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    dice: Vec<RolledDie>,
}

impl Roll {
    pub fn new(dice: Vec<RolledDie>) -> Result<Self, DiceError> {
        let mut seen = HashSet::with_capacity(dice.len());
        for rolled in &dice {
            if !seen.insert(rolled.die) {
                return Err(DiceError::DuplicateDie(rolled.die));
            }
        }
        Ok(Self { dice })
    }

    /// Labels faces with ids 0..n; handy for fixed rolls in tests and tools.
    pub fn from_faces(faces: &[u8]) -> Self {
        let dice = faces
            .iter()
            .enumerate()
            .map(|(idx, face)| RolledDie {
                face: *face,
                die: DieId::new(idx as u32),
            })
            .collect();
        Self { dice }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dice(&self) -> &[RolledDie] {
        &self.dice
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn faces(&self) -> Vec<u8> {
        self.dice.iter().map(|rolled| rolled.face).collect()
    }

    pub fn ids(&self) -> Vec<DieId> {
        self.dice.iter().map(|rolled| rolled.die).collect()
    }

    pub fn contains(&self, id: DieId) -> bool {
        self.dice.iter().any(|rolled| rolled.die == id)
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .dice
            .iter()
            .map(|rolled| rolled.face.to_string())
            .collect::<Vec<_>>();
        write!(f, "[{}]", faces.join(" "))
    }
}

/// The full pool of dice used for a turn.
#[derive(Debug, Clone)]
pub struct DiceSet {
    dice: Vec<Die>,
}

impl DiceSet {
    pub fn standard(count: usize) -> Self {
        let dice = (0..count)
            .map(|idx| Die::fair(DieId::new(idx as u32)))
            .collect();
        Self { dice }
    }

    /// Applies weight lists positionally; dice past the end of `weights` stay fair.
    pub fn from_weights(count: usize, weights: &[Vec<f64>]) -> Result<Self, DiceError> {
        if weights.len() > count {
            return Err(DiceError::TooManyWeightLists {
                lists: weights.len(),
                dice: count,
            });
        }
        let mut dice = Vec::with_capacity(count);
        for idx in 0..count {
            let id = DieId::new(idx as u32);
            let die = match weights.get(idx) {
                Some(list) => Die::weighted(id, list)?,
                None => Die::fair(id),
            };
            dice.push(die);
        }
        Ok(Self { dice })
    }

    pub fn from_dice(dice: Vec<Die>) -> Result<Self, DiceError> {
        let mut seen = HashSet::with_capacity(dice.len());
        for die in &dice {
            if !seen.insert(die.id()) {
                return Err(DiceError::DuplicateDie(die.id()));
            }
        }
        Ok(Self { dice })
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter()
    }

    pub fn get(&self, id: DieId) -> Option<&Die> {
        self.dice.iter().find(|die| die.id() == id)
    }

    pub fn ids(&self) -> Vec<DieId> {
        self.dice.iter().map(Die::id).collect()
    }

    pub fn roll_all(&self, rng: &mut RngState) -> Roll {
        let dice = self
            .dice
            .iter()
            .map(|die| RolledDie {
                face: die.roll(rng),
                die: die.id(),
            })
            .collect();
        Roll { dice }
    }

    /// Rolls only the listed dice, in the order given.
    pub fn roll_subset(&self, ids: &[DieId], rng: &mut RngState) -> Result<Roll, DiceError> {
        let mut dice = Vec::with_capacity(ids.len());
        for id in ids {
            let die = self.get(*id).ok_or(DiceError::UnknownDie(*id))?;
            dice.push(RolledDie {
                face: die.roll(rng),
                die: *id,
            });
        }
        Roll::new(dice)
    }
}
