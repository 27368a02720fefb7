use crate::{DieId, Roll, RolledDie};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STRAIGHT_POINTS: u32 = 2500;
pub const THREE_PAIRS_POINTS: u32 = 1500;

/// Which six-dice pair patterns count as "three pairs".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreePairsRule {
    /// Three distinct faces, two of each.
    #[default]
    Strict,
    /// Also accepts four of a kind plus a pair.
    FourKindPair,
}

impl ThreePairsRule {
    pub fn id(self) -> &'static str {
        match self {
            ThreePairsRule::Strict => "strict",
            ThreePairsRule::FourKindPair => "four-kind-pair",
        }
    }
}

impl FromStr for ThreePairsRule {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "strict" => Ok(ThreePairsRule::Strict),
            "four-kind-pair" => Ok(ThreePairsRule::FourKindPair),
            other => Err(format!(
                "unknown three-pairs rule '{other}' (expected strict or four-kind-pair)"
            )),
        }
    }
}

impl fmt::Display for ThreePairsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default)]
    pub three_pairs: ThreePairsRule,
}

impl ScoringRules {
    pub fn with_three_pairs(three_pairs: ThreePairsRule) -> Self {
        Self { three_pairs }
    }
}

/// Per-face counts; index 0 collects anything outside 1..=6.
fn face_counts(faces: &[u8]) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for face in faces {
        match face {
            1..=6 => counts[*face as usize] += 1,
            _ => counts[0] += 1,
        }
    }
    counts
}

fn is_straight(counts: &[usize; 7]) -> bool {
    counts[0] == 0 && counts[1..].iter().all(|count| *count == 1)
}

fn is_three_pairs(counts: &[usize; 7], rule: ThreePairsRule) -> bool {
    if counts[0] != 0 {
        return false;
    }
    let mut groups: Vec<usize> = counts[1..].iter().copied().filter(|c| *c > 0).collect();
    groups.sort_unstable();
    match groups.as_slice() {
        [2, 2, 2] => true,
        [2, 4] => rule == ThreePairsRule::FourKindPair,
        _ => false,
    }
}

fn of_a_kind_points(face: u8, count: usize) -> Option<u32> {
    match count {
        3 if face == 1 => Some(1000),
        3 => Some(face as u32 * 100),
        4 => Some(1000),
        5 => Some(2000),
        6 => Some(3000),
        _ => None,
    }
}

/// Scores a multiset of faces. Returns 0 unless every face contributes to a
/// recognized pattern.
pub fn score_faces(faces: &[u8], rules: ScoringRules) -> u32 {
    if faces.is_empty() {
        return 0;
    }
    let counts = face_counts(faces);
    if counts[0] > 0 {
        return 0;
    }
    if faces.len() == 6 {
        if is_straight(&counts) {
            return STRAIGHT_POINTS;
        }
        if is_three_pairs(&counts, rules.three_pairs) {
            return THREE_PAIRS_POINTS;
        }
    }

    let mut total = 0;
    for face in 1..=6u8 {
        let count = counts[face as usize];
        if count == 0 {
            continue;
        }
        if count >= 3 {
            match of_a_kind_points(face, count) {
                Some(points) => total += points,
                None => return 0,
            }
            continue;
        }
        match face {
            1 => total += 100 * count as u32,
            5 => total += 50 * count as u32,
            _ => return 0,
        }
    }
    total
}

pub fn score_combination(dice: &[RolledDie], rules: ScoringRules) -> u32 {
    let faces: Vec<u8> = dice.iter().map(|rolled| rolled.face).collect();
    score_faces(&faces, rules)
}

/// Cheap bust test: true when at least one subset of `faces` scores.
pub fn has_scoring_subset(faces: &[u8], rules: ScoringRules) -> bool {
    let counts = face_counts(faces);
    if counts[1] > 0 || counts[5] > 0 {
        return true;
    }
    if counts[1..].iter().any(|count| (3..=6).contains(count)) {
        return true;
    }
    // A bare six-dice pair pattern still scores without 1s, 5s or triples.
    faces.len() == 6 && is_three_pairs(&counts, rules.three_pairs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    Straight,
    ThreePairs,
    OfAKind { face: u8, count: u8 },
    Singles,
    Mixed,
}

impl MeldKind {
    pub fn classify(faces: &[u8], rules: ScoringRules) -> Self {
        let counts = face_counts(faces);
        if faces.len() == 6 && is_straight(&counts) {
            return MeldKind::Straight;
        }
        if faces.len() == 6 && is_three_pairs(&counts, rules.three_pairs) {
            return MeldKind::ThreePairs;
        }
        let present: Vec<u8> = (1..=6u8).filter(|face| counts[*face as usize] > 0).collect();
        if let [face] = present.as_slice() {
            let count = counts[*face as usize];
            if count >= 3 {
                return MeldKind::OfAKind {
                    face: *face,
                    count: count as u8,
                };
            }
        }
        if counts[1..].iter().all(|count| *count < 3) {
            return MeldKind::Singles;
        }
        MeldKind::Mixed
    }

    pub fn label(self) -> String {
        match self {
            MeldKind::Straight => "straight".to_string(),
            MeldKind::ThreePairs => "three pairs".to_string(),
            MeldKind::OfAKind { face, count } => format!("{count} x {face}"),
            MeldKind::Singles => "singles".to_string(),
            MeldKind::Mixed => "mixed".to_string(),
        }
    }
}

/// A scoring selection out of one roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub dice: Vec<RolledDie>,
    pub points: u32,
}

impl Meld {
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn ids(&self) -> Vec<DieId> {
        self.dice.iter().map(|rolled| rolled.die).collect()
    }

    pub fn faces(&self) -> Vec<u8> {
        self.dice.iter().map(|rolled| rolled.face).collect()
    }

    pub fn kind(&self, rules: ScoringRules) -> MeldKind {
        MeldKind::classify(&self.faces(), rules)
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .dice
            .iter()
            .map(|rolled| rolled.face.to_string())
            .collect::<Vec<_>>();
        write!(f, "{} ({})", faces.join(" "), self.points)
    }
}

/// Every scoring subset of `roll`, best first.
///
/// Candidates are generated in ascending bitmask order (bit `i` selects the
/// `i`-th die of the roll) and then stably sorted by points, then size, both
/// descending. The result is fully determined by the roll.
pub fn scoring_combinations(roll: &Roll, rules: ScoringRules) -> Vec<Meld> {
    let dice = roll.dice();
    let n = dice.len();
    if n == 0 {
        return Vec::new();
    }
    debug_assert!(n < usize::BITS as usize);

    let mut melds = Vec::new();
    let mut faces = Vec::with_capacity(n);
    for mask in 1usize..(1usize << n) {
        faces.clear();
        faces.extend(
            (0..n)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| dice[bit].face),
        );
        let points = score_faces(&faces, rules);
        if points == 0 {
            continue;
        }
        let subset = (0..n)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| dice[bit])
            .collect();
        melds.push(Meld {
            dice: subset,
            points,
        });
    }

    melds.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.dice.len().cmp(&a.dice.len()))
    });
    melds
}
