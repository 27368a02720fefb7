use farkle_core::{
    score_faces, scoring_combinations, Roll, ScoringRules, ThreePairsRule, STRAIGHT_POINTS,
};

macro_rules! score_case {
    ($name:ident, $faces:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(score_faces(&$faces, ScoringRules::default()), $expected);
        }
    };
}

macro_rules! variant_case {
    ($name:ident, $faces:expr, $strict:expr, $four_kind_pair:expr) => {
        #[test]
        fn $name() {
            let strict = ScoringRules::with_three_pairs(ThreePairsRule::Strict);
            let variant = ScoringRules::with_three_pairs(ThreePairsRule::FourKindPair);
            assert_eq!(score_faces(&$faces, strict), $strict);
            assert_eq!(score_faces(&$faces, variant), $four_kind_pair);
        }
    };
}

score_case!(single_one, [1], 100);
score_case!(single_five, [5], 50);
score_case!(pair_of_ones, [1, 1], 200);
score_case!(pair_of_fives, [5, 5], 100);
score_case!(one_and_five, [1, 5], 150);
score_case!(single_two, [2], 0);
score_case!(pair_of_sixes, [6, 6], 0);
score_case!(three_ones, [1, 1, 1], 1000);
score_case!(three_twos, [2, 2, 2], 200);
score_case!(three_threes, [3, 3, 3], 300);
score_case!(three_fours, [4, 4, 4], 400);
score_case!(three_fives, [5, 5, 5], 500);
score_case!(three_sixes, [6, 6, 6], 600);
score_case!(four_ones, [1, 1, 1, 1], 1000);
score_case!(four_twos, [2, 2, 2, 2], 1000);
score_case!(four_sixes, [6, 6, 6, 6], 1000);
score_case!(five_threes, [3, 3, 3, 3, 3], 2000);
score_case!(five_ones, [1, 1, 1, 1, 1], 2000);
score_case!(six_fours, [4, 4, 4, 4, 4, 4], 3000);
score_case!(six_ones, [1, 1, 1, 1, 1, 1], 3000);
score_case!(straight_in_order, [1, 2, 3, 4, 5, 6], 2500);
score_case!(three_pairs, [2, 2, 4, 4, 6, 6], 1500);
score_case!(three_pairs_with_ones, [1, 1, 5, 5, 3, 3], 1500);
score_case!(triple_plus_singles, [1, 1, 1, 5, 5], 1100);
score_case!(triple_plus_dead_die, [1, 1, 1, 5, 5, 2], 0);
score_case!(two_triples, [2, 2, 2, 3, 3, 3], 500);
score_case!(triple_twos_and_one, [2, 2, 2, 1], 300);
score_case!(five_straight_is_not_a_straight, [1, 2, 3, 4, 5], 0);
score_case!(empty_selection, [], 0);

variant_case!(four_twos_pair_threes, [2, 2, 2, 2, 3, 3], 0, 1500);
variant_case!(four_sixes_pair_ones, [6, 6, 6, 6, 1, 1], 1200, 1500);
variant_case!(strict_pairs_unchanged, [3, 3, 4, 4, 6, 6], 1500, 1500);
variant_case!(five_and_one_not_pairs, [2, 2, 2, 2, 2, 3], 0, 0);

fn permutations(items: &mut Vec<u8>, k: usize, out: &mut Vec<Vec<u8>>) {
    if k == items.len() {
        out.push(items.clone());
        return;
    }
    for idx in k..items.len() {
        items.swap(k, idx);
        permutations(items, k + 1, out);
        items.swap(k, idx);
    }
}

#[test]
fn every_straight_permutation_scores_2500() {
    let mut out = Vec::new();
    permutations(&mut vec![1, 2, 3, 4, 5, 6], 0, &mut out);
    assert_eq!(out.len(), 720);
    for faces in out {
        assert_eq!(
            score_faces(&faces, ScoringRules::default()),
            STRAIGHT_POINTS,
            "{faces:?}"
        );
    }
}

#[test]
fn straight_roll_enumerates_straight_first() {
    let roll = Roll::from_faces(&[4, 2, 6, 1, 3, 5]);
    let melds = scoring_combinations(&roll, ScoringRules::default());
    assert_eq!(melds[0].points, 2500);
    assert_eq!(melds[0].len(), 6);
    // {1}, {5}, {1,5} plus the straight.
    assert_eq!(melds.len(), 4);
}

#[test]
fn enumerator_only_returns_positive_subsets() {
    let roll = Roll::from_faces(&[1, 1, 1, 5, 5, 2]);
    let melds = scoring_combinations(&roll, ScoringRules::default());
    assert!(!melds.is_empty());
    for meld in &melds {
        assert!(meld.points > 0);
        assert_eq!(score_faces(&meld.faces(), ScoringRules::default()), meld.points);
        assert!(!meld.faces().contains(&2));
    }
    assert_eq!(melds[0].points, 1100);
    assert_eq!(melds[0].len(), 5);
    for pair in melds.windows(2) {
        assert!(pair[0].points >= pair[1].points);
        if pair[0].points == pair[1].points {
            assert!(pair[0].len() >= pair[1].len());
        }
    }
}

#[test]
fn bust_roll_has_no_melds() {
    let roll = Roll::from_faces(&[2, 3, 4, 6, 6, 3]);
    assert!(scoring_combinations(&roll, ScoringRules::default()).is_empty());
}
