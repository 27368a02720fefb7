use farkle_autoplay::{
    play_turn, play_turns, search, AutoplayConfig, AutoplayError, GreedyRollout, Mcts,
    NodeStatus, SearchBudget, SearchState, TurnStatus, DEFAULT_ITERATIONS,
};
use farkle_core::{
    ConfigError, DiceSet, EventBus, FarkleState, GameConfig, Roll, RngState, ScoringRules,
};
use std::sync::Arc;

fn config_with(iterations: u32) -> AutoplayConfig {
    AutoplayConfig {
        iteration_limit: Some(iterations),
        ..AutoplayConfig::default()
    }
}

fn at(faces: &[u8], bank: u32) -> FarkleState {
    FarkleState::from_roll(
        Arc::new(DiceSet::standard(6)),
        Roll::from_faces(faces),
        bank,
        ScoringRules::default(),
    )
    .unwrap()
}

macro_rules! budget_case {
    ($name:ident, $time:expr, $iters:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let config = AutoplayConfig {
                time_limit_ms: $time,
                iteration_limit: $iters,
                ..AutoplayConfig::default()
            };
            assert_eq!(config.budget(), $expected);
        }
    };
}

budget_case!(
    budget_defaults_to_iterations,
    None,
    None,
    Ok(SearchBudget::Iterations(DEFAULT_ITERATIONS))
);
budget_case!(budget_iterations, None, Some(64), Ok(SearchBudget::Iterations(64)));
budget_case!(budget_time, Some(25), None, Ok(SearchBudget::TimeMs(25)));
budget_case!(
    budget_both_rejected,
    Some(25),
    Some(64),
    Err(ConfigError::ConflictingBudgets)
);
budget_case!(budget_zero_iterations, None, Some(0), Err(ConfigError::ZeroBudget));
budget_case!(budget_zero_time, Some(0), None, Err(ConfigError::ZeroBudget));

macro_rules! validate_case {
    ($name:ident, $config:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let config: AutoplayConfig = $config;
            assert_eq!(config.validate(), $expected);
        }
    };
}

validate_case!(validate_default, AutoplayConfig::default(), Ok(()));
validate_case!(
    validate_negative_exploration,
    AutoplayConfig {
        exploration_c: -1.0,
        ..AutoplayConfig::default()
    },
    Err(ConfigError::Exploration(-1.0))
);
validate_case!(
    validate_zero_steps,
    AutoplayConfig {
        max_steps: 0,
        ..AutoplayConfig::default()
    },
    Err(ConfigError::NonPositive("max_steps"))
);
validate_case!(
    validate_zero_rollout_rolls,
    AutoplayConfig {
        rollout: GreedyRollout {
            bank_below_dice: 3,
            max_rolls: 0,
        },
        ..AutoplayConfig::default()
    },
    Err(ConfigError::NonPositive("rollout.max_rolls"))
);

#[test]
fn visit_counts_add_up() {
    for seed in [1u64, 7, 42] {
        let mut rng = RngState::from_seed(seed);
        let dice = Arc::new(DiceSet::standard(6));
        let mut root = FarkleState::new_turn(Arc::clone(&dice), ScoringRules::default(), &mut rng);
        while root.is_terminal() {
            root = FarkleState::new_turn(Arc::clone(&dice), ScoringRules::default(), &mut rng);
        }
        let mut tree = Mcts::new(root, std::f64::consts::SQRT_2);
        let stats = tree
            .run(&GreedyRollout::default(), SearchBudget::Iterations(300), &mut rng)
            .unwrap();
        assert_eq!(stats.iterations, 300);
        assert_eq!(tree.root().visits(), 300);
        assert_eq!(stats.nodes, tree.len());
        for (idx, node) in tree.nodes().iter().enumerate() {
            let child_sum: u32 = node
                .children()
                .iter()
                .map(|child| tree.node(*child).unwrap().visits())
                .sum();
            if node.children().is_empty() {
                continue;
            }
            let own = node.visits() - child_sum;
            let expected = if idx == 0 { 0 } else { 1 };
            assert_eq!(own, expected, "own evaluations of an expanded node");
            assert_ne!(node.status(), NodeStatus::Terminal);
        }
        assert_eq!(
            tree.root().visits(),
            tree.root()
                .children()
                .iter()
                .map(|idx| tree.node(*idx).unwrap().visits())
                .sum::<u32>()
        );
    }
}

#[test]
fn root_children_match_legal_actions() {
    let state = at(&[1, 5, 2, 3, 4, 6], 0);
    let legal = state.legal_actions().len();
    let mut tree = Mcts::new(state, std::f64::consts::SQRT_2);
    let mut rng = RngState::from_seed(3);
    tree.run(&GreedyRollout::default(), SearchBudget::Iterations(200), &mut rng)
        .unwrap();
    assert_eq!(tree.root().children().len(), legal);
    assert_eq!(tree.root().status(), NodeStatus::FullyExpanded);
    for child in tree.root().children() {
        assert_eq!(tree.node(*child).unwrap().parent(), Some(0));
    }
}

#[test]
fn same_seed_same_decisions() {
    let game = GameConfig::default();
    let config = config_with(150);
    let first = play_turns(4, &game, &config, &mut EventBus::default(), |_, _, _| {})
        .unwrap();
    let second = play_turns(4, &game, &config, &mut EventBus::default(), |_, _, _| {})
        .unwrap();
    assert_eq!(first.scores(), second.scores());
    for (a, b) in first.turns.iter().zip(&second.turns) {
        let keys_a: Vec<String> = a.steps.iter().map(|s| s.action.stable_key()).collect();
        let keys_b: Vec<String> = b.steps.iter().map(|s| s.action.stable_key()).collect();
        assert_eq!(keys_a, keys_b);
        assert_eq!(a.opening_roll, b.opening_roll);
    }
}

/// Weights that pin each die to one face.
fn loaded(faces: &[u8]) -> Arc<DiceSet> {
    let weights: Vec<Vec<f64>> = faces
        .iter()
        .map(|face| {
            (1..=6u8)
                .map(|f| if f == *face { 1.0 } else { 0.0 })
                .collect()
        })
        .collect();
    Arc::new(DiceSet::from_weights(faces.len(), &weights).unwrap())
}

#[test]
fn search_banks_when_every_reroll_busts() {
    let dice = loaded(&[2, 3, 4, 6, 2, 3]);
    // Not a straight, so the top meld 1 5 leaves dice behind and a bank is offered.
    let state = FarkleState::from_roll(
        dice,
        Roll::from_faces(&[1, 5, 2, 3, 4, 4]),
        0,
        ScoringRules::default(),
    )
    .unwrap();
    let mut rng = RngState::from_seed(11);
    let (action, stats) = search(&state, &config_with(200), &mut rng).unwrap();
    assert!(action.is_bank());
    assert_eq!(action.points(), 150);
    assert_eq!(stats.iterations, 200);
    assert_eq!(stats.root_children, 4);
    assert_eq!(stats.selected_value, 150.0);
}

#[test]
fn search_keeps_rolling_loaded_ones() {
    let dice = loaded(&[1, 1, 1, 1, 1, 1]);
    let state = FarkleState::from_roll(
        dice,
        Roll::from_faces(&[1, 2, 3, 4, 6, 6]),
        0,
        ScoringRules::default(),
    )
    .unwrap();
    let mut rng = RngState::from_seed(12);
    let (action, stats) = search(&state, &config_with(100), &mut rng).unwrap();
    assert!(!action.is_bank());
    assert_eq!(action.points(), 100);
    assert!(stats.selected_value > 100.0);
}

#[test]
fn search_rejects_terminal_root() {
    let busted = at(&[2, 3, 4, 6, 6, 2], 100);
    let mut rng = RngState::from_seed(0);
    assert!(matches!(
        search(&busted, &config_with(10), &mut rng),
        Err(AutoplayError::NoLegalAction)
    ));
}

#[test]
fn search_rejects_conflicting_budgets() {
    let state = at(&[1, 2, 3, 4, 6, 6], 0);
    let config = AutoplayConfig {
        time_limit_ms: Some(10),
        iteration_limit: Some(10),
        ..AutoplayConfig::default()
    };
    let mut rng = RngState::from_seed(0);
    assert!(matches!(
        search(&state, &config, &mut rng),
        Err(AutoplayError::Config(ConfigError::ConflictingBudgets))
    ));
}

#[test]
fn turn_records_every_step() {
    let mut rng = RngState::from_seed(5);
    let mut events = EventBus::default();
    let start = at(&[1, 1, 1, 2, 3, 4], 0);
    let result = play_turn(start, &config_with(100), &mut rng, &mut events).unwrap();
    assert!(!result.steps.is_empty());
    assert_eq!(result.summary.steps as usize, result.steps.len());
    assert_eq!(result.opening_roll, vec![1, 1, 1, 2, 3, 4]);
    let last = result.steps.last().unwrap();
    assert!(last.terminal);
    assert_eq!(last.bank_after, result.score);
    match result.status {
        TurnStatus::Banked => assert!(result.score >= 100),
        TurnStatus::Farkled => assert_eq!(result.score, 0),
        TurnStatus::MaxSteps => panic!("turn should end before max steps"),
    }
    for pair in result.steps.windows(2) {
        assert_eq!(pair[0].bank_after, pair[1].bank_before);
        assert_eq!(pair[0].roll_after, pair[1].roll_before);
    }
    assert!(!events.is_empty());
    let report = result.to_text_report();
    assert!(report.contains("opening roll"));
}

#[test]
fn session_reports_mean_score() {
    let game = GameConfig::default();
    let config = config_with(50);
    let mut seen = Vec::new();
    let mut events = EventBus::default();
    let session = play_turns(3, &game, &config, &mut events, |turn, result, bus| {
        assert!(!bus.is_empty());
        bus.drain().for_each(drop);
        seen.push((turn, result.score));
    })
    .unwrap();
    assert!(events.is_empty());
    assert_eq!(session.turns.len(), 3);
    assert_eq!(
        seen,
        session
            .scores()
            .into_iter()
            .enumerate()
            .map(|(i, score)| (i as u32 + 1, score))
            .collect::<Vec<_>>()
    );
    let expected = session.scores().iter().map(|s| *s as f64).sum::<f64>() / 3.0;
    assert!((session.mean_score - expected).abs() < 1e-9);
    let json = serde_json::to_string(&session).unwrap();
    assert!(json.contains("mean_score"));
}
