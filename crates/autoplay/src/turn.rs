use crate::{
    search, AutoplayConfig, AutoplayError, SessionResult, StepRecord, SummaryStats, TurnResult,
    TurnStatus,
};
use farkle_core::{Event, EventBus, FarkleState, GameConfig, RngState};
use std::sync::Arc;
use std::time::Instant;

/// Plays one turn from `start`, searching before every decision.
pub fn play_turn(
    start: FarkleState,
    config: &AutoplayConfig,
    rng: &mut RngState,
    events: &mut EventBus,
) -> Result<TurnResult, AutoplayError> {
    config.validate()?;
    let started_at = Instant::now();
    let opening_roll = start.roll().faces();
    events.push(Event::Rolled {
        faces: opening_roll.clone(),
        dice: start.roll().ids(),
    });
    if start.is_bust() {
        events.push(Event::Farkled {
            faces: opening_roll.clone(),
            lost: 0,
        });
    }

    let mut state = start;
    let mut records = Vec::new();
    let mut total_iterations = 0u64;
    for step in 0..config.max_steps {
        if state.is_terminal() {
            break;
        }
        let (action, stats) = search(&state, config, rng)?;
        total_iterations = total_iterations.saturating_add(stats.iterations as u64);

        let before = events.len();
        let next = state.take_action_logged(&action, rng, events)?;
        records.push(StepRecord {
            step,
            roll_before: state.roll().faces(),
            bank_before: state.bank(),
            action,
            mcts: stats,
            roll_after: next.roll().faces(),
            bank_after: next.bank(),
            terminal: next.is_terminal(),
            event_count: events.len() - before,
        });
        state = next;
    }

    let status = match (state.is_terminal(), state.is_bust()) {
        (true, true) => TurnStatus::Farkled,
        (true, false) => TurnStatus::Banked,
        (false, _) => TurnStatus::MaxSteps,
    };
    let summary = SummaryStats {
        steps: records.len() as u32,
        total_iterations,
        wall_time_ms: started_at.elapsed().as_millis() as u64,
    };
    log::info!(
        "turn over: {:?} with {} after {} steps",
        status,
        state.bank(),
        summary.steps
    );
    Ok(TurnResult {
        status,
        score: state.bank(),
        opening_roll,
        steps: records,
        summary,
    })
}

/// Plays `turns` independent turns, each from a fresh roll of the configured
/// dice. `on_turn` sees every finished turn, numbered from 1, together with
/// the events it produced.
pub fn play_turns<F>(
    turns: u32,
    game: &GameConfig,
    config: &AutoplayConfig,
    events: &mut EventBus,
    mut on_turn: F,
) -> Result<SessionResult, AutoplayError>
where
    F: FnMut(u32, &TurnResult, &mut EventBus),
{
    config.validate()?;
    let dice = Arc::new(game.build_dice()?);
    let rules = game.rules();
    let mut rng = RngState::from_seed(config.seed);
    let mut results = Vec::with_capacity(turns as usize);
    for turn in 1..=turns {
        let start = FarkleState::new_turn(Arc::clone(&dice), rules, &mut rng);
        log::debug!("turn {turn}: opening roll {}", start.roll());
        let result = play_turn(start, config, &mut rng, events)?;
        on_turn(turn, &result, events);
        results.push(result);
    }
    Ok(SessionResult::new(config.seed, results))
}
