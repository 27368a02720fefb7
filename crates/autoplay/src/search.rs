use crate::{AutoplayConfig, AutoplayError, Mcts, SearchState, SearchStats};
use farkle_core::{FarkleAction, FarkleState, RngState, TurnError};

impl SearchState for FarkleState {
    type Action = FarkleAction;
    type Error = TurnError;

    fn legal_actions(&self) -> Vec<FarkleAction> {
        self.possible_actions()
    }

    fn apply(&self, action: &FarkleAction, rng: &mut RngState) -> Result<Self, TurnError> {
        self.take_action(action, rng)
    }

    fn is_terminal(&self) -> bool {
        FarkleState::is_terminal(self)
    }

    fn reward(&self) -> f64 {
        FarkleState::reward(self)
    }
}

/// Picks the next action for `state` by running one search under the
/// configured budget.
pub fn search(
    state: &FarkleState,
    config: &AutoplayConfig,
    rng: &mut RngState,
) -> Result<(FarkleAction, SearchStats), AutoplayError> {
    config.validate()?;
    if state.is_terminal() || state.possible_actions().is_empty() {
        return Err(AutoplayError::NoLegalAction);
    }
    let budget = config.budget()?;
    let mut tree = Mcts::new(state.clone(), config.exploration_c);
    let stats = tree.run(&config.rollout, budget, rng)?;
    let action = tree.best_action().ok_or(AutoplayError::NoLegalAction)?;
    log::debug!(
        "roll {} bank {}: chose {} ({} visits, mean {:.1})",
        state.roll(),
        state.bank(),
        action.short_label(),
        stats.selected_visits,
        stats.selected_value
    );
    Ok((action, stats))
}
