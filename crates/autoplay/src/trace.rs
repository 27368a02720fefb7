use crate::{AutoplayError, SearchStats};
use farkle_core::FarkleAction;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnStatus {
    Banked,
    Farkled,
    MaxSteps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub roll_before: Vec<u8>,
    pub bank_before: u32,
    pub action: FarkleAction,
    pub mcts: SearchStats,
    pub roll_after: Vec<u8>,
    pub bank_after: u32,
    pub terminal: bool,
    #[serde(default)]
    pub event_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub steps: u32,
    pub total_iterations: u64,
    pub wall_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    pub status: TurnStatus,
    pub score: u32,
    pub opening_roll: Vec<u8>,
    pub steps: Vec<StepRecord>,
    pub summary: SummaryStats,
}

impl TurnResult {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!(
                "status: {} score: {}",
                turn_status_label(self.status),
                self.score
            ),
            format!("opening roll: {:?}", self.opening_roll),
            format!(
                "summary: steps={} iterations={} wall_ms={}",
                self.summary.steps, self.summary.total_iterations, self.summary.wall_time_ms
            ),
        ];
        for step in &self.steps {
            lines.push(format!(
                "  step {:>3} | {}",
                step.step,
                step.action.short_label()
            ));
            lines.push(format!(
                "    roll {:?} bank {} -> roll {:?} bank {}{}",
                step.roll_before,
                step.bank_before,
                step.roll_after,
                step.bank_after,
                if step.terminal { " (end)" } else { "" }
            ));
            lines.push(format!(
                "    search: iterations={} elapsed={}ms children={} pick_visits={} pick_value={:.2} nodes={}",
                step.mcts.iterations,
                step.mcts.elapsed_ms,
                step.mcts.root_children,
                step.mcts.selected_visits,
                step.mcts.selected_value,
                step.mcts.nodes
            ));
        }
        lines.join("\n")
    }
}

/// Several independent turns played back to back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub seed: u64,
    pub turns: Vec<TurnResult>,
    pub mean_score: f64,
}

impl SessionResult {
    pub fn new(seed: u64, turns: Vec<TurnResult>) -> Self {
        let mean_score = if turns.is_empty() {
            0.0
        } else {
            turns.iter().map(|turn| turn.score as f64).sum::<f64>() / turns.len() as f64
        };
        Self {
            seed,
            turns,
            mean_score,
        }
    }

    pub fn scores(&self) -> Vec<u32> {
        self.turns.iter().map(|turn| turn.score).collect()
    }

    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("seed: {}", self.seed),
            format!("turns: {}", self.turns.len()),
            format!("scores: {:?}", self.scores()),
            format!("mean score: {:.2}", self.mean_score),
        ];
        for (idx, turn) in self.turns.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("turn {}", idx + 1));
            lines.push(turn.to_text_report());
        }
        lines.join("\n")
    }
}

fn turn_status_label(status: TurnStatus) -> &'static str {
    match status {
        TurnStatus::Banked => "banked",
        TurnStatus::Farkled => "farkled",
        TurnStatus::MaxSteps => "max-steps",
    }
}

pub fn write_json(path: &Path, result: &SessionResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, result: &SessionResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, result.to_text_report())?;
    Ok(())
}
