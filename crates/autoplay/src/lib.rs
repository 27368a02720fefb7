//! Seeded Monte Carlo tree search over Farkle turns.

mod config;
mod error;
mod mcts;
mod rollout;
mod search;
mod trace;
mod turn;

pub use config::*;
pub use error::*;
pub use mcts::*;
pub use rollout::*;
pub use search::*;
pub use trace::*;
pub use turn::*;
