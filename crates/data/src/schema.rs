use serde::{Deserialize, Serialize};

pub use farkle_autoplay::{AutoplayConfig, GreedyRollout};
pub use farkle_core::{GameConfig, ThreePairsRule};

/// On-disk layout of a configuration file. Both sections are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FarkleConfig {
    pub game: GameConfig,
    pub search: AutoplayConfig,
}
