//! Farkle rules: dice, scoring and the turn state machine. Keep this crate
//! free of IO and platform concerns.

pub mod action;
pub mod config;
pub mod dice;
pub mod events;
pub mod rng;
pub mod scoring;
pub mod state;

pub use action::*;
pub use config::*;
pub use dice::*;
pub use events::*;
pub use rng::*;
pub use scoring::*;
pub use state::*;
