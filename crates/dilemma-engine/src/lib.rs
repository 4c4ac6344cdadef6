//! Round engine for the iterated Prisoner's Dilemma
//!
//! Core logic for two-participant matches under a configurable payoff matrix.
//! This crate is compiled to:
//! - Native (for the terminal host)
//! - WASM (for browser front ends)

mod config;
mod error;
mod feedback;
mod game;
mod metrics;
mod payoff;
mod random;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{Control, GameMode, MatchConfig, ParticipantSpec, Seat};
pub use error::{ConfigError, Rejection};
pub use feedback::{generate_feedback, narrative, Feedback, Standing};
pub use game::{
    run_match, Autoplay, MatchState, Outcome, Participant, Phase, Round,
    DEFAULT_AUTOPLAY_DELAY_MS, MAX_AUTOPLAY_DELAY_MS, MIN_AUTOPLAY_DELAY_MS,
};
pub use metrics::MatchMetrics;
pub use payoff::{Payout, PayoffMatrix, DEFAULT_PAYOFF_MATRIX, PAYOFF_KEYS};
pub use random::SeededRng;
pub use strategy::{execute_strategy, Choice, Decision, StrategyKind};
