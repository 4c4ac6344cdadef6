//! Error types for match configuration and state transitions

use thiserror::Error;

use crate::config::{GameMode, Seat};

/// Raised while building a match, before any round runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("round count must be positive, got {0}")]
    NonPositiveRounds(i64),

    #[error("round count {0} exceeds the supported maximum of {max}", max = u32::MAX)]
    TooManyRounds(i64),

    #[error("payoff matrix is missing key {0}")]
    MissingPayoffKey(&'static str),

    #[error("payoff matrix has unknown key {0}")]
    UnknownPayoffKey(String),

    #[error("cooperation probability must be within [0, 1], got {0}")]
    InvalidCooperationProbability(f64),

    #[error("participant {seat} is automated in this mode but has no strategy")]
    MissingStrategy { seat: Seat },

    #[error("participant {seat} is human in this mode but carries a strategy")]
    UnexpectedStrategy { seat: Seat },

    #[error("mode {0:?} has human seats and cannot run unattended")]
    HumanSeats(GameMode),

    #[error("malformed match configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// A state machine request that was refused. The match state is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("match has already ended")]
    MatchEnded,

    #[error("participant {0} has already confirmed a choice")]
    AlreadyConfirmed(Seat),

    #[error("round has already been revealed")]
    AlreadyRevealed,

    #[error("both participants must confirm before reveal")]
    NotConfirmed,

    #[error("round has not been revealed yet")]
    NotRevealed,

    #[error("participant {0} is strategy-operated")]
    AutomatedSeat(Seat),

    #[error("autoplay is only available for bot-vs-bot matches")]
    AutoplayUnavailable,

    #[error("no participant with id {0}")]
    UnknownParticipant(String),
}

/// Early-return guard for state machine operations.
macro_rules! require {
    ($cond:expr, $rejection:expr) => {
        if !$cond {
            let rejection = $rejection;
            log::debug!("rejected: {}", rejection);
            return Err(rejection);
        }
    };
}

pub(crate) use require;
