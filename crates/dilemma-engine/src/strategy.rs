//! Strategy definitions and execution

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::SeededRng;

/// A choice in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    #[serde(rename = "C")]
    Cooperate,
    #[serde(rename = "T")]
    Defect,
}

impl Choice {
    pub fn letter(self) -> char {
        match self {
            Choice::Cooperate => 'C',
            Choice::Defect => 'T',
        }
    }
}

/// Decision policy of a strategy-operated participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Always cooperate, never defect.
    AlwaysCooperate,
    /// Always defect, never cooperate.
    AlwaysDefect,
    /// Copy opponent's last choice. Start with cooperate.
    TitForTat,
    /// Cooperate until opponent defects once, then always defect.
    GrimTrigger,
    /// Cooperate with the configured probability each round.
    Random,
}

impl StrategyKind {
    /// Catalogue order, as offered to configuration forms.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::AlwaysCooperate,
        StrategyKind::AlwaysDefect,
        StrategyKind::TitForTat,
        StrategyKind::GrimTrigger,
        StrategyKind::Random,
    ];

    /// Stable configuration tag
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "always_cooperate",
            StrategyKind::AlwaysDefect => "always_defect",
            StrategyKind::TitForTat => "tit_for_tat",
            StrategyKind::GrimTrigger => "grim_trigger",
            StrategyKind::Random => "random",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "Always Cooperate",
            StrategyKind::AlwaysDefect => "Always Defect",
            StrategyKind::TitForTat => "Tit for Tat",
            StrategyKind::GrimTrigger => "Grim Trigger",
            StrategyKind::Random => "Random",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "Cooperates every round.",
            StrategyKind::AlwaysDefect => "Defects every round.",
            StrategyKind::TitForTat => "Cooperates first, then copies the opponent's last choice.",
            StrategyKind::GrimTrigger => "Cooperates until betrayed once, then always defects.",
            StrategyKind::Random => "Cooperates at random with the configured probability.",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| ConfigError::UnknownStrategy(tag.to_string()))
    }
}

/// Outcome of one strategy invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub choice: Choice,
    /// Grim trigger latch after this decision
    pub triggered: bool,
}

/// Execute a strategy for one round
///
/// # Arguments
/// * `kind` - The strategy to execute
/// * `_my_history` - Our past choices (no current strategy reads it)
/// * `opponent_history` - Opponent's past choices
/// * `triggered` - Our grim trigger latch going into this round
/// * `rng` - Match-wide random source, drawn once by `Random` only
/// * `cooperation_probability` - Cooperation chance for `Random`
pub fn execute_strategy(
    kind: StrategyKind,
    _my_history: &[Choice],
    opponent_history: &[Choice],
    triggered: bool,
    rng: &mut SeededRng,
    cooperation_probability: f64,
) -> Decision {
    match kind {
        StrategyKind::AlwaysCooperate => Decision { choice: Choice::Cooperate, triggered },
        StrategyKind::AlwaysDefect => Decision { choice: Choice::Defect, triggered },
        StrategyKind::TitForTat => Decision {
            choice: execute_tit_for_tat(opponent_history),
            triggered,
        },
        StrategyKind::GrimTrigger => execute_grim_trigger(opponent_history, triggered),
        StrategyKind::Random => Decision {
            choice: execute_random(rng, cooperation_probability),
            triggered,
        },
    }
}

/// Tit-for-Tat: Copy opponent's last choice, start with cooperate
fn execute_tit_for_tat(opponent_history: &[Choice]) -> Choice {
    opponent_history.last().copied().unwrap_or(Choice::Cooperate)
}

/// Grim Trigger: Cooperate until opponent defects, then always defect
fn execute_grim_trigger(opponent_history: &[Choice], triggered: bool) -> Decision {
    if triggered || opponent_history.contains(&Choice::Defect) {
        Decision { choice: Choice::Defect, triggered: true }
    } else {
        Decision { choice: Choice::Cooperate, triggered: false }
    }
}

/// Random: exactly one draw per invocation
fn execute_random(rng: &mut SeededRng, cooperation_probability: f64) -> Choice {
    if rng.next() < cooperation_probability {
        Choice::Cooperate
    } else {
        Choice::Defect
    }
}
