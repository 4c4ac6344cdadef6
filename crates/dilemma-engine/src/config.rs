//! Match configuration
//!
//! A `MatchConfig` is consumed exactly once to build the initial match state.
//! Every check happens here so a bad configuration never reaches round 1.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::payoff::PayoffMatrix;
use crate::strategy::StrategyKind;

/// Seat of a participant. Seat A is always the first key of the payoff matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub fn opponent(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => f.write_str("A"),
            Seat::B => f.write_str("B"),
        }
    }
}

/// Who controls each seat
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Seat A is human, seat B is strategy-operated.
    #[default]
    HumanVsBot,
    BotVsBot,
    HumanVsHuman,
}

impl GameMode {
    /// Whether the mode makes the given seat strategy-operated
    pub fn is_automated(self, seat: Seat) -> bool {
        match self {
            GameMode::HumanVsBot => seat == Seat::B,
            GameMode::BotVsBot => true,
            GameMode::HumanVsHuman => false,
        }
    }
}

/// Control mode of a live participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Human,
    Strategy(StrategyKind),
}

/// Static identity of a participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
}

impl ParticipantSpec {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), strategy: None }
    }

    pub fn bot(id: impl Into<String>, name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self { id: id.into(), name: name.into(), strategy: Some(strategy) }
    }
}

/// Complete configuration of one match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub mode: GameMode,
    /// Total rounds. Signed so a non-positive value can be reported.
    pub rounds: i64,
    pub initial_stake: i64,
    pub seed: u32,
    /// Cooperation chance used by the `random` strategy, in [0, 1]
    pub cooperation_probability: f64,
    pub payoff_matrix: PayoffMatrix,
    pub player_a: ParticipantSpec,
    pub player_b: ParticipantSpec,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::HumanVsBot,
            rounds: 10,
            initial_stake: 1000,
            seed: 12345,
            cooperation_probability: 0.5,
            payoff_matrix: PayoffMatrix::default(),
            player_a: ParticipantSpec::human("player1", "Player A"),
            player_b: ParticipantSpec::bot("player2", "Player B", StrategyKind::Random),
        }
    }
}

impl MatchConfig {
    /// Bot-vs-bot configuration with the remaining fields at their defaults
    pub fn bot_vs_bot(strategy_a: StrategyKind, strategy_b: StrategyKind) -> Self {
        Self {
            mode: GameMode::BotVsBot,
            player_a: ParticipantSpec::bot("player1", "Player A", strategy_a),
            player_b: ParticipantSpec::bot("player2", "Player B", strategy_b),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration without validating it, so callers can
    /// apply overrides first.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        // Strategy tags go through `FromStr` so an unknown tag is reported
        // the same way as on the command line.
        for key in ["player_a", "player_b"] {
            let tag = value
                .get(key)
                .and_then(|spec| spec.get("strategy"))
                .and_then(serde_json::Value::as_str);
            if let Some(tag) = tag {
                tag.parse::<StrategyKind>()?;
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn spec(&self, seat: Seat) -> &ParticipantSpec {
        match seat {
            Seat::A => &self.player_a,
            Seat::B => &self.player_b,
        }
    }

    /// Run every configuration check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds <= 0 {
            return Err(ConfigError::NonPositiveRounds(self.rounds));
        }
        if self.rounds > i64::from(u32::MAX) {
            return Err(ConfigError::TooManyRounds(self.rounds));
        }

        let p = self.cooperation_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidCooperationProbability(p));
        }

        for seat in [Seat::A, Seat::B] {
            self.control(seat)?;
        }

        Ok(())
    }

    /// Control mode the configuration assigns to a seat
    pub fn control(&self, seat: Seat) -> Result<Control, ConfigError> {
        match (self.mode.is_automated(seat), self.spec(seat).strategy) {
            (true, Some(kind)) => Ok(Control::Strategy(kind)),
            (true, None) => Err(ConfigError::MissingStrategy { seat }),
            (false, None) => Ok(Control::Human),
            (false, Some(_)) => Err(ConfigError::UnexpectedStrategy { seat }),
        }
    }
}
