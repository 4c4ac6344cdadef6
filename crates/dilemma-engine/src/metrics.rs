//! Aggregate statistics over a round history
//!
//! Pure reductions: the same history always yields the same metrics.

use serde::{Deserialize, Serialize};

use crate::config::Seat;
use crate::game::{Outcome, Round};
use crate::strategy::Choice;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchMetrics {
    /// Percentage of rounds in which A cooperated, 0 for an empty history
    pub cooperation_rate_a: f64,
    pub cooperation_rate_b: f64,
    pub mutual_cooperations: u32,
    pub mutual_defections: u32,
    /// Rounds where A defected against a cooperating B
    pub exploitations_by_a: u32,
    pub exploitations_by_b: u32,
    /// First round in which either participant defected
    pub first_defection_round: Option<u32>,
    pub longest_cooperation_streak: u32,
}

impl MatchMetrics {
    pub fn from_rounds(rounds: &[Round]) -> Self {
        if rounds.is_empty() {
            return Self::default();
        }

        let mut metrics = Self::default();
        let mut streak = 0u32;
        for round in rounds {
            match round.outcome() {
                Outcome::MutualCooperation => {
                    metrics.mutual_cooperations += 1;
                    streak += 1;
                    metrics.longest_cooperation_streak =
                        metrics.longest_cooperation_streak.max(streak);
                }
                outcome => {
                    streak = 0;
                    metrics.first_defection_round.get_or_insert(round.number);
                    match outcome {
                        Outcome::MutualDefection => metrics.mutual_defections += 1,
                        Outcome::Exploitation { defector: Seat::A } => {
                            metrics.exploitations_by_a += 1
                        }
                        Outcome::Exploitation { defector: Seat::B } => {
                            metrics.exploitations_by_b += 1
                        }
                        Outcome::MutualCooperation => {}
                    }
                }
            }
        }

        metrics.cooperation_rate_a = cooperation_rate(rounds, Seat::A);
        metrics.cooperation_rate_b = cooperation_rate(rounds, Seat::B);
        metrics
    }

    /// Mean of both participants' cooperation rates
    pub fn average_cooperation_rate(&self) -> f64 {
        (self.cooperation_rate_a + self.cooperation_rate_b) / 2.0
    }

    pub fn total_exploitations(&self) -> u32 {
        self.exploitations_by_a + self.exploitations_by_b
    }

    pub fn exploitations_by(&self, seat: Seat) -> u32 {
        match seat {
            Seat::A => self.exploitations_by_a,
            Seat::B => self.exploitations_by_b,
        }
    }
}

fn cooperation_rate(rounds: &[Round], seat: Seat) -> f64 {
    let cooperations = rounds
        .iter()
        .filter(|r| r.choice(seat) == Choice::Cooperate)
        .count();
    cooperations as f64 / rounds.len() as f64 * 100.0
}
