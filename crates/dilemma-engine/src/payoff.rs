//! Payoff matrix and resolution
//!
//! Keys are ordered (participant A's choice, participant B's choice).
//! No dominance constraints are imposed on the payouts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Choice;

/// Payout pair: (to participant A, to participant B)
pub type Payout = (i32, i32);

/// Wire keys, in storage order.
pub const PAYOFF_KEYS: [&str; 4] = ["CC", "CT", "TC", "TT"];

/// Payoff matrix for the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, [i32; 2]>",
    into = "BTreeMap<String, [i32; 2]>"
)]
pub struct PayoffMatrix {
    entries: [Payout; 4],
}

impl PayoffMatrix {
    pub const fn new(cc: Payout, ct: Payout, tc: Payout, tt: Payout) -> Self {
        Self { entries: [cc, ct, tc, tt] }
    }

    /// Build from keyed entries. Every key must be present exactly once.
    pub fn from_entries<K, I>(entries: I) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Payout)>,
    {
        let mut slots: [Option<Payout>; 4] = [None; 4];
        for (key, payout) in entries {
            let key = key.as_ref();
            let index = PAYOFF_KEYS
                .iter()
                .position(|k| *k == key)
                .ok_or_else(|| ConfigError::UnknownPayoffKey(key.to_string()))?;
            slots[index] = Some(payout);
        }

        let mut resolved = [(0, 0); 4];
        for (index, slot) in slots.into_iter().enumerate() {
            resolved[index] = slot.ok_or(ConfigError::MissingPayoffKey(PAYOFF_KEYS[index]))?;
        }
        Ok(Self { entries: resolved })
    }

    /// Returns (payout_a, payout_b)
    pub fn resolve(&self, a: Choice, b: Choice) -> Payout {
        self.entries[Self::index(a, b)]
    }

    fn index(a: Choice, b: Choice) -> usize {
        match (a, b) {
            (Choice::Cooperate, Choice::Cooperate) => 0,
            (Choice::Cooperate, Choice::Defect) => 1,
            (Choice::Defect, Choice::Cooperate) => 2,
            (Choice::Defect, Choice::Defect) => 3,
        }
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        DEFAULT_PAYOFF_MATRIX
    }
}

/// The classic matrix: temptation 5, reward 3, punishment 1, sucker 0.
pub const DEFAULT_PAYOFF_MATRIX: PayoffMatrix =
    PayoffMatrix::new((3, 3), (0, 5), (5, 0), (1, 1));

impl TryFrom<BTreeMap<String, [i32; 2]>> for PayoffMatrix {
    type Error = ConfigError;

    fn try_from(map: BTreeMap<String, [i32; 2]>) -> Result<Self, Self::Error> {
        Self::from_entries(map.into_iter().map(|(k, [a, b])| (k, (a, b))))
    }
}

impl From<PayoffMatrix> for BTreeMap<String, [i32; 2]> {
    fn from(matrix: PayoffMatrix) -> Self {
        PAYOFF_KEYS
            .iter()
            .zip(matrix.entries)
            .map(|(k, (a, b))| (k.to_string(), [a, b]))
            .collect()
    }
}
