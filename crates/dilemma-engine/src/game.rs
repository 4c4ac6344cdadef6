//! Round state machine
//!
//! `MatchState` is the single owned unit of truth for a match. Every
//! operation runs to completion on `&mut self`; hosts that dispatch
//! concurrently must serialize access themselves.
//!
//! ```text
//! AwaitingChoices -> BothConfirmed -> Revealed -> AwaitingChoices (next round)
//!                                              \-> MatchEnded
//! ```

use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Control, GameMode, MatchConfig, Seat};
use crate::error::{require, ConfigError, Rejection};
use crate::random::SeededRng;
use crate::strategy::{execute_strategy, Choice, StrategyKind};

/// Default pause between autoplay ticks, in milliseconds
pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 1000;
pub const MIN_AUTOPLAY_DELAY_MS: u64 = 200;
pub const MAX_AUTOPLAY_DELAY_MS: u64 = 1800;

/// Live record of one participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub control: Control,
    /// Starts at the initial stake; may go negative
    pub score: i64,
    /// One entry per completed round
    pub history: Vec<Choice>,
    /// Choice for the current round, cleared on advance
    pub pending: Option<Choice>,
    pub confirmed: bool,
    /// Grim trigger latch; never unset once set
    pub triggered: bool,
}

impl Participant {
    fn new(id: &str, name: &str, control: Control, stake: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            control,
            score: stake,
            history: Vec::new(),
            pending: None,
            confirmed: false,
            triggered: false,
        }
    }

    pub fn strategy(&self) -> Option<StrategyKind> {
        match self.control {
            Control::Human => None,
            Control::Strategy(kind) => Some(kind),
        }
    }

    pub fn is_automated(&self) -> bool {
        self.strategy().is_some()
    }

    fn confirm(&mut self, choice: Choice) {
        self.pending = Some(choice);
        self.confirmed = true;
    }

    fn reset_choice(&mut self) {
        self.pending = None;
        self.confirmed = false;
    }
}

/// Classification of a resolved round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MutualCooperation,
    MutualDefection,
    /// One side defected while the other cooperated
    Exploitation { defector: Seat },
}

/// Result of a single round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, contiguous
    pub number: u32,
    pub choice_a: Choice,
    pub choice_b: Choice,
    pub payout_a: i32,
    pub payout_b: i32,
    /// Scores after this round's payout
    pub total_a: i64,
    pub total_b: i64,
}

impl Round {
    pub fn outcome(&self) -> Outcome {
        match (self.choice_a, self.choice_b) {
            (Choice::Cooperate, Choice::Cooperate) => Outcome::MutualCooperation,
            (Choice::Defect, Choice::Defect) => Outcome::MutualDefection,
            (Choice::Defect, Choice::Cooperate) => Outcome::Exploitation { defector: Seat::A },
            (Choice::Cooperate, Choice::Defect) => Outcome::Exploitation { defector: Seat::B },
        }
    }

    pub fn choice(&self, seat: Seat) -> Choice {
        match seat {
            Seat::A => self.choice_a,
            Seat::B => self.choice_b,
        }
    }
}

/// Autoplay controls (bot-vs-bot only)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoplay {
    pub enabled: bool,
    pub delay_ms: u64,
}

impl Autoplay {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for Autoplay {
    fn default() -> Self {
        Self { enabled: false, delay_ms: DEFAULT_AUTOPLAY_DELAY_MS }
    }
}

/// Lifecycle position of the current round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingChoices,
    /// Both confirmed, reveal pending. Hosts usually present this as waiting.
    BothConfirmed,
    Revealed,
    MatchEnded,
}

/// Complete mutable state of one match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    config: MatchConfig,
    current_round: u32,
    rounds: Vec<Round>,
    player_a: Participant,
    player_b: Participant,
    ended: bool,
    revealed: bool,
    autoplay: Autoplay,
    rng: SeededRng,
}

impl MatchState {
    /// Build the initial state at round 1. Automated seats submit immediately.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let control_a = config.control(Seat::A)?;
        let control_b = config.control(Seat::B)?;
        let player_a = Participant::new(
            &config.player_a.id,
            &config.player_a.name,
            control_a,
            config.initial_stake,
        );
        let player_b = Participant::new(
            &config.player_b.id,
            &config.player_b.name,
            control_b,
            config.initial_stake,
        );

        info!(
            "match started: {:?}, {} rounds, seed {}, {} vs {}",
            config.mode, config.rounds, config.seed, player_a.name, player_b.name
        );

        let mut state = Self {
            rng: SeededRng::new(config.seed),
            config,
            current_round: 1,
            rounds: Vec::new(),
            player_a,
            player_b,
            ended: false,
            revealed: false,
            autoplay: Autoplay::default(),
        };
        state.submit_automated();
        Ok(state)
    }

    // ── Read-only view ──────────────────────────────────────────────

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// 1-based number of the round in play (or last played, once ended)
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        u32::try_from(self.config.rounds).unwrap_or(u32::MAX)
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn participant(&self, seat: Seat) -> &Participant {
        match seat {
            Seat::A => &self.player_a,
            Seat::B => &self.player_b,
        }
    }

    pub fn player_a(&self) -> &Participant {
        &self.player_a
    }

    pub fn player_b(&self) -> &Participant {
        &self.player_b
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn autoplay(&self) -> Autoplay {
        self.autoplay
    }

    pub fn phase(&self) -> Phase {
        if self.ended {
            Phase::MatchEnded
        } else if self.revealed {
            Phase::Revealed
        } else if self.player_a.confirmed && self.player_b.confirmed {
            Phase::BothConfirmed
        } else {
            Phase::AwaitingChoices
        }
    }

    /// Resolve a participant id to its seat
    pub fn seat_of(&self, id: &str) -> Option<Seat> {
        [Seat::A, Seat::B]
            .into_iter()
            .find(|seat| self.participant(*seat).id == id)
    }

    /// Strategies in play, seat A first
    pub fn strategies(&self) -> Vec<StrategyKind> {
        [&self.player_a, &self.player_b]
            .iter()
            .filter_map(|p| p.strategy())
            .collect()
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Record a human participant's choice for the current round
    pub fn submit_choice(&mut self, seat: Seat, choice: Choice) -> Result<(), Rejection> {
        require!(!self.ended, Rejection::MatchEnded);
        require!(!self.revealed, Rejection::AlreadyRevealed);

        let participant = self.participant_mut(seat);
        require!(!participant.is_automated(), Rejection::AutomatedSeat(seat));
        require!(!participant.confirmed, Rejection::AlreadyConfirmed(seat));

        participant.confirm(choice);
        debug!("round {}: seat {} confirmed", self.current_round, seat);
        Ok(())
    }

    /// `submit_choice` addressed by participant id
    pub fn submit_choice_for(&mut self, id: &str, choice: Choice) -> Result<(), Rejection> {
        let seat = self
            .seat_of(id)
            .ok_or_else(|| Rejection::UnknownParticipant(id.to_string()))?;
        self.submit_choice(seat, choice)
    }

    /// Score the round once both participants have confirmed
    pub fn reveal(&mut self) -> Result<Round, Rejection> {
        require!(!self.ended, Rejection::MatchEnded);
        require!(!self.revealed, Rejection::AlreadyRevealed);

        let (choice_a, choice_b) = match (self.player_a.pending, self.player_b.pending) {
            (Some(a), Some(b)) if self.player_a.confirmed && self.player_b.confirmed => (a, b),
            _ => {
                debug!("rejected: {}", Rejection::NotConfirmed);
                return Err(Rejection::NotConfirmed);
            }
        };

        let (payout_a, payout_b) = self.config.payoff_matrix.resolve(choice_a, choice_b);
        let round = Round {
            number: self.current_round,
            choice_a,
            choice_b,
            payout_a,
            payout_b,
            total_a: self.player_a.score.saturating_add(payout_a as i64),
            total_b: self.player_b.score.saturating_add(payout_b as i64),
        };

        self.rounds.push(round);
        self.player_a.score = round.total_a;
        self.player_b.score = round.total_b;
        self.player_a.history.push(choice_a);
        self.player_b.history.push(choice_b);
        self.revealed = true;

        debug!(
            "round {} revealed: {}{} -> ({}, {})",
            round.number,
            choice_a.letter(),
            choice_b.letter(),
            payout_a,
            payout_b
        );

        if self.current_round >= self.total_rounds() {
            self.ended = true;
            self.autoplay.enabled = false;
            info!(
                "match ended after {} rounds: {} {} - {} {}",
                self.rounds.len(),
                self.player_a.name,
                self.player_a.score,
                self.player_b.name,
                self.player_b.score
            );
        }

        Ok(round)
    }

    /// Move from a revealed round to the next one. Returns the new round number.
    pub fn advance(&mut self) -> Result<u32, Rejection> {
        require!(!self.ended, Rejection::MatchEnded);
        require!(self.revealed, Rejection::NotRevealed);

        self.current_round += 1;
        self.player_a.reset_choice();
        self.player_b.reset_choice();
        self.revealed = false;
        debug!("advanced to round {}", self.current_round);

        self.submit_automated();
        Ok(self.current_round)
    }

    /// One bot-vs-bot step: advance if needed, submit for both seats, reveal.
    ///
    /// Also serves as the manual "next round" step while autoplay is paused.
    pub fn autoplay_tick(&mut self) -> Result<Round, Rejection> {
        require!(self.config.mode == GameMode::BotVsBot, Rejection::AutoplayUnavailable);
        require!(!self.ended, Rejection::MatchEnded);

        if self.revealed {
            self.advance()?;
        }
        self.submit_automated();
        self.reveal()
    }

    pub fn set_autoplay(&mut self, enabled: bool) -> Result<(), Rejection> {
        require!(self.config.mode == GameMode::BotVsBot, Rejection::AutoplayUnavailable);
        require!(!self.ended, Rejection::MatchEnded);

        self.autoplay.enabled = enabled;
        debug!("autoplay {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    /// Flip autoplay, returning the new setting
    pub fn toggle_autoplay(&mut self) -> Result<bool, Rejection> {
        let enabled = !self.autoplay.enabled;
        self.set_autoplay(enabled)?;
        Ok(enabled)
    }

    /// Set the inter-round delay, clamped to the supported range
    pub fn set_autoplay_delay(&mut self, delay_ms: u64) -> Result<u64, Rejection> {
        require!(!self.ended, Rejection::MatchEnded);

        self.autoplay.delay_ms = delay_ms.clamp(MIN_AUTOPLAY_DELAY_MS, MAX_AUTOPLAY_DELAY_MS);
        debug!("autoplay delay {} ms", self.autoplay.delay_ms);
        Ok(self.autoplay.delay_ms)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn participant_mut(&mut self, seat: Seat) -> &mut Participant {
        match seat {
            Seat::A => &mut self.player_a,
            Seat::B => &mut self.player_b,
        }
    }

    /// Produce submissions for unconfirmed automated seats, A before B so
    /// the random draws happen in a fixed order.
    fn submit_automated(&mut self) {
        if self.ended || self.revealed {
            return;
        }
        for seat in [Seat::A, Seat::B] {
            self.submit_strategy_choice(seat);
        }
    }

    fn submit_strategy_choice(&mut self, seat: Seat) {
        let (me, opponent) = match seat {
            Seat::A => (&mut self.player_a, &self.player_b),
            Seat::B => (&mut self.player_b, &self.player_a),
        };
        let Control::Strategy(kind) = me.control else {
            return;
        };
        if me.confirmed {
            return;
        }

        let decision = execute_strategy(
            kind,
            &me.history,
            &opponent.history,
            me.triggered,
            &mut self.rng,
            self.config.cooperation_probability,
        );
        if decision.triggered && !me.triggered {
            debug!("seat {} grim trigger latched in round {}", seat, self.current_round);
        }
        me.triggered = me.triggered || decision.triggered;
        me.confirm(decision.choice);
    }
}

/// Run a bot-vs-bot match to completion
///
/// # Returns
/// The final state, in `Phase::MatchEnded`
pub fn run_match(config: MatchConfig) -> Result<MatchState, ConfigError> {
    if config.mode != GameMode::BotVsBot {
        return Err(ConfigError::HumanSeats(config.mode));
    }

    let mut state = MatchState::new(config)?;
    while !state.is_ended() {
        if let Err(rejection) = state.autoplay_tick() {
            warn!("match stopped early: {}", rejection);
            break;
        }
    }
    Ok(state)
}
