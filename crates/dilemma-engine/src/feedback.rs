//! End-of-match report: standings, metrics and narrative commentary

use serde::{Deserialize, Serialize};

use crate::config::Seat;
use crate::game::MatchState;
use crate::metrics::MatchMetrics;
use crate::strategy::StrategyKind;

/// Mutual defection share above which it is called dominant
const DOMINANT_DEFECTION_SHARE: f64 = 0.7;

/// Streak length counted as sustained cooperation
const SUSTAINED_STREAK: u32 = 3;

/// Average cooperation rate (percent) below which cooperation is called low
const LOW_COOPERATION_RATE: f64 = 30.0;

/// Matches shorter than this get the counterfactual remark
const SHORT_MATCH_ROUNDS: usize = 20;

/// Final standing by score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Winner(Seat),
    Tie,
}

impl Standing {
    pub fn from_scores(score_a: i64, score_b: i64) -> Self {
        match score_a.cmp(&score_b) {
            core::cmp::Ordering::Greater => Standing::Winner(Seat::A),
            core::cmp::Ordering::Less => Standing::Winner(Seat::B),
            core::cmp::Ordering::Equal => Standing::Tie,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub metrics: MatchMetrics,
    /// Strategies in play, seat A first
    pub strategies: Vec<StrategyKind>,
    pub standing: Standing,
    pub text: String,
}

/// Build the report for a match. Usually called once the match has ended,
/// but any state is accepted.
pub fn generate_feedback(state: &MatchState) -> Feedback {
    let metrics = MatchMetrics::from_rounds(state.rounds());
    let strategies = state.strategies();
    let text = narrative(&metrics, &strategies, state.rounds().len());
    let standing = Standing::from_scores(state.player_a().score, state.player_b().score);

    Feedback { metrics, strategies, standing, text }
}

/// Concatenate every observation whose condition holds, in fixed order.
pub fn narrative(metrics: &MatchMetrics, strategies: &[StrategyKind], total_rounds: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let played = |kind: StrategyKind| strategies.contains(&kind);
    let mutual_cooperations = metrics.mutual_cooperations as usize;
    let mutual_defections = metrics.mutual_defections as usize;

    if !strategies.is_empty() {
        let described: Vec<&str> = strategies.iter().map(|s| strategy_summary(*s)).collect();
        parts.push(format!("Strategies in play: {}.", described.join(" vs ")));
    }

    // Observed patterns
    if total_rounds > 0 && mutual_cooperations == total_rounds {
        parts.push(
            "Cooperation was perfect for the whole match, maximizing the mutual benefit.".into(),
        );
    }
    if mutual_defections as f64 > total_rounds as f64 * DOMINANT_DEFECTION_SHARE {
        parts.push(
            "Mutual defection dominated the match, sharply reducing what both sides earned."
                .into(),
        );
    }
    if metrics.longest_cooperation_streak >= SUSTAINED_STREAK {
        parts.push(format!(
            "Cooperation was sustained for {} consecutive rounds, showing trust being built.",
            metrics.longest_cooperation_streak
        ));
    }
    if total_rounds > 0 && metrics.average_cooperation_rate() < LOW_COOPERATION_RATE {
        parts.push(format!(
            "With only {:.0}% cooperation on average, both participants ended with suboptimal results.",
            metrics.average_cooperation_rate()
        ));
    }

    // Strategy-specific commentary
    if played(StrategyKind::AlwaysDefect) {
        parts.push(
            "The aggressive strategy grabbed short-term gains but eroded any chance of future cooperation."
                .into(),
        );
    }
    if played(StrategyKind::TitForTat) {
        if metrics.mutual_cooperations > 0 {
            parts.push(
                "Tit for Tat stabilized cooperation by answering in kind: it punished betrayals but left room for reconciliation."
                    .into(),
            );
        } else {
            parts.push("Tit for Tat could not establish cooperation given its opponent's behavior.".into());
        }
    }
    if played(StrategyKind::GrimTrigger) {
        if let Some(round) = metrics.first_defection_round {
            parts.push(format!(
                "Grim Trigger cut off cooperation for good after the first betrayal in round {}.",
                round
            ));
        }
    }
    if played(StrategyKind::AlwaysCooperate) && metrics.total_exploitations() > 0 {
        parts.push(format!(
            "Unconditional cooperation was exploited {} time(s), showing the weakness of blind trust.",
            metrics.total_exploitations()
        ));
    }

    // Counterfactual
    if total_rounds < SHORT_MATCH_ROUNDS && mutual_defections > mutual_cooperations {
        parts.push(
            "With more rounds, cooperative strategies might have had the chance to establish reciprocity."
                .into(),
        );
    }

    // Closing guidance
    if metrics.longest_cooperation_streak > 0 {
        parts.push(
            "In real teams, building trust gradually and responding proportionally to others fosters lasting collaboration."
                .into(),
        );
    } else {
        parts.push(
            "Without mutual trust, collaborative settings can end where everyone loses, even when cooperating would benefit all."
                .into(),
        );
    }

    parts.join(" ")
}

fn strategy_summary(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::AlwaysCooperate => "Always Cooperate (total trust)",
        StrategyKind::AlwaysDefect => "Always Defect (aggressive maximization)",
        StrategyKind::TitForTat => "Tit for Tat (immediate reciprocity)",
        StrategyKind::GrimTrigger => "Grim Trigger (zero tolerance)",
        StrategyKind::Random => "Random (unpredictable behavior)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::game::run_match;

    fn metrics(
        mutual_cooperations: u32,
        mutual_defections: u32,
        streak: u32,
        rates: (f64, f64),
    ) -> MatchMetrics {
        MatchMetrics {
            cooperation_rate_a: rates.0,
            cooperation_rate_b: rates.1,
            mutual_cooperations,
            mutual_defections,
            longest_cooperation_streak: streak,
            ..MatchMetrics::default()
        }
    }

    #[test]
    fn test_standing() {
        assert_eq!(Standing::from_scores(10, 3), Standing::Winner(Seat::A));
        assert_eq!(Standing::from_scores(-1, 3), Standing::Winner(Seat::B));
        assert_eq!(Standing::from_scores(7, 7), Standing::Tie);
    }

    #[test]
    fn test_perfect_cooperation() {
        let text = narrative(&metrics(5, 0, 5, (100.0, 100.0)), &[], 5);
        assert!(text.contains("Cooperation was perfect"));
        assert!(text.contains("sustained for 5 consecutive rounds"));
        assert!(text.contains("building trust gradually"));
        assert!(!text.contains("Strategies in play"));
    }

    #[test]
    fn test_dominant_defection() {
        let text = narrative(&metrics(0, 8, 0, (0.0, 0.0)), &[StrategyKind::AlwaysDefect], 10);
        assert!(text.starts_with("Strategies in play: Always Defect (aggressive maximization)."));
        assert!(text.contains("Mutual defection dominated"));
        assert!(text.contains("With only 0% cooperation"));
        assert!(text.contains("aggressive strategy"));
        assert!(text.contains("With more rounds"));
        assert!(text.contains("Without mutual trust"));
    }

    #[test]
    fn test_exactly_seventy_percent_is_not_dominant() {
        let text = narrative(&metrics(0, 7, 0, (30.0, 30.0)), &[], 10);
        assert!(!text.contains("Mutual defection dominated"));
        assert!(!text.contains("cooperation on average"));
    }

    #[test]
    fn test_empty_history_is_not_perfect() {
        let text = narrative(&MatchMetrics::default(), &[], 0);
        assert!(!text.contains("perfect"));
        assert!(text.contains("Without mutual trust"));
    }

    #[test]
    fn test_observations_keep_fixed_order() {
        let feedback = generate_feedback(
            &run_match(MatchConfig::bot_vs_bot(StrategyKind::TitForTat, StrategyKind::GrimTrigger))
                .unwrap(),
        );
        let text = &feedback.text;
        assert_eq!(feedback.standing, Standing::Tie);
        assert_eq!(feedback.strategies, vec![StrategyKind::TitForTat, StrategyKind::GrimTrigger]);

        let perfect = text.find("Cooperation was perfect").unwrap();
        let streak = text.find("sustained for 10").unwrap();
        let tft = text.find("Tit for Tat stabilized").unwrap();
        let closing = text.find("building trust gradually").unwrap();
        assert!(perfect < streak && streak < tft && tft < closing);
        // Nobody defected, so Grim Trigger has nothing to comment on
        assert!(!text.contains("cut off cooperation"));
    }

    #[test]
    fn test_grim_and_exploitation_remarks() {
        let feedback = generate_feedback(
            &run_match(MatchConfig::bot_vs_bot(
                StrategyKind::AlwaysCooperate,
                StrategyKind::AlwaysDefect,
            ))
            .unwrap(),
        );
        assert!(feedback.text.contains("exploited 10 time(s)"));
        assert_eq!(feedback.standing, Standing::Winner(Seat::B));

        let feedback = generate_feedback(
            &run_match(MatchConfig::bot_vs_bot(StrategyKind::GrimTrigger, StrategyKind::AlwaysDefect))
                .unwrap(),
        );
        assert!(feedback.text.contains("first betrayal in round 1"));
        assert!(!feedback.text.contains("Tit for Tat"));
    }
}
