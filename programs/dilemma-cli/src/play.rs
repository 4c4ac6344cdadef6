//! Host loops: timers and prompts live here, the engine stays synchronous

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Result;
use dilemma_engine::{
    generate_feedback, Choice, Feedback, GameMode, MatchState, Outcome, Round, Seat, Standing,
};
use serde::Serialize;

/// Drive the match until it ends or the user quits
pub fn run(state: &mut MatchState, autoplay: bool, delay_ms: Option<u64>) -> Result<()> {
    if state.mode() == GameMode::BotVsBot {
        if let Some(delay) = delay_ms {
            state.set_autoplay_delay(delay)?;
        }
        if autoplay {
            run_autoplay(state)
        } else {
            run_stepped(state)
        }
    } else {
        if timer_flags_ignored(state.mode(), autoplay, delay_ms) {
            log::warn!("--autoplay and --delay-ms only apply to bot-vs-bot matches; ignoring");
        }
        run_interactive(state)
    }
}

/// Timer flags have no effect once a human seat paces the match
fn timer_flags_ignored(mode: GameMode, autoplay: bool, delay_ms: Option<u64>) -> bool {
    mode != GameMode::BotVsBot && (autoplay || delay_ms.is_some())
}

fn run_autoplay(state: &mut MatchState) -> Result<()> {
    state.set_autoplay(true)?;
    while state.autoplay().enabled {
        let round = state.autoplay_tick()?;
        print_round(state, &round);
        if !state.is_ended() {
            thread::sleep(state.autoplay().delay());
        }
    }
    Ok(())
}

fn run_stepped(state: &mut MatchState) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !state.is_ended() {
        print!("[Enter] next round, [q] quit: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        if line?.trim() == "q" {
            break;
        }
        let round = state.autoplay_tick()?;
        print_round(state, &round);
    }
    Ok(())
}

fn run_interactive(state: &mut MatchState) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !state.is_ended() {
        println!("Round {} of {}", state.current_round(), state.total_rounds());
        for seat in [Seat::A, Seat::B] {
            while !state.participant(seat).confirmed {
                print!("{}: [c]ooperate or [d]efect? ", state.participant(seat).name);
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    return Ok(());
                };
                let choice = match line?.trim() {
                    "c" | "C" => Choice::Cooperate,
                    "t" | "T" | "d" | "D" => Choice::Defect,
                    "q" => return Ok(()),
                    other => {
                        println!("  unrecognized choice {:?}", other);
                        continue;
                    }
                };
                if let Err(rejection) = state.submit_choice(seat, choice) {
                    println!("  {}", rejection);
                }
            }
        }

        let round = state.reveal()?;
        print_round(state, &round);
        if !state.is_ended() {
            state.advance()?;
        }
    }
    Ok(())
}

fn print_round(state: &MatchState, round: &Round) {
    let outcome = match round.outcome() {
        Outcome::MutualCooperation => "mutual cooperation".to_string(),
        Outcome::MutualDefection => "mutual defection".to_string(),
        Outcome::Exploitation { defector } => {
            format!("{} exploits", state.participant(defector).name)
        }
    };
    println!(
        "{:>4}  {} vs {}  {:>+4} {:>+4}  totals {:>6} {:>6}  ({})",
        round.number,
        round.choice_a.letter(),
        round.choice_b.letter(),
        round.payout_a,
        round.payout_b,
        round.total_a,
        round.total_b,
        outcome
    );
}

#[derive(Serialize)]
struct Report<'a> {
    state: &'a MatchState,
    feedback: &'a Feedback,
}

/// Print the final standings, metrics and commentary
pub fn report(state: &MatchState, json: bool) -> Result<()> {
    let feedback = generate_feedback(state);
    if json {
        println!("{}", serde_json::to_string_pretty(&Report { state, feedback: &feedback })?);
        return Ok(());
    }

    let a = state.player_a();
    let b = state.player_b();
    println!();
    println!("Final score: {} {}  -  {} {}", a.name, a.score, b.name, b.score);
    match feedback.standing {
        Standing::Winner(seat) => println!("Winner: {}", state.participant(seat).name),
        Standing::Tie => println!("Tie"),
    }

    let m = &feedback.metrics;
    println!();
    println!("{:<28}{:.1}% / {:.1}%", "cooperation rate", m.cooperation_rate_a, m.cooperation_rate_b);
    println!("{:<28}{}", "mutual cooperations", m.mutual_cooperations);
    println!("{:<28}{}", "mutual defections", m.mutual_defections);
    println!(
        "{:<28}{} / {}",
        "exploitations",
        m.exploitations_by(Seat::A),
        m.exploitations_by(Seat::B)
    );
    println!("{:<28}{}", "longest cooperative streak", m.longest_cooperation_streak);
    match m.first_defection_round {
        Some(round) => println!("{:<28}{}", "first defection", round),
        None => println!("{:<28}none", "first defection"),
    }
    println!();
    println!("{}", feedback.text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_flags_ignored_with_human_seats() {
        assert!(timer_flags_ignored(GameMode::HumanVsBot, true, None));
        assert!(timer_flags_ignored(GameMode::HumanVsHuman, false, Some(500)));
        assert!(!timer_flags_ignored(GameMode::HumanVsBot, false, None));
        assert!(!timer_flags_ignored(GameMode::BotVsBot, true, Some(500)));
    }
}
