use dilemma_engine::{
    generate_feedback, run_match, Choice, GameMode, MatchConfig, MatchMetrics, MatchState,
    ParticipantSpec, PayoffMatrix, Phase, Rejection, Seat, Standing, StrategyKind,
};

fn bot_config(a: StrategyKind, b: StrategyKind, rounds: i64, seed: u32) -> MatchConfig {
    MatchConfig { rounds, seed, ..MatchConfig::bot_vs_bot(a, b) }
}

#[test]
fn cooperator_against_defector_over_five_rounds() {
    let config = bot_config(StrategyKind::AlwaysCooperate, StrategyKind::AlwaysDefect, 5, 12345);
    let mut state = MatchState::new(config).unwrap();

    let mut reveals = 0;
    while !state.is_ended() {
        state.autoplay_tick().unwrap();
        reveals += 1;
    }

    assert_eq!(reveals, 5);
    assert_eq!(state.phase(), Phase::MatchEnded);
    assert_eq!(state.player_a().score, 1000);
    assert_eq!(state.player_b().score, 1025);

    let metrics = MatchMetrics::from_rounds(state.rounds());
    assert_eq!(metrics.exploitations_by_b, 5);
    assert_eq!(metrics.exploitations_by_a, 0);
    assert_eq!(metrics.cooperation_rate_a, 100.0);
    assert_eq!(metrics.cooperation_rate_b, 0.0);
    assert_eq!(metrics.first_defection_round, Some(1));

    assert_eq!(state.advance(), Err(Rejection::MatchEnded));
    assert_eq!(state.reveal(), Err(Rejection::MatchEnded));
    assert_eq!(state.autoplay_tick(), Err(Rejection::MatchEnded));
}

#[test]
fn rounds_are_contiguous_with_running_totals() {
    let state = run_match(bot_config(StrategyKind::Random, StrategyKind::TitForTat, 25, 99)).unwrap();

    let mut total_a = 1000i64;
    let mut total_b = 1000i64;
    for (i, round) in state.rounds().iter().enumerate() {
        assert_eq!(round.number, i as u32 + 1);
        total_a += round.payout_a as i64;
        total_b += round.payout_b as i64;
        assert_eq!(round.total_a, total_a);
        assert_eq!(round.total_b, total_b);
    }
    assert_eq!(state.player_a().score, total_a);
    assert_eq!(state.player_a().history.len(), 25);
    assert_eq!(state.player_b().history.len(), 25);
}

#[test]
fn same_seed_replays_identically() {
    let config = MatchConfig {
        cooperation_probability: 0.3,
        ..bot_config(StrategyKind::Random, StrategyKind::Random, 40, 4242)
    };
    let first = run_match(config.clone()).unwrap();
    let second = run_match(config).unwrap();
    assert_eq!(first.rounds(), second.rounds());
    assert_eq!(first, second);

    let other = run_match(bot_config(StrategyKind::Random, StrategyKind::Random, 40, 4243)).unwrap();
    assert_ne!(first.rounds(), other.rounds());
}

#[test]
fn tit_for_tat_against_defector_retaliates_from_round_two() {
    let state =
        run_match(bot_config(StrategyKind::TitForTat, StrategyKind::AlwaysDefect, 6, 1)).unwrap();

    assert_eq!(state.rounds()[0].choice_a, Choice::Cooperate);
    for round in &state.rounds()[1..] {
        assert_eq!(round.choice_a, Choice::Defect);
        assert_eq!(round.choice_b, Choice::Defect);
    }
}

#[test]
fn grim_trigger_never_forgives_a_human() {
    let config = MatchConfig {
        rounds: 6,
        player_b: ParticipantSpec::bot("bot", "Grim", StrategyKind::GrimTrigger),
        ..MatchConfig::default()
    };
    let mut state = MatchState::new(config).unwrap();
    let human = [
        Choice::Cooperate,
        Choice::Defect,
        Choice::Cooperate,
        Choice::Cooperate,
        Choice::Cooperate,
        Choice::Cooperate,
    ];

    for choice in human {
        state.submit_choice_for("player1", choice).unwrap();
        state.reveal().unwrap();
        if !state.is_ended() {
            state.advance().unwrap();
        }
    }

    let bot: Vec<Choice> = state.rounds().iter().map(|r| r.choice_b).collect();
    assert_eq!(
        bot,
        vec![
            Choice::Cooperate,
            Choice::Cooperate,
            Choice::Defect,
            Choice::Defect,
            Choice::Defect,
            Choice::Defect,
        ]
    );
    assert!(state.player_b().triggered);
}

#[test]
fn human_can_leave_a_round_unconfirmed_indefinitely() {
    let mut state = MatchState::new(MatchConfig {
        mode: GameMode::HumanVsHuman,
        player_a: ParticipantSpec::human("p1", "Ann"),
        player_b: ParticipantSpec::human("p2", "Bob"),
        ..MatchConfig::default()
    })
    .unwrap();

    state.submit_choice(Seat::B, Choice::Cooperate).unwrap();
    for _ in 0..10 {
        assert_eq!(state.reveal(), Err(Rejection::NotConfirmed));
        assert_eq!(state.advance(), Err(Rejection::NotRevealed));
    }
    assert_eq!(state.phase(), Phase::AwaitingChoices);
    assert_eq!(state.current_round(), 1);
}

#[test]
fn asymmetric_matrix_keys_on_seat_a_first() {
    let matrix = PayoffMatrix::new((2, 2), (-1, 4), (7, -3), (0, 0));
    let config = MatchConfig {
        payoff_matrix: matrix,
        initial_stake: 0,
        ..bot_config(StrategyKind::AlwaysDefect, StrategyKind::AlwaysCooperate, 3, 1)
    };
    let state = run_match(config).unwrap();
    assert_eq!(state.player_a().score, 21);
    assert_eq!(state.player_b().score, -9);

    let feedback = generate_feedback(&state);
    assert_eq!(feedback.standing, Standing::Winner(Seat::A));
    assert_eq!(feedback.metrics.exploitations_by_a, 3);
}

#[test]
fn config_round_trips_through_json() {
    let config = bot_config(StrategyKind::GrimTrigger, StrategyKind::Random, 12, 7);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"grim_trigger\""));
    assert!(json.contains("\"CC\":[3,3]"));
    assert_eq!(MatchConfig::from_json(&json).unwrap(), config);
}
