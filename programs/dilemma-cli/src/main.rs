//! Terminal host for iterated Prisoner's Dilemma matches

mod play;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dilemma_engine::{GameMode, MatchConfig, MatchState, Seat, StrategyKind};

#[derive(Parser)]
#[command(name = "dilemma")]
#[command(about = "Play iterated Prisoner's Dilemma matches", long_about = None)]
struct Cli {
    /// Log every state transition
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match
    Play(PlayArgs),
    /// List the available strategies
    Strategies,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    HumanVsBot,
    BotVsBot,
    HumanVsHuman,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::HumanVsBot => GameMode::HumanVsBot,
            ModeArg::BotVsBot => GameMode::BotVsBot,
            ModeArg::HumanVsHuman => GameMode::HumanVsHuman,
        }
    }
}

#[derive(clap::Args)]
struct PlayArgs {
    /// JSON match configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long)]
    rounds: Option<i64>,

    /// Initial stake of both participants
    #[arg(long)]
    stake: Option<i64>,

    #[arg(long)]
    seed: Option<u32>,

    /// Cooperation probability of the `random` strategy
    #[arg(long)]
    p_coop: Option<f64>,

    #[arg(long)]
    strategy_a: Option<String>,

    #[arg(long)]
    strategy_b: Option<String>,

    #[arg(long)]
    name_a: Option<String>,

    #[arg(long)]
    name_b: Option<String>,

    /// Bot-vs-bot: play on a timer instead of stepping with Enter
    #[arg(long, default_value = "false")]
    autoplay: bool,

    /// Pause between autoplay rounds, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the final state and report as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Strategies => {
            for kind in StrategyKind::ALL {
                println!("{:<18}{:<18}{}", kind.as_str(), kind.display_name(), kind.description());
            }
            Ok(())
        }
        Commands::Play(args) => {
            let config = build_config(&args)?;
            let mut state = MatchState::new(config).context("invalid match configuration")?;
            play::run(&mut state, args.autoplay, args.delay_ms)?;
            play::report(&state, args.json)
        }
    }
}

/// Config file (or defaults) with flag overrides applied
fn build_config(args: &PlayArgs) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            log::info!("loaded configuration from {}", path.display());
            MatchConfig::parse(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.mode = mode.into();
        // Seats the new mode makes human drop inherited strategies
        for seat in [Seat::A, Seat::B] {
            if !config.mode.is_automated(seat) {
                spec_mut(&mut config, seat).strategy = None;
            }
        }
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(stake) = args.stake {
        config.initial_stake = stake;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(p) = args.p_coop {
        config.cooperation_probability = p;
    }
    if let Some(tag) = &args.strategy_a {
        config.player_a.strategy = Some(tag.parse()?);
    }
    if let Some(tag) = &args.strategy_b {
        config.player_b.strategy = Some(tag.parse()?);
    }
    if let Some(name) = &args.name_a {
        config.player_a.name = name.clone();
    }
    if let Some(name) = &args.name_b {
        config.player_b.name = name.clone();
    }

    config.validate()?;
    Ok(config)
}

fn spec_mut(config: &mut MatchConfig, seat: Seat) -> &mut dilemma_engine::ParticipantSpec {
    match seat {
        Seat::A => &mut config.player_a,
        Seat::B => &mut config.player_b,
    }
}
