//! Headless smoke harness: the scripted brain plays both sides of a match
//! and the outcome is logged. Useful for eyeballing balance and for
//! exercising a full turn loop without any presentation layer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use holdfast_core::{ai, Engine, GameRng, SaveFile};
use holdfast_protocol::Side;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "holdfast-skirmish", about = "Run a scripted-vs-scripted match")]
struct Args {
    /// Map and decision seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop an undecided match after this many turns.
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Write the final position here as save-file text.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut engine = Engine::new_match(args.seed);
    // Separate stream from the map roll so both sides' picks stay stable
    // across map tweaks.
    let mut rng = GameRng::seed_from_u64(args.seed.wrapping_add(1));

    while engine.state().winner().is_none() && engine.state().turn.number <= args.max_turns {
        let Some(command) = ai::decide(engine.state(), &mut rng, Side::Human) else {
            info!(turn = engine.state().turn.number, "no action available; stopping");
            break;
        };
        if let Err(err) = engine.apply(command) {
            warn!(%err, "scripted action rejected; stopping");
            break;
        }
    }

    let state = engine.state();
    match state.winner() {
        Some(winner) => info!(?winner, turn = state.turn.number, "match decided"),
        None => info!(turn = state.turn.number, "match undecided"),
    }
    let (human_units, opponent_units) =
        state
            .units
            .iter()
            .fold((0, 0), |(h, o), (_, unit)| match unit.owner {
                Side::Human => (h + 1, o),
                Side::Opponent => (h, o + 1),
            });
    info!(human_units, opponent_units, "final position");

    if let Some(path) = args.save {
        if let Err(err) = SaveFile::new(path).store(&engine.snapshot()) {
            error!(%err, "could not write the final position");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
