//! skirmish: run a VANGUARD battle headless and print the turn log.
//!
//! Usage:
//!   skirmish --scenario border_skirmish --turns 30 --seed 7
//!   skirmish --state saved.json --orders orders.json --out final.json

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use vanguard_core::commands::PlayerTurnActions;
use vanguard_core::state::GameState;
use vanguard_core::GameResult;
use vanguard_sim::scenario::by_name;
use vanguard_sim::{ScenarioId, SimConfig, TurnEngine};

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Headless VANGUARD battle runner", version)]
struct Cli {
    /// Built-in scenario to start from
    #[arg(short, long, default_value = "border_skirmish")]
    scenario: String,

    /// Start from a saved game state instead of a scenario
    #[arg(long)]
    state: Option<PathBuf>,

    /// Player orders (JSON) repeated every turn; default is to hold
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Maximum turns to resolve
    #[arg(short, long, default_value_t = 20)]
    turns: u32,

    /// RNG seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final state here as JSON
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Tracing filter, e.g. "info" or "vanguard_ai=debug"
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// List the built-in scenarios and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    if cli.list {
        for id in ScenarioId::ALL {
            println!("{}", id.name());
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> GameResult<()> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let state = match &cli.state {
        Some(path) => GameState::from_json(&fs::read_to_string(path)?)?,
        None => by_name(&cli.scenario)?,
    };
    let orders: PlayerTurnActions = match &cli.orders {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => PlayerTurnActions::default(),
    };

    info!(seed = config.seed, turn = state.turn, "starting battle");
    let mut engine = TurnEngine::new(state, config);

    for _ in 0..cli.turns {
        if engine.state().game_over {
            break;
        }
        let state = engine.resolve_turn(&orders);
        for line in &state.turn_events {
            println!("{line}");
        }
    }

    let state = engine.state();
    let verdict = match (state.game_over, state.game_won) {
        (true, true) => "VICTORY",
        (true, false) => "DEFEAT",
        _ => "UNRESOLVED",
    };
    println!("{verdict} after {} turn(s)", state.turn.saturating_sub(1));
    if let Some(player) = state.player_ship() {
        println!(
            "{}: hull {:.0}/{:.0}, shields {:.0}/{:.0}, energy {:.0}, torpedoes {:.0}",
            player.name,
            player.hull.current,
            player.hull.max,
            player.shields.current,
            player.shields.max,
            player.energy.current,
            player.torpedoes.current
        );
    }

    if let Some(path) = &cli.out {
        fs::write(path, state.to_json_pretty()?)?;
        info!(path = %path.display(), "final state written");
    }
    Ok(())
}
