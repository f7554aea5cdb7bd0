//! Headless run driver
//!
//! Plays a seeded run under the idle autopilot and prints a JSON summary.
//!
//! Usage:
//!   cargo run -- --character mage --seed 42 --seconds 300

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use horde_survivor::consts::SIM_DT;
use horde_survivor::sim::{GamePhase, RunResult, TickInput};
use horde_survivor::{Content, Simulation, Tuning};
use serde::Serialize;

/// Headless Horde Survivor - autopilot runs for balance checks
#[derive(Parser, Debug)]
#[command(name = "horde-survivor")]
#[command(about = "Simulate a run headlessly and print a JSON summary")]
struct Args {
    /// Character id to play
    #[arg(long, default_value = "knight")]
    character: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to play (stops early if the run ends)
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Content tables (JSON); defaults to the built-in set
    #[arg(long)]
    content: Option<PathBuf>,

    /// Balance overrides (JSON); missing fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the final snapshot instead of the summary
    #[arg(long)]
    snapshot: bool,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    character: String,
    ticks: u64,
    run_time: f32,
    wave: u32,
    phase: GamePhase,
    result: Option<RunResult>,
    level: u32,
    kills: u32,
    hp: f32,
    enemies_alive: usize,
    damage_dealt: f32,
    damage_taken: f32,
    upgrades: BTreeMap<String, u32>,
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        log::error!("Run failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    env_logger::init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let content = match &args.content {
        Some(path) => Content::from_json(&fs::read_to_string(path)?).inspect_err(|err| {
            log::warn!("Content file {} rejected: {err}", path.display());
        })?,
        None => Content::builtin(),
    };
    let tuning = match &args.tuning {
        Some(path) => Tuning::from_json(&fs::read_to_string(path)?).inspect_err(|err| {
            log::warn!("Tuning file {} rejected: {err}", path.display());
        })?,
        None => Tuning::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut sim = Simulation::new(content, tuning)?;
    sim.enter_run(&args.character, seed)?;

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut elapsed = 0.0;
    while elapsed < args.seconds && sim.is_running() {
        sim.tick(&input, SIM_DT)?;
        elapsed += SIM_DT;
    }

    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot()?)?);
        return Ok(());
    }

    let Some(state) = sim.state() else {
        return Ok(());
    };
    let summary = RunSummary {
        seed,
        character: args.character.clone(),
        ticks: state.time_ticks,
        run_time: state.run_time,
        wave: state.wave(),
        phase: state.phase,
        result: state.result,
        level: state.player.level,
        kills: state.player.kills,
        hp: state.player.body.hp,
        enemies_alive: state.live_enemy_count(),
        damage_dealt: state.player.damage_dealt,
        damage_taken: state.player.damage_taken,
        upgrades: state.upgrades_taken.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
