//! Headless симуляция WARBAND
//!
//! Две команды агентов дерутся без рендера; в конце - сводка по AI состояниям.

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use warband_simulation::{
    create_headless_app, set_log_level, spawn_teams, AIProfile, Actor, DecisionCore,
    Health, LogLevel, SimulationPlugin,
};

#[derive(Parser, Debug)]
#[command(name = "warband_simulation", about = "Headless AI melee simulation")]
struct Args {
    /// Seed для DeterministicRng
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Сколько FixedUpdate тиков прогнать (60 тиков = 1 секунда)
    #[arg(long, default_value_t = 1800)]
    ticks: u32,

    /// JSON профиль AI (ranges / timing / weights), иначе defaults
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long, default_value_t = 3)]
    agents_per_team: usize,

    /// debug | info | warn | error
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = LogLevel::parse(&args.log_level)
        .with_context(|| format!("unknown log level '{}'", args.log_level))?;
    set_log_level(level);

    let profile = match &args.profile {
        Some(path) => AIProfile::load(path)
            .with_context(|| format!("failed to load AI profile from {}", path.display()))?,
        None => AIProfile::default(),
    };

    println!(
        "Starting WARBAND headless simulation (seed: {}, ticks: {}, {} vs {})",
        args.seed, args.ticks, args.agents_per_team, args.agents_per_team
    );

    let mut app = create_headless_app(args.seed);
    app.add_plugins(SimulationPlugin);
    spawn_teams(app.world_mut(), profile, args.agents_per_team);

    for tick in 0..args.ticks {
        app.update();

        if tick % 300 == 0 {
            println!("Tick {}: {}", tick, summarize(app.world_mut()));
        }
    }

    println!("Simulation complete: {}", summarize(app.world_mut()));
    Ok(())
}

/// "faction 1: 3 alive | faction 2: 2 alive | Idle 1, Combat 4"
fn summarize(world: &mut World) -> String {
    let mut alive: BTreeMap<u64, usize> = BTreeMap::new();
    let mut states: BTreeMap<&'static str, usize> = BTreeMap::new();

    let mut query = world.query::<(&Actor, &Health, &DecisionCore)>();
    for (actor, health, core) in query.iter(world) {
        let count = alive.entry(actor.faction_id).or_default();
        if health.is_alive() {
            *count += 1;
            *states.entry(core.current_state().as_str()).or_default() += 1;
        }
    }

    let teams: Vec<String> = alive
        .iter()
        .map(|(faction, count)| format!("faction {}: {} alive", faction, count))
        .collect();
    let states: Vec<String> = states
        .iter()
        .map(|(state, count)| format!("{} {}", state, count))
        .collect();

    format!("{} | {}", teams.join(" | "), states.join(", "))
}
