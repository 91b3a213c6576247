//! Command-line runner for the alien invasion simulator.

mod cli;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use invasion_world::{Placement, Simulation, WorldMap};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.resolve().context("failed to load configuration")?;

    telemetry::init_telemetry(config.log_filter.as_deref(), args.json_logs)?;

    // Logged so any run can be replayed with --seed
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "Map: {}, aliens: {}, seed: {}",
        config.map_path.display(),
        config.alien_count,
        seed
    );

    let file = File::open(&config.map_path)
        .with_context(|| format!("failed to open map {}", config.map_path.display()))?;
    let map = WorldMap::from_reader(BufReader::new(file)).context("failed to parse map")?;

    let mut simulation = Simulation::new(
        &config.simulation_config(seed),
        map.to_graph(),
        Placement::RoundRobin(config.alien_count),
    )?;
    let outcome = simulation.run()?;

    for event in &outcome.events {
        println!("{}", event);
    }

    println!("Report: ------------------------");
    for line in map.report(&simulation.destroyed_cities()) {
        println!("{}", line);
    }

    if args.json {
        let summary = simulation.summary(&outcome);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
