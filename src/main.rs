use anyhow::Result;
use clap::Parser;
use evogrid::model::config::SimConfig;
use evogrid::model::world::World;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of days to simulate (0 runs until extinction)
    #[arg(short, long, default_value_t = 0)]
    days: u64,

    /// Override the RNG seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = SimConfig::load(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let mut world = World::new(config)?;
    tracing::info!(
        width = world.width,
        height = world.height,
        population = world.entities.len(),
        food = world.food.len(),
        "simulation started"
    );

    let mut elapsed = 0u64;
    loop {
        elapsed += 1;
        if !world.advance_day() {
            tracing::info!(day = world.day, "population extinct");
            break;
        }
        if args.days > 0 && elapsed >= args.days {
            break;
        }
    }

    let stats = world.summary();
    tracing::info!(
        day = world.day,
        population = stats.population,
        food = stats.food_count,
        mean_energy = stats.mean_energy,
        "simulation finished"
    );
    Ok(())
}
