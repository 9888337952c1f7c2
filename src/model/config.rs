//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures that map to the `config.toml` file. The
//! configuration is constructed once, validated fast before any simulation
//! state exists, and held immutable for the whole run.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 50
//! height = 40
//! initial_population = 30
//! seed = 42
//!
//! [metabolism]
//! daily_energy_cost = 2.0
//!
//! [genes.speed]
//! min = 0.5
//! max = 4.0
//! initial_min = 1.0
//! initial_max = 2.0
//! ```

use crate::model::genes::GeneTable;
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Grid dimensions, population and food caps, and the RNG seed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub initial_population: usize,
    pub max_population: usize,
    pub initial_food: usize,
    pub max_food: usize,
    /// Placement attempts per day; each may silently fail on collision.
    pub food_spawn_per_day: usize,
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// Energy budget: starting range, daily upkeep, movement and feeding.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetabolismConfig {
    pub initial_energy_min: f64,
    pub initial_energy_max: f64,
    pub daily_energy_cost: f64,
    pub move_cost_factor: f64,
    pub energy_per_food: f64,
    pub reproduction_energy_cost: f64,
    pub min_energy_reproduce: f64,
}

/// Mate-pairing window, cooldown, and mutation parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReproductionConfig {
    pub min_age: u32,
    pub max_age: u32,
    pub cooldown_days: u32,
    /// Maximum cell distance between mates.
    pub distance: u32,
    pub mutation_probability: f64,
    pub mutation_magnitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub metabolism: MetabolismConfig,
    pub reproduction: ReproductionConfig,
    pub genes: GeneTable,
    /// Emit an aggregate summary every N days.
    pub report_interval: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                width: 50,
                height: 40,
                initial_population: 30,
                max_population: 150,
                initial_food: 60,
                max_food: 100,
                food_spawn_per_day: 8,
                seed: None,
            },
            metabolism: MetabolismConfig {
                initial_energy_min: 80.0,
                initial_energy_max: 120.0,
                daily_energy_cost: 2.0,
                move_cost_factor: 0.2,
                energy_per_food: 50.0,
                reproduction_energy_cost: 40.0,
                min_energy_reproduce: 70.0,
            },
            reproduction: ReproductionConfig {
                min_age: 3,
                max_age: 20,
                cooldown_days: 2,
                distance: 2,
                mutation_probability: 0.05,
                mutation_magnitude: 0.2,
            },
            genes: GeneTable::default(),
            report_interval: 20,
        }
    }
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Err` with a description of the first failure. Must pass
    /// before any simulation state is created.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.world.width > 0, "world width must be positive");
        ensure!(self.world.height > 0, "world height must be positive");
        ensure!(
            self.world.initial_population <= self.world.max_population,
            "initial population {} exceeds max population {}",
            self.world.initial_population,
            self.world.max_population
        );
        ensure!(
            self.world.initial_food <= self.world.max_food,
            "initial food {} exceeds max food {}",
            self.world.initial_food,
            self.world.max_food
        );

        ensure!(
            self.metabolism.initial_energy_min <= self.metabolism.initial_energy_max,
            "initial energy range inverted ({} > {})",
            self.metabolism.initial_energy_min,
            self.metabolism.initial_energy_max
        );
        ensure!(
            self.metabolism.initial_energy_min >= 0.0,
            "initial energy must be non-negative"
        );
        ensure!(
            self.metabolism.daily_energy_cost >= 0.0,
            "daily energy cost must be non-negative"
        );
        ensure!(
            self.metabolism.move_cost_factor >= 0.0,
            "move cost factor must be non-negative"
        );
        ensure!(
            self.metabolism.energy_per_food >= 0.0,
            "energy per food must be non-negative"
        );
        ensure!(
            self.metabolism.reproduction_energy_cost >= 0.0,
            "reproduction energy cost must be non-negative"
        );
        ensure!(
            self.metabolism.min_energy_reproduce >= 0.0,
            "reproduction energy threshold must be non-negative"
        );

        ensure!(
            self.reproduction.min_age <= self.reproduction.max_age,
            "reproduction age range inverted ({} > {})",
            self.reproduction.min_age,
            self.reproduction.max_age
        );
        ensure!(
            (0.0..=1.0).contains(&self.reproduction.mutation_probability),
            "mutation probability must be in [0.0, 1.0]"
        );
        ensure!(
            self.reproduction.mutation_magnitude >= 0.0,
            "mutation magnitude must be non-negative"
        );

        ensure!(self.report_interval > 0, "report interval must be positive");

        self.genes.validate()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist. A present-but-invalid file is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(_) => Ok(Self::default()),
        }
    }
}
