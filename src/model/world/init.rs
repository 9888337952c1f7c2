//! World construction: configuration validation, RNG seeding, and initial
//! population and food placement.

use crate::model::config::SimConfig;
use crate::model::genes::Genome;
use crate::model::state::food::FoodMap;
use crate::model::systems::stats::PopulationStats;
use crate::model::world::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

impl World {
    /// Builds a world from a validated configuration.
    ///
    /// Fails fast on an invalid configuration, before any simulation state
    /// exists. A `Some` seed makes the whole run reproducible; `None` seeds
    /// from OS entropy.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let width = config.world.width;
        let height = config.world.height;
        let food = FoodMap::new(width, height, config.world.max_food);

        let mut world = Self {
            width,
            height,
            day: 0,
            entities: Vec::with_capacity(config.world.max_population),
            food,
            config,
            stats: PopulationStats::default(),
            next_id: 0,
            rng,
        };

        world.seed_population();
        world.seed_food();
        Ok(world)
    }

    fn seed_population(&mut self) {
        for _ in 0..self.config.world.initial_population {
            let x = self.rng.gen_range(0..i32::from(self.width));
            let y = self.rng.gen_range(0..i32::from(self.height));
            let energy = self.rng.gen_range(
                self.config.metabolism.initial_energy_min
                    ..=self.config.metabolism.initial_energy_max,
            );
            let genome = Genome::roll(&self.config.genes, &mut self.rng);
            self.spawn_entity(x, y, energy, genome);
        }
    }

    fn seed_food(&mut self) {
        for _ in 0..self.config.world.initial_food {
            self.food.spawn_food_item(&mut self.rng);
        }
    }
}
