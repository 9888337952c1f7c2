//! The simulation world: day counter, agent population, food map, and the
//! daily-cycle orchestrator.

use crate::model::config::SimConfig;
use crate::model::snapshot::{EntitySnapshot, WorldSnapshot};
use crate::model::state::entity::Entity;
use crate::model::state::food::FoodMap;
use crate::model::systems::stats::{self, PopulationStats};
use rand_chacha::ChaCha8Rng;

pub mod init;
pub mod update;

/// Owns all mutable simulation state. The agent list and food map are
/// mutated exclusively inside [`World::advance_day`]; external consumers
/// read snapshots between steps.
pub struct World {
    pub width: u16,
    pub height: u16,
    pub day: u64,
    pub entities: Vec<Entity>,
    pub food: FoodMap,
    pub config: SimConfig,
    /// Aggregate stats as of the last reporting day.
    pub stats: PopulationStats,
    /// Monotonically increasing; ids are never reused within one world.
    next_id: u64,
    /// The single randomness stream for this world. Movement, pairing,
    /// mutation, and placement all draw from it, which is what makes a
    /// fixed seed reproduce a run bit for bit.
    rng: ChaCha8Rng,
}

impl World {
    /// Allocates a fresh entity id.
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Creates an entity at `(x, y)` with the given energy and genome,
    /// assigning it a fresh id. Positions are clamped to the grid.
    pub fn spawn_entity(&mut self, x: i32, y: i32, energy: f64, genome: crate::model::genes::Genome) -> u64 {
        let id = self.allocate_id();
        let x = x.clamp(0, i32::from(self.width) - 1);
        let y = y.clamp(0, i32::from(self.height) - 1);
        self.entities.push(Entity::new(
            id,
            x,
            y,
            energy,
            genome,
            self.config.reproduction.cooldown_days,
        ));
        id
    }

    /// On-demand aggregate summary of the current population.
    pub fn summary(&self) -> PopulationStats {
        stats::collect(&self.entities, self.food.len(), self.day)
    }

    /// Read-only copy of the world for renderers and loggers.
    pub fn snapshot(&self) -> WorldSnapshot {
        let entities = self
            .entities
            .iter()
            .map(|e| EntitySnapshot {
                id: e.id,
                x: e.x,
                y: e.y,
                alive: e.alive,
                energy: e.energy,
                age: e.age,
                genes: e.genome,
            })
            .collect();

        let mut food: Vec<(i32, i32)> = self.food.iter().collect();
        food.sort_unstable();

        WorldSnapshot {
            day: self.day,
            width: self.width,
            height: self.height,
            entities,
            food,
            stats: self.stats.clone(),
        }
    }
}
