//! Individual agent state and per-day behavior: aging, movement, feeding,
//! death, and reproduction.

use crate::model::config::SimConfig;
use crate::model::genes::{Gene, Genome};
use crate::model::state::food::FoodMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    /// Unique per world, monotonically increasing, never reused.
    pub id: u64,
    pub x: i32,
    pub y: i32,
    /// May transiently go non-positive within a day before death is applied.
    pub energy: f64,
    pub age: u32,
    pub genome: Genome,
    pub alive: bool,
    pub days_since_reproduction: u32,
}

impl Entity {
    /// Fresh entities start with the cooldown already elapsed so they are
    /// immediately eligible to reproduce once old enough.
    pub fn new(id: u64, x: i32, y: i32, energy: f64, genome: Genome, cooldown_days: u32) -> Self {
        Self {
            id,
            x,
            y,
            energy,
            age: 0,
            genome,
            alive: true,
            days_since_reproduction: cooldown_days,
        }
    }

    /// Runs one day for this entity: upkeep, death checks, then movement
    /// and feeding. No-op when already dead.
    ///
    /// An entity that dies from upkeep or old age does not move that day.
    pub fn daily_update(&mut self, food: &mut FoodMap, config: &SimConfig, rng: &mut impl Rng) {
        if !self.alive {
            return;
        }

        self.age += 1;
        self.energy -= config.metabolism.daily_energy_cost;
        self.days_since_reproduction += 1;

        if self.energy <= 0.0 || f64::from(self.age) > self.genome.get(Gene::BaseLongevity) {
            self.die();
            return;
        }

        self.move_and_feed(food, config, rng);
    }

    /// Up to `round(speed)` one-cell movement attempts, stopping early on
    /// death or after eating (at most one meal per day).
    fn move_and_feed(&mut self, food: &mut FoodMap, config: &SimConfig, rng: &mut impl Rng) {
        let target = self.perceive_food(food, config);
        let speed = self.genome.get(Gene::Speed);
        let max_steps = speed.round() as i32;

        for _ in 0..max_steps {
            if !self.alive {
                break;
            }

            let (prev_x, prev_y) = (self.x, self.y);

            match target {
                Some((tx, ty)) => {
                    // One cell toward the target along each axis
                    // independently; both axes may move in the same attempt.
                    self.x += (tx - self.x).signum();
                    self.y += (ty - self.y).signum();
                }
                None => {
                    self.x += rng.gen_range(-1..=1);
                    self.y += rng.gen_range(-1..=1);
                }
            }

            self.x = self.x.clamp(0, i32::from(config.world.width) - 1);
            self.y = self.y.clamp(0, i32::from(config.world.height) - 1);

            if (self.x, self.y) != (prev_x, prev_y) {
                let move_cost = config.metabolism.move_cost_factor * (1.0 + speed / 2.0);
                self.energy -= move_cost;
                if self.energy <= 0.0 {
                    self.die();
                    break;
                }
            }

            if food.is_food_at(self.x, self.y) {
                self.eat(food.remove_food(self.x, self.y), config);
                tracing::trace!(
                    id = self.id,
                    x = self.x,
                    y = self.y,
                    energy = self.energy,
                    "entity ate"
                );
                break;
            }
        }
    }

    /// Scans offsets in row-major order (`dx` outer, `dy` inner) within the
    /// rounded perception radius, skipping the entity's own cell, and keeps
    /// the first in-bounds food cell with a strictly smaller squared
    /// distance than any seen so far.
    ///
    /// The scan order is the tie-break: of two equidistant cells, the one
    /// encountered earlier wins. This ordering is a determinism contract,
    /// not an implementation accident.
    fn perceive_food(&self, food: &FoodMap, config: &SimConfig) -> Option<(i32, i32)> {
        let radius = self.genome.get(Gene::PerceptionRadius).round() as i32;
        let mut closest = None;
        let mut min_dist_sq = i64::MAX;

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let cx = self.x + dx;
                let cy = self.y + dy;
                if cx < 0
                    || cy < 0
                    || cx >= i32::from(config.world.width)
                    || cy >= i32::from(config.world.height)
                {
                    continue;
                }
                if food.is_food_at(cx, cy) {
                    // i64 keeps the square exact for radii past 46340.
                    let dist_sq = i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy);
                    if dist_sq < min_dist_sq {
                        min_dist_sq = dist_sq;
                        closest = Some((cx, cy));
                    }
                }
            }
        }
        closest
    }

    fn eat(&mut self, food_amount: u32, config: &SimConfig) {
        if !self.alive {
            return;
        }
        self.energy += f64::from(food_amount)
            * config.metabolism.energy_per_food
            * self.genome.get(Gene::FeedingEfficiency);
    }

    /// Eligibility predicate for the mate-pairing pass.
    pub fn can_reproduce(&self, config: &SimConfig) -> bool {
        self.alive
            && self.energy >= config.metabolism.min_energy_reproduce
            && self.age >= config.reproduction.min_age
            && self.age <= config.reproduction.max_age
            && self.days_since_reproduction >= config.reproduction.cooldown_days
    }

    /// Produces a child at `(child_x, child_y)`, or `None` when either
    /// parent fails the eligibility predicate at call time.
    ///
    /// On success both parents pay the reproduction cost and reset their
    /// cooldown. Each child gene is inherited from one parent chosen
    /// uniformly, then perturbed with `mutation_probability` by a
    /// multiplicative factor uniform in `[-magnitude, +magnitude]`, clamped
    /// to the gene's absolute bounds. Child energy is the midpoint of the
    /// configured initial range, independent of parental energy.
    pub fn reproduce(
        &mut self,
        partner: &mut Entity,
        child_x: i32,
        child_y: i32,
        child_id: u64,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) -> Option<Entity> {
        if !self.can_reproduce(config) || !partner.can_reproduce(config) {
            return None;
        }

        self.energy -= config.metabolism.reproduction_energy_cost;
        partner.energy -= config.metabolism.reproduction_energy_cost;
        self.days_since_reproduction = 0;
        partner.days_since_reproduction = 0;

        let mut child_genome = Genome::default();
        for gene in Gene::ALL {
            let inherited = if rng.gen_bool(0.5) {
                self.genome.get(gene)
            } else {
                partner.genome.get(gene)
            };

            let value = if rng.gen::<f64>() < config.reproduction.mutation_probability {
                let magnitude = config.reproduction.mutation_magnitude;
                let mutation = inherited * rng.gen_range(-magnitude..=magnitude);
                config.genes.bounds(gene).clamp(inherited + mutation)
            } else {
                inherited
            };
            child_genome.set(gene, value);
        }

        let child_energy =
            (config.metabolism.initial_energy_min + config.metabolism.initial_energy_max) / 2.0;

        Some(Entity::new(
            child_id,
            child_x,
            child_y,
            child_energy,
            child_genome,
            config.reproduction.cooldown_days,
        ))
    }

    /// Idempotent; the entity is removed from the population at the
    /// end-of-day purge.
    pub fn die(&mut self) {
        if self.alive {
            self.alive = false;
            tracing::debug!(id = self.id, age = self.age, energy = self.energy, "entity died");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::genes::GeneTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.world.width = 20;
        config.world.height = 20;
        config
    }

    fn test_entity(id: u64, x: i32, y: i32, energy: f64) -> Entity {
        let table = GeneTable::default();
        let mut rng = ChaCha8Rng::seed_from_u64(id);
        let genome = Genome::roll(&table, &mut rng);
        Entity::new(id, x, y, energy, genome, 2)
    }

    #[test]
    fn test_starvation_kills_before_movement() {
        let config = test_config();
        let mut food = FoodMap::new(20, 20, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // Energy 1 against a daily cost of 2: dead before any movement.
        let mut entity = test_entity(0, 5, 5, 1.0);
        entity.daily_update(&mut food, &config, &mut rng);

        assert!(!entity.alive);
        assert_eq!((entity.x, entity.y), (5, 5));
        assert_eq!(entity.age, 1);
    }

    #[test]
    fn test_old_age_kills() {
        let config = test_config();
        let mut food = FoodMap::new(20, 20, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut entity = test_entity(0, 5, 5, 500.0);
        entity.genome.set(Gene::BaseLongevity, 10.0);
        entity.age = 10;
        entity.daily_update(&mut food, &config, &mut rng);

        assert!(!entity.alive);
        assert_eq!((entity.x, entity.y), (5, 5));
    }

    #[test]
    fn test_dead_entity_update_is_noop() {
        let config = test_config();
        let mut food = FoodMap::new(20, 20, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut entity = test_entity(0, 5, 5, 100.0);
        entity.die();
        entity.die(); // idempotent
        entity.daily_update(&mut food, &config, &mut rng);

        assert_eq!(entity.age, 0);
        assert_eq!(entity.energy, 100.0);
    }

    #[test]
    fn test_perception_row_major_tie_break() {
        let config = test_config();
        let mut entity = test_entity(0, 10, 10, 100.0);
        entity.genome.set(Gene::PerceptionRadius, 3.0);

        // Two cells at equal squared distance 4: (-2, 0) scans before
        // (+2, 0) because dx runs -r..=r in the outer loop.
        let mut map = FoodMap::new(20, 20, 100);
        map.place_at(8, 10);
        map.place_at(12, 10);
        assert_eq!(entity.perceive_food(&map, &config), Some((8, 10)));

        // Within one dx column, smaller dy scans first.
        let mut map2 = FoodMap::new(20, 20, 100);
        map2.place_at(10, 8);
        map2.place_at(10, 12);
        assert_eq!(entity.perceive_food(&map2, &config), Some((10, 8)));

        // A strictly closer cell still beats an earlier-scanned farther one.
        let mut map3 = FoodMap::new(20, 20, 100);
        map3.place_at(8, 10);
        map3.place_at(11, 10);
        assert_eq!(entity.perceive_food(&map3, &config), Some((11, 10)));
    }

    #[test]
    fn test_perception_ignores_out_of_radius_food() {
        let config = test_config();
        let mut entity = test_entity(0, 10, 10, 100.0);
        entity.genome.set(Gene::PerceptionRadius, 2.0);

        let mut map = FoodMap::new(20, 20, 100);
        map.place_at(10, 13); // dy = 3, outside radius 2
        assert_eq!(entity.perceive_food(&map, &config), None);
    }

    #[test]
    fn test_moves_toward_perceived_food_and_eats() {
        let config = test_config();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut entity = test_entity(0, 10, 10, 100.0);
        entity.genome.set(Gene::PerceptionRadius, 2.0);
        entity.genome.set(Gene::Speed, 1.0);
        entity.genome.set(Gene::FeedingEfficiency, 1.0);
        entity.genome.set(Gene::BaseLongevity, 40.0);

        let mut food = FoodMap::new(20, 20, 100);
        food.place_at(11, 10);

        let energy_before = entity.energy;
        entity.daily_update(&mut food, &config, &mut rng);

        assert_eq!((entity.x, entity.y), (11, 10));
        assert!(!food.is_food_at(11, 10));
        // One daily cost, one move cost, one food item's worth of energy.
        let move_cost = config.metabolism.move_cost_factor * (1.0 + 1.0 / 2.0);
        let expected = energy_before - config.metabolism.daily_energy_cost - move_cost
            + config.metabolism.energy_per_food;
        assert!((entity.energy - expected).abs() < 1e-9);
    }

    #[test]
    fn test_eligibility_window() {
        let config = test_config();
        let mut entity = test_entity(0, 5, 5, 100.0);

        entity.age = 5;
        assert!(entity.can_reproduce(&config));

        entity.age = 2; // below min_age
        assert!(!entity.can_reproduce(&config));

        entity.age = 21; // above max_age
        assert!(!entity.can_reproduce(&config));

        entity.age = 5;
        entity.energy = 10.0; // below threshold
        assert!(!entity.can_reproduce(&config));

        entity.energy = 100.0;
        entity.days_since_reproduction = 0; // cooldown not elapsed
        assert!(!entity.can_reproduce(&config));

        entity.days_since_reproduction = 2;
        entity.die();
        assert!(!entity.can_reproduce(&config));
    }

    #[test]
    fn test_reproduce_rejects_ineligible_partner() {
        let config = test_config();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut p1 = test_entity(0, 5, 5, 100.0);
        let mut p2 = test_entity(1, 5, 6, 10.0); // under energy threshold
        p1.age = 5;
        p2.age = 5;

        let before = p1.energy;
        assert!(p1.reproduce(&mut p2, 5, 5, 2, &config, &mut rng).is_none());
        assert_eq!(p1.energy, before, "no cost deducted on refusal");
    }

    #[test]
    fn test_reproduce_without_mutation_copies_parent_genes() {
        let mut config = test_config();
        config.reproduction.mutation_probability = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut p1 = test_entity(0, 5, 5, 100.0);
        let mut p2 = test_entity(1, 5, 6, 100.0);
        p1.age = 5;
        p2.age = 5;

        let child = p1
            .reproduce(&mut p2, 5, 5, 2, &config, &mut rng)
            .expect("both parents eligible");

        for gene in Gene::ALL {
            let v = child.genome.get(gene);
            assert!(
                v == p1.genome.get(gene) || v == p2.genome.get(gene),
                "{} not inherited verbatim",
                gene.name()
            );
        }
        assert_eq!(child.id, 2);
        assert_eq!(
            child.energy,
            (config.metabolism.initial_energy_min + config.metabolism.initial_energy_max) / 2.0
        );
        assert_eq!(p1.days_since_reproduction, 0);
        assert_eq!(p2.days_since_reproduction, 0);
        assert_eq!(p1.energy, 100.0 - config.metabolism.reproduction_energy_cost);
    }

    #[test]
    fn test_mutated_genes_stay_in_absolute_bounds() {
        let mut config = test_config();
        config.reproduction.mutation_probability = 1.0;
        config.reproduction.mutation_magnitude = 5.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for seed in 0..50u64 {
            let mut p1 = test_entity(seed * 2, 5, 5, 100.0);
            let mut p2 = test_entity(seed * 2 + 1, 5, 6, 100.0);
            p1.age = 5;
            p2.age = 5;
            let child = p1
                .reproduce(&mut p2, 5, 5, 1000 + seed, &config, &mut rng)
                .unwrap();
            for gene in Gene::ALL {
                let b = config.genes.bounds(gene);
                let v = child.genome.get(gene);
                assert!(v >= b.min && v <= b.max, "{}: {v}", gene.name());
            }
        }
    }
}
