//! The daily-cycle transition: food spawning, shuffled agent updates, the
//! mate-pairing pass, births, and the end-of-day purge.

use crate::model::genes::Gene;
use crate::model::state::entity::Entity;
use crate::model::systems::stats;
use crate::model::world::World;
use rand::seq::SliceRandom;
use rand::Rng;

impl World {
    /// Advances the simulation by one day.
    ///
    /// Atomic from the caller's perspective: the sequence is day increment,
    /// food spawning, shuffled per-agent updates, the reproduction pass,
    /// births, purge of the dead, and the periodic summary.
    ///
    /// Returns whether the population is non-empty. Extinction is not an
    /// error; stepping an empty world keeps spawning food and keeps
    /// returning `false`.
    pub fn advance_day(&mut self) -> bool {
        self.day += 1;

        for _ in 0..self.config.world.food_spawn_per_day {
            self.food.spawn_food_item(&mut self.rng);
        }

        // A fresh permutation each day decides who reaches contested food
        // cells first.
        self.entities.shuffle(&mut self.rng);
        for entity in &mut self.entities {
            entity.daily_update(&mut self.food, &self.config, &mut self.rng);
        }

        let newborn = self.reproduction_pass();
        self.entities.extend(newborn);

        self.entities.retain(|e| e.alive);

        if self.day % self.config.report_interval == 0 {
            self.stats = stats::collect(&self.entities, self.food.len(), self.day);
            self.log_summary();
        }

        !self.entities.is_empty()
    }

    /// Greedy nearest-candidate pairing over the agents still eligible
    /// after the day's updates.
    ///
    /// Each parent stops scanning after its first in-range candidate,
    /// whether or not the reproduction-rate gates succeed; parents are only
    /// marked consumed on an actual birth. An agent mates at most once per
    /// day, and the pass stops outright once pending births would reach the
    /// population cap.
    fn reproduction_pass(&mut self) -> Vec<Entity> {
        let mut eligible: Vec<usize> = (0..self.entities.len())
            .filter(|&i| self.entities[i].can_reproduce(&self.config))
            .collect();
        eligible.shuffle(&mut self.rng);

        let mut used = vec![false; eligible.len()];
        let mut births: Vec<Entity> = Vec::new();
        let max_population = self.config.world.max_population;
        // Squared distances are computed in i64: coordinate deltas on large
        // grids square past i32::MAX.
        let limit_sq = {
            let d = i64::from(self.config.reproduction.distance);
            d.saturating_mul(d)
        };

        for i in 0..eligible.len() {
            if self.entities.len() + births.len() >= max_population {
                break;
            }
            if used[i] {
                continue;
            }

            for j in (i + 1)..eligible.len() {
                if used[j] {
                    continue;
                }

                let p1 = &self.entities[eligible[i]];
                let p2 = &self.entities[eligible[j]];
                let dx = i64::from(p1.x - p2.x);
                let dy = i64::from(p1.y - p2.y);
                if dx * dx + dy * dy > limit_sq {
                    continue;
                }

                // Both parents gate the attempt on their own reproduction
                // rate; the second draw only happens if the first passes.
                let rate1 = p1.genome.get(Gene::ReproductionRate);
                let rate2 = p2.genome.get(Gene::ReproductionRate);
                let mid_x = (p1.x + p2.x) / 2;
                let mid_y = (p1.y + p2.y) / 2;

                if self.rng.gen::<f64>() < rate1 && self.rng.gen::<f64>() < rate2 {
                    let child_x =
                        (mid_x + self.rng.gen_range(-1..=1)).clamp(0, i32::from(self.width) - 1);
                    let child_y =
                        (mid_y + self.rng.gen_range(-1..=1)).clamp(0, i32::from(self.height) - 1);

                    let child_id = self.next_id;
                    let (parent1, parent2) =
                        pair_mut(&mut self.entities, eligible[i], eligible[j]);
                    if let Some(child) = parent1.reproduce(
                        parent2,
                        child_x,
                        child_y,
                        child_id,
                        &self.config,
                        &mut self.rng,
                    ) {
                        tracing::debug!(
                            parent1 = parent1.id,
                            parent2 = parent2.id,
                            child = child.id,
                            x = child.x,
                            y = child.y,
                            "entity born"
                        );
                        self.next_id += 1;
                        births.push(child);
                        used[i] = true;
                        used[j] = true;
                    }
                }

                // Parent1 is done for the day once any in-range candidate
                // was considered.
                break;
            }
        }

        births
    }

    fn log_summary(&self) {
        let s = &self.stats;
        tracing::info!(
            day = s.day,
            population = s.population,
            food = s.food_count,
            mean_age = s.mean_age,
            mean_energy = s.mean_energy,
            "population summary"
        );
        for gene in Gene::ALL {
            tracing::info!(day = s.day, gene = gene.name(), mean = s.mean_gene(gene), "gene mean");
        }
    }
}

/// Two distinct mutable references into the same entity slice.
fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = entities.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = entities.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}
