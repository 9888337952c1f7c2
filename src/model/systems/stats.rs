//! Aggregate population statistics for the periodic summary and the
//! on-demand reporting surface.

use crate::model::genes::Gene;
use crate::model::state::entity::Entity;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PopulationStats {
    pub day: u64,
    pub population: usize,
    pub food_count: usize,
    /// Indexed by [`Gene::index`]; zero for an empty population.
    pub mean_genes: [f64; Gene::COUNT],
    pub mean_age: f64,
    pub mean_energy: f64,
}

impl PopulationStats {
    pub fn mean_gene(&self, gene: Gene) -> f64 {
        self.mean_genes[gene.index()]
    }
}

pub fn collect(entities: &[Entity], food_count: usize, day: u64) -> PopulationStats {
    let mut stats = PopulationStats {
        day,
        population: entities.len(),
        food_count,
        ..Default::default()
    };

    if entities.is_empty() {
        return stats;
    }

    for entity in entities {
        for gene in Gene::ALL {
            stats.mean_genes[gene.index()] += entity.genome.get(gene);
        }
        stats.mean_age += f64::from(entity.age);
        stats.mean_energy += entity.energy;
    }

    let count = entities.len() as f64;
    for mean in &mut stats.mean_genes {
        *mean /= count;
    }
    stats.mean_age /= count;
    stats.mean_energy /= count;
    stats
}
