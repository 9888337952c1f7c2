//! Heritable traits: the closed gene set, per-gene bounds, and the
//! fixed-shape genome carried by every entity.

use anyhow::ensure;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed set of heritable traits.
///
/// Keeping this an enum (rather than a string-keyed map) gives fixed-shape
/// genomes, cheap iteration, and compile-time exhaustiveness when a new
/// trait is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    /// Movement attempts per day (rounded).
    Speed,
    /// Multiplier on energy gained from a consumed food item.
    FeedingEfficiency,
    /// Maximum age in days before death from old age.
    BaseLongevity,
    /// Per-parent probability gate in the mate-pairing pass.
    ReproductionRate,
    /// Food scan distance in cells (rounded).
    PerceptionRadius,
}

impl Gene {
    pub const COUNT: usize = 5;
    pub const ALL: [Gene; Gene::COUNT] = [
        Gene::Speed,
        Gene::FeedingEfficiency,
        Gene::BaseLongevity,
        Gene::ReproductionRate,
        Gene::PerceptionRadius,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Gene::Speed => "speed",
            Gene::FeedingEfficiency => "feeding_efficiency",
            Gene::BaseLongevity => "base_longevity",
            Gene::ReproductionRate => "reproduction_rate",
            Gene::PerceptionRadius => "perception_radius",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Absolute and initial-roll bounds for one gene.
///
/// Invariants (checked by [`GeneBounds::validate`]): `min <= max` and the
/// initial-roll range is contained in the absolute range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeneBounds {
    pub min: f64,
    pub max: f64,
    pub initial_min: f64,
    pub initial_max: f64,
}

impl GeneBounds {
    pub fn validate(&self, name: &str) -> anyhow::Result<()> {
        ensure!(
            self.min <= self.max,
            "gene '{name}': absolute bounds inverted ({} > {})",
            self.min,
            self.max
        );
        ensure!(
            self.initial_min <= self.initial_max,
            "gene '{name}': initial bounds inverted ({} > {})",
            self.initial_min,
            self.initial_max
        );
        ensure!(
            self.initial_min >= self.min && self.initial_max <= self.max,
            "gene '{name}': initial range [{}, {}] outside absolute range [{}, {}]",
            self.initial_min,
            self.initial_max,
            self.min,
            self.max
        );
        Ok(())
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Per-gene bounds table, deserialized from the `[genes.*]` config sections.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneTable {
    pub speed: GeneBounds,
    pub feeding_efficiency: GeneBounds,
    pub base_longevity: GeneBounds,
    pub reproduction_rate: GeneBounds,
    pub perception_radius: GeneBounds,
}

impl GeneTable {
    pub fn bounds(&self, gene: Gene) -> &GeneBounds {
        match gene {
            Gene::Speed => &self.speed,
            Gene::FeedingEfficiency => &self.feeding_efficiency,
            Gene::BaseLongevity => &self.base_longevity,
            Gene::ReproductionRate => &self.reproduction_rate,
            Gene::PerceptionRadius => &self.perception_radius,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for gene in Gene::ALL {
            self.bounds(gene).validate(gene.name())?;
        }
        Ok(())
    }
}

impl Default for GeneTable {
    fn default() -> Self {
        Self {
            speed: GeneBounds {
                min: 0.5,
                max: 4.0,
                initial_min: 1.0,
                initial_max: 2.0,
            },
            feeding_efficiency: GeneBounds {
                min: 0.5,
                max: 2.0,
                initial_min: 0.8,
                initial_max: 1.2,
            },
            base_longevity: GeneBounds {
                min: 10.0,
                max: 40.0,
                initial_min: 15.0,
                initial_max: 25.0,
            },
            reproduction_rate: GeneBounds {
                min: 0.1,
                max: 0.9,
                initial_min: 0.3,
                initial_max: 0.6,
            },
            perception_radius: GeneBounds {
                min: 1.0,
                max: 8.0,
                initial_min: 2.0,
                initial_max: 4.0,
            },
        }
    }
}

/// One value per gene, fixed shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Genome {
    values: [f64; Gene::COUNT],
}

impl Genome {
    /// Rolls a fresh genome uniformly within each gene's initial range.
    pub fn roll(table: &GeneTable, rng: &mut impl Rng) -> Self {
        let mut values = [0.0; Gene::COUNT];
        for gene in Gene::ALL {
            let b = table.bounds(gene);
            values[gene.index()] = rng.gen_range(b.initial_min..=b.initial_max);
        }
        Self { values }
    }

    pub fn get(&self, gene: Gene) -> f64 {
        self.values[gene.index()]
    }

    pub fn set(&mut self, gene: Gene, value: f64) {
        self.values[gene.index()] = value;
    }
}
