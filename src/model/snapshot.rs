//! Read-only views handed to renderers, HUDs, and loggers strictly between
//! completed steps. Snapshots copy state out; no partial-step state is ever
//! observable through them.

use crate::model::genes::Genome;
use crate::model::systems::stats::PopulationStats;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    pub energy: f64,
    pub age: u32,
    pub genes: Genome,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub day: u64,
    pub width: u16,
    pub height: u16,
    pub entities: Vec<EntitySnapshot>,
    /// Sorted so snapshots of identical worlds compare equal.
    pub food: Vec<(i32, i32)>,
    pub stats: PopulationStats,
}
