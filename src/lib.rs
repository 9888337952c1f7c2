//! A population of mobile, energy-consuming agents with heritable numeric
//! traits foraging on a bounded grid. The simulation advances in discrete
//! daily steps: agents move, feed, age, die, and reproduce with mutation.
//!
//! All randomness flows from a single seedable stream owned by the
//! [`World`](model::world::World), so a fixed seed and configuration yield
//! bit-identical state across runs. Renderers and loggers are external
//! consumers: they read [`WorldSnapshot`](model::snapshot::WorldSnapshot)s
//! between completed steps and never mutate simulation state.

pub mod model;

pub use model::config::SimConfig;
pub use model::world::World;
