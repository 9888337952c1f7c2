pub mod config;
pub mod genes;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod world;
