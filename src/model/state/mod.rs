pub mod entity;
pub mod food;

pub use entity::Entity;
pub use food::FoodMap;
