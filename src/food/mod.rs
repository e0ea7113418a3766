//! Food module: throwable items, piece groups, and their release/despawn scheduling.
pub mod components;
pub mod config;
pub mod events;
pub mod plugin;
pub mod release;
pub mod systems;

pub use plugin::FoodPlugin;
