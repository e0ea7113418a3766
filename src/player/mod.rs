//! Player module - food possession, throwing, and the hippo-side bridges.

pub mod components;
pub mod events;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
