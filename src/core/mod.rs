//! Core module exposing the simulation clock and timed-gate primitive.
pub mod gate;
pub mod plugin;

pub use plugin::CorePlugin;
