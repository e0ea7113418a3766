// src/ui/satiation_bar/mod.rs
//
// Screen-space fill bar showing how close the hippo is to falling asleep.
//
// - Fills smoothly as meals are eaten (SatiationChangedEvent with smoothing)
// - Snaps tick-by-tick while the bar drains during sleep

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::UiPlugin;
