// src/ui/satiation_bar/plugin.rs
//
// Plugin registration for the satiation bar.

use bevy::prelude::*;

use super::systems::{animate_bar_fill, apply_satiation_updates, spawn_satiation_bar};

/// Plugin rendering the hippo's satiation as a screen-space fill bar.
///
/// # Dependencies
///
/// - `HippoPlugin` must be registered before this plugin (provides
///   SatiationChangedEvent)
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_satiation_bar).add_systems(
            Update,
            (
                apply_satiation_updates,
                animate_bar_fill.after(apply_satiation_updates),
            ),
        );
    }
}
