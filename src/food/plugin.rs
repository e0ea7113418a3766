//! Food plugin wiring body integration and piece lifecycle systems.
use bevy::prelude::*;

use crate::{
    core::plugin::update_simulation_clock,
    food::{
        config::FoodConfig,
        events::{AudioCueEvent, GroundImpactEvent},
        systems::{
            break_thrown_on_impact, cleanup_spent_groups, emit_piece_impact_cues, integrate_bodies,
            log_audio_cues, tick_piece_despawn, tick_piece_release,
        },
    },
};

pub struct FoodPlugin;

impl Plugin for FoodPlugin {
    fn build(&self, app: &mut App) {
        let config = FoodConfig::load_or_default();
        info!(
            "Food configured: release order {} on a {} curve, jitter {:.2}s, piece lifetime {:.1}-{:.1}s",
            config.release.order.label(),
            config.release.curve.label(),
            config.release.jitter,
            config.despawn.lifetime_min,
            config.despawn.lifetime_max
        );

        app.insert_resource(config)
            .add_event::<GroundImpactEvent>()
            .add_event::<AudioCueEvent>()
            .add_systems(
                Update,
                (
                    integrate_bodies.after(update_simulation_clock),
                    break_thrown_on_impact.after(integrate_bodies),
                    tick_piece_release.after(integrate_bodies),
                    tick_piece_despawn.after(tick_piece_release),
                    cleanup_spent_groups.after(tick_piece_despawn),
                    emit_piece_impact_cues.after(integrate_bodies),
                    log_audio_cues.after(emit_piece_impact_cues),
                ),
            );
    }
}
