//! Hippo plugin wiring the feeding state machines together.
use bevy::prelude::*;

use crate::{
    food::systems::{integrate_bodies, tick_piece_release},
    hippo::{
        config::FeedingConfig,
        events::{AimSignalEvent, AnimationCueEvent, FoodConsumedEvent, SatiationChangedEvent},
        systems::{
            apply_consumption, detect_mouth_contact, log_aim_signals, log_animation_cues,
            log_animator_flags, spawn_hippo, tick_capture_session, tick_satiation_cycle,
            update_mouth_gate,
        },
    },
    world::systems::spawn_world_environment,
};

pub struct HippoPlugin;

impl Plugin for HippoPlugin {
    fn build(&self, app: &mut App) {
        let config = FeedingConfig::load_or_default();
        info!(
            "Feeding configured: chew {:.2}s, convert {:.2}s, {} meals to sleep",
            config.chew.seconds, config.chew.convert_delay, config.sleep.meals_to_sleep
        );

        app.insert_resource(config)
            .add_event::<FoodConsumedEvent>()
            .add_event::<SatiationChangedEvent>()
            .add_event::<AnimationCueEvent>()
            .add_event::<AimSignalEvent>()
            .add_systems(Startup, spawn_hippo.after(spawn_world_environment))
            .add_systems(
                Update,
                (
                    detect_mouth_contact.after(integrate_bodies),
                    tick_capture_session
                        .after(detect_mouth_contact)
                        .before(tick_piece_release),
                    update_mouth_gate.after(tick_capture_session),
                    apply_consumption.after(tick_capture_session),
                    tick_satiation_cycle.after(apply_consumption),
                    (log_animator_flags, log_animation_cues, log_aim_signals)
                        .after(tick_satiation_cycle),
                ),
            );
    }
}
