//! Systems for throwing, handing over, and restocking food.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    core::plugin::SimulationClock,
    food::{
        components::{FoodKind, PieceBlueprint},
        events::{AudioCue, AudioCueEvent},
        systems::spawn_food_item,
    },
    hippo::{
        components::MouthOpenGate,
        config::FeedingConfig,
        events::AimSignalEvent,
    },
    player::{
        components::{Player, PlayerHands},
        events::{FoodPossessionChangedEvent, FoodThrownEvent},
    },
};

const THROW_SPEED: f32 = 10.0;
const THROW_UPWARD_BIAS: f32 = 0.05;
const THROW_SPIN: Vec3 = Vec3::new(0.0, 2.5, 0.0);

/// Gentle forward lob used when handing a snack over instead of throwing.
const HANDOFF_SPEED: f32 = 2.5;

/// Seconds until the hands refill after launching food.
const RESTOCK_DELAY: f32 = 1.5;

const PICKUP_CUE_VOLUME: f32 = 1.0;

/// Launches food from the camera: left click throws a whole melon,
/// G lobs a carryable snack.
#[allow(clippy::too_many_arguments)]
pub fn handle_throw_input(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut hands: ResMut<PlayerHands>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera: Query<&Transform, With<Player>>,
    mut thrown: MessageWriter<FoodThrownEvent>,
    mut possession: MessageWriter<FoodPossessionChangedEvent>,
) {
    let throw = mouse.just_pressed(MouseButton::Left);
    let handoff = keyboard.just_pressed(KeyCode::KeyG);
    if !throw && !handoff {
        return;
    }
    if !hands.has_food {
        debug!("Throw requested with empty hands");
        return;
    }
    let Ok(camera_transform) = camera.single() else {
        return;
    };

    let forward = camera_transform.forward().as_vec3();
    let origin = camera_transform.translation + forward * 0.6;
    let (kind, velocity, angular_velocity) = if throw {
        (
            FoodKind::WholeBreakable {
                blueprint: PieceBlueprint::melon(),
            },
            forward * THROW_SPEED + Vec3::Y * THROW_SPEED * THROW_UPWARD_BIAS,
            THROW_SPIN,
        )
    } else {
        (FoodKind::Carryable, forward * HANDOFF_SPEED, Vec3::ZERO)
    };

    let item = spawn_food_item(
        &mut commands,
        &mut meshes,
        &mut materials,
        kind,
        Transform::from_translation(origin).with_rotation(camera_transform.rotation),
        velocity,
        angular_velocity,
    );

    hands.has_food = false;
    hands.restock_remaining = Some(RESTOCK_DELAY);
    possession.write(FoodPossessionChangedEvent { has_food: false });
    if throw {
        thrown.write(FoodThrownEvent { item });
        info!("Player throws a melon");
    } else {
        info!("Player hands over a snack");
    }
}

/// Refills the player's hands a moment after each launch.
pub fn restock_hands(
    sim_clock: Res<SimulationClock>,
    mut hands: ResMut<PlayerHands>,
    mut possession: MessageWriter<FoodPossessionChangedEvent>,
    mut cues: MessageWriter<AudioCueEvent>,
) {
    let Some(remaining) = hands.restock_remaining.as_mut() else {
        return;
    };
    *remaining -= sim_clock.last_scaled_delta().as_secs_f32();
    if *remaining > 0.0 {
        return;
    }

    hands.restock_remaining = None;
    hands.has_food = true;
    possession.write(FoodPossessionChangedEvent { has_food: true });
    cues.write(AudioCueEvent::new(AudioCue::Pickup, PICKUP_CUE_VOLUME));
    debug!("Player hands restocked");
}

/// Bridges throw events to the hippo: keep the mouth open for a window and
/// aim at the flying item.
pub fn bridge_throw_to_hippo(
    sim_clock: Res<SimulationClock>,
    config: Res<FeedingConfig>,
    mut thrown: MessageReader<FoodThrownEvent>,
    mut gates: Query<&mut MouthOpenGate>,
    mut aim: MessageWriter<AimSignalEvent>,
) {
    for event in thrown.read() {
        for mut gate in gates.iter_mut() {
            gate.arm_forced_open(
                sim_clock.now(),
                Duration::from_secs_f32(config.mouth.forced_open_after_throw),
            );
        }
        aim.write(AimSignalEvent::TrackThrown(event.item));
    }
}

/// Mirrors the live possession signal into the gate; regaining food cancels
/// the forced-open window.
pub fn apply_possession_to_gate(
    hands: Res<PlayerHands>,
    mut changes: MessageReader<FoodPossessionChangedEvent>,
    mut gates: Query<&mut MouthOpenGate>,
) {
    let regained = changes.read().any(|change| change.has_food);
    for mut gate in gates.iter_mut() {
        if gate.player_has_food != hands.has_food {
            gate.player_has_food = hands.has_food;
        }
        if regained {
            gate.clear_forced_open();
        }
    }
}
