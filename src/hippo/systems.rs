//! Systems connecting the capture session, mouth gate, and satiation cycle.
use std::time::Duration;

use bevy::{math::primitives::Capsule3d, prelude::*};
use rand::thread_rng;

use crate::{
    core::plugin::SimulationClock,
    food::{
        components::{Body, Edible, FoodItem, FoodKind, Piece, PieceGroupRoot, ThrownFood},
        config::FoodConfig,
        events::{AudioCue, AudioCueEvent},
        systems::{spawn_free_pieces, spawn_piece_group},
    },
    hippo::{
        components::{AnimatorFlags, Hippo, MouthOpenGate, MouthZone},
        config::FeedingConfig,
        events::{
            AimSignalEvent, AnimationCue, AnimationCueEvent, FoodConsumedEvent,
            SatiationChangedEvent,
        },
        satiation::SatiationCycle,
        session::MouthSession,
    },
    player::components::Player,
};

const HIPPO_POSITION: Vec3 = Vec3::new(0.0, 1.1, 0.0);
const MOUTH_ANCHOR_OFFSET: Vec3 = Vec3::new(0.0, 0.4, 1.6);
const MOUTH_ZONE_RADIUS: f32 = 0.7;
const CHEW_CUE_VOLUME: f32 = 1.0;

/// Spawns the hippo with its feeding components and mouth anchor.
pub fn spawn_hippo(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands
        .spawn((
            Mesh3d(meshes.add(Mesh::from(Capsule3d::new(1.1, 1.8)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb_u8(130, 110, 140),
                perceptual_roughness: 0.8,
                ..default()
            })),
            Transform::from_translation(HIPPO_POSITION),
            Hippo,
            AnimatorFlags::default(),
            MouthOpenGate::default(),
            MouthSession::default(),
            SatiationCycle::default(),
            Name::new("Hippo"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Transform::from_translation(MOUTH_ANCHOR_OFFSET),
                MouthZone::new(MOUTH_ZONE_RADIUS),
                Name::new("Mouth Anchor"),
            ));
        });
}

/// Starts a capture session when an edible item enters the mouth zone.
pub fn detect_mouth_contact(
    mut commands: Commands,
    config: Res<FeedingConfig>,
    mut hippo: Query<(&mut MouthSession, &mut AnimatorFlags), With<Hippo>>,
    zones: Query<(&GlobalTransform, &MouthZone)>,
    mut foods: Query<
        (Entity, &GlobalTransform, &FoodItem, &mut Body),
        (With<Edible>, Without<Piece>),
    >,
    mut cues: MessageWriter<AnimationCueEvent>,
) {
    let Ok((mut session, mut flags)) = hippo.single_mut() else {
        return;
    };
    if !session.is_idle() {
        return;
    }
    let Ok((zone_transform, zone)) = zones.single() else {
        return;
    };
    if !zone.enabled {
        return;
    }

    let zone_position = zone_transform.translation();
    for (entity, transform, item, mut body) in foods.iter_mut() {
        if transform.translation().distance(zone_position) > zone.radius {
            continue;
        }

        let breakable = matches!(item.kind, FoodKind::WholeBreakable { .. });
        if !session.on_contact(entity, breakable, &config.chew) {
            continue;
        }

        body.freeze();
        commands.entity(entity).remove::<ThrownFood>();
        flags.mouth_open = true;
        cues.write(AnimationCueEvent {
            cue: AnimationCue::FoodCatch,
        });
        info!(
            "Mouth catches {} food",
            if breakable { "a whole" } else { "a carryable" }
        );
        break;
    }
}

/// Advances the capture session and applies everything it decided.
#[allow(clippy::too_many_arguments)]
pub fn tick_capture_session(
    mut commands: Commands,
    sim_clock: Res<SimulationClock>,
    config: Res<FeedingConfig>,
    food_config: Res<FoodConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut hippo: Query<(&mut MouthSession, &mut AnimatorFlags, &mut MouthOpenGate), With<Hippo>>,
    anchor: Query<&GlobalTransform, With<MouthZone>>,
    mut held: Query<(&mut Transform, Option<&FoodItem>), Or<(With<FoodItem>, With<PieceGroupRoot>)>>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut consumed: MessageWriter<FoodConsumedEvent>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    if dt <= 0.0 {
        return;
    }
    let Ok((mut session, mut flags, mut gate)) = hippo.single_mut() else {
        return;
    };

    let outcome = session.tick(dt);
    let mut rng = thread_rng();

    if let Some(item) = outcome.convert {
        // the item may have been destroyed externally; degrade to a no-op
        if let Ok((transform, Some(item_data))) = held.get_mut(item) {
            if let FoodKind::WholeBreakable { blueprint } = &item_data.kind {
                let pose = Transform::from_translation(transform.translation)
                    .with_rotation(transform.rotation);
                let root = spawn_piece_group(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    blueprint,
                    pose,
                    config.chew.seconds,
                    &food_config,
                    &mut rng,
                );
                session.hold_group(root);
                info!("Whole food converts into {} pieces", blueprint.pieces.len());
            }
            commands.entity(item).despawn();
            cues.write(AudioCueEvent::new(AudioCue::ChewLoop, CHEW_CUE_VOLUME));
        }
    }

    if let Some(item) = outcome.force_break {
        // chew ended before conversion: break the whole item on the spot
        if let Ok((transform, Some(item_data))) = held.get_mut(item) {
            if let FoodKind::WholeBreakable { blueprint } = &item_data.kind {
                let pose = Transform::from_translation(transform.translation)
                    .with_rotation(transform.rotation);
                spawn_free_pieces(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    blueprint,
                    pose,
                    &food_config,
                    &mut rng,
                );
            }
            commands.entity(item).despawn();
            cues.write(AudioCueEvent::new(AudioCue::BreakSplat, CHEW_CUE_VOLUME));
        }
    }

    // drag whatever the mouth holds toward the anchor; exponential approach
    // keeps convergence framerate-independent
    if let Some(target) = session.follow_target() {
        if let Ok(anchor_transform) = anchor.single() {
            if let Ok((mut transform, _)) = held.get_mut(target) {
                let anchor_pose = anchor_transform.compute_transform();
                let rate = (config.chew.hold_approach_rate * dt).min(1.0);
                transform.translation = transform.translation.lerp(anchor_pose.translation, rate);
                transform.rotation = transform
                    .rotation
                    .slerp(anchor_pose.rotation, rate)
                    .normalize();
            }
        }
    }

    if outcome.arm_eat_lock {
        gate.arm_eat_lock(
            sim_clock.now(),
            Duration::from_secs_f32(config.chew.eat_lock_duration),
        );
        // close immediately for safety
        flags.mouth_open = false;
    }

    if outcome.close_mouth {
        flags.mouth_open = false;
        gate.clear_forced_open();
    }

    if outcome.finished {
        flags.mouth_open = false;
        cues.write(AudioCueEvent::new(AudioCue::ChewStop, CHEW_CUE_VOLUME));
        consumed.write(FoodConsumedEvent);
        debug!("Chew finished; consumption reported");
    }
}

/// Recomputes the authoritative mouth-open flag from the gate every tick.
pub fn update_mouth_gate(
    sim_clock: Res<SimulationClock>,
    config: Res<FeedingConfig>,
    mut hippo: Query<(&GlobalTransform, &MouthOpenGate, &mut AnimatorFlags), With<Hippo>>,
    player: Query<&GlobalTransform, With<Player>>,
) {
    let Ok((hippo_transform, gate, mut flags)) = hippo.single_mut() else {
        return;
    };
    if !gate.enabled {
        return;
    }
    let Ok(player_transform) = player.single() else {
        return;
    };

    let distance = hippo_transform
        .translation()
        .distance(player_transform.translation());
    let open = gate.effective_open(sim_clock.now(), distance, config.mouth.open_radius);
    if flags.mouth_open != open {
        flags.mouth_open = open;
    }
}

/// Applies consumption notifications to the satiation cycle.
pub fn apply_consumption(
    config: Res<FeedingConfig>,
    mut consumed: MessageReader<FoodConsumedEvent>,
    mut hippo: Query<
        (&mut SatiationCycle, &mut AnimatorFlags, &mut MouthOpenGate),
        With<Hippo>,
    >,
    mut zones: Query<&mut MouthZone>,
    mut bar: MessageWriter<SatiationChangedEvent>,
    mut aim: MessageWriter<AimSignalEvent>,
) {
    let Ok((mut cycle, mut flags, mut gate)) = hippo.single_mut() else {
        return;
    };

    for _ in consumed.read() {
        let outcome = cycle.notify_consumed(&config.sleep);
        if !outcome.accepted {
            debug!("Consumption ignored while sleeping");
            continue;
        }

        if let Some(value) = outcome.progress {
            bar.write(SatiationChangedEvent {
                value,
                smoothing: Some(config.bar_fill_rate),
            });
        }
        info!(
            "Hippo eats ({}/{})",
            cycle.eaten_count(),
            config.sleep.meals_to_sleep
        );

        if outcome.began_sleep {
            flags.sleeping = true;
            flags.mouth_open = false;
            gate.enabled = false;
            for mut zone in zones.iter_mut() {
                zone.enabled = false;
            }
            aim.write(AimSignalEvent::Suspend);
            info!("Hippo is full and settles down to sleep");
        }
    }
}

/// Drains satiation during sleep and re-enables feeding after the wake delay.
pub fn tick_satiation_cycle(
    sim_clock: Res<SimulationClock>,
    config: Res<FeedingConfig>,
    mut hippo: Query<
        (&mut SatiationCycle, &mut AnimatorFlags, &mut MouthOpenGate),
        With<Hippo>,
    >,
    mut zones: Query<&mut MouthZone>,
    mut bar: MessageWriter<SatiationChangedEvent>,
    mut aim: MessageWriter<AimSignalEvent>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    let Ok((mut cycle, mut flags, mut gate)) = hippo.single_mut() else {
        return;
    };

    let outcome = cycle.tick(dt, &config.sleep);
    if let Some(value) = outcome.progress_immediate {
        bar.write(SatiationChangedEvent {
            value,
            smoothing: None,
        });
    }

    if outcome.woke {
        flags.sleeping = false;
        gate.enabled = true;
        for mut zone in zones.iter_mut() {
            zone.enabled = true;
        }
        aim.write(AimSignalEvent::Resume);
        info!("Hippo wakes up hungry again");
    }
}

/// Boundary sink: the render-side animator is external, so flag changes are logged.
pub fn log_animator_flags(flags: Query<&AnimatorFlags, Changed<AnimatorFlags>>) {
    for state in flags.iter() {
        debug!(
            "Animator flags: mouth_open={} sleeping={}",
            state.mouth_open, state.sleeping
        );
    }
}

/// Boundary sink for one-shot animation cues.
pub fn log_animation_cues(mut cues: MessageReader<AnimationCueEvent>) {
    for event in cues.read() {
        debug!("Animation cue: {}", event.cue.label());
    }
}

/// Boundary sink for the aim/look-at rig.
pub fn log_aim_signals(mut signals: MessageReader<AimSignalEvent>) {
    for signal in signals.read() {
        debug!("Aim signal: {}", signal.label());
    }
}
