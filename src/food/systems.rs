//! Systems driving food bodies, piece release, and despawn lifetimes.
use bevy::{math::primitives::Sphere, prelude::*};
use rand::{thread_rng, Rng};

use crate::{
    core::plugin::SimulationClock,
    food::{
        components::{
            Body, DespawnClock, Edible, FoodItem, FoodKind, ImpactCue, PendingRelease, Piece,
            PieceBlueprint, PieceGroupRoot, Shrink, ThrownFood,
        },
        config::FoodConfig,
        events::{AudioCue, AudioCueEvent, GroundImpactEvent},
        release::{draw_piece_lifetime, eject_direction, release_delays},
    },
};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
const GROUND_BOUNCE: f32 = 0.25;
const GROUND_FRICTION: f32 = 0.6;
const REST_SPEED: f32 = 0.35;
const MIN_IMPACT_SPEED: f32 = 0.1;

const BREAK_CUE_VOLUME: f32 = 1.0;
const PIECE_CUE_VOLUME: f32 = 0.6;

/// Integrates gravity and velocities for every non-kinematic body.
pub fn integrate_bodies(
    sim_clock: Res<SimulationClock>,
    mut impacts: MessageWriter<GroundImpactEvent>,
    mut query: Query<(Entity, &mut Body, &mut Transform)>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut body, mut transform) in query.iter_mut() {
        if body.kinematic {
            continue;
        }

        body.velocity += GRAVITY * dt;
        transform.translation += body.velocity * dt;
        if body.angular_velocity != Vec3::ZERO {
            transform.rotation =
                (Quat::from_scaled_axis(body.angular_velocity * dt) * transform.rotation)
                    .normalize();
        }

        if transform.translation.y < body.radius && body.velocity.y < 0.0 {
            transform.translation.y = body.radius;
            let speed = body.velocity.length();
            if !body.grounded && speed > MIN_IMPACT_SPEED {
                impacts.write(GroundImpactEvent { entity, speed });
            }

            body.velocity.y = -body.velocity.y * GROUND_BOUNCE;
            body.velocity.x *= GROUND_FRICTION;
            body.velocity.z *= GROUND_FRICTION;
            body.angular_velocity *= GROUND_FRICTION;
            if body.velocity.length() < REST_SPEED {
                body.velocity = Vec3::ZERO;
                body.angular_velocity = Vec3::ZERO;
                body.grounded = true;
            }
        }
    }
}

/// Shatters a thrown whole item that lands hard, outside the mouth.
pub fn break_thrown_on_impact(
    mut commands: Commands,
    mut impacts: MessageReader<GroundImpactEvent>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<FoodConfig>,
    thrown: Query<(&FoodItem, &Transform), With<ThrownFood>>,
) {
    let mut rng = thread_rng();
    for impact in impacts.read() {
        // the item may already be despawned or caught; degrade to a no-op
        let Ok((item, transform)) = thrown.get(impact.entity) else {
            continue;
        };
        if impact.speed < config.impact.min_break_speed {
            continue;
        }
        let FoodKind::WholeBreakable { blueprint } = &item.kind else {
            continue;
        };

        debug!(
            "Thrown food shatters on impact at {:.1} m/s",
            impact.speed
        );
        spawn_free_pieces(
            &mut commands,
            &mut meshes,
            &mut materials,
            blueprint,
            Transform::from_translation(transform.translation).with_rotation(transform.rotation),
            &config,
            &mut rng,
        );
        cues.write(AudioCueEvent::new(AudioCue::BreakSplat, BREAK_CUE_VOLUME));
        commands.entity(impact.entity).despawn();
    }
}

/// Instantiates a piece group under a root entity and schedules every piece.
///
/// This is the Begin() moment: pieces start frozen, each despawn lifetime is
/// armed here (independent of release), and release delays come from the
/// size ordering plus jitter.
pub fn spawn_piece_group<R: Rng>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    blueprint: &PieceBlueprint,
    origin: Transform,
    total_duration: f32,
    config: &FoodConfig,
    rng: &mut R,
) -> Entity {
    let root = commands
        .spawn((
            origin,
            Visibility::default(),
            PieceGroupRoot,
            Name::new("Piece Group"),
        ))
        .id();

    let sizes = blueprint.sizes();
    let delays = release_delays(
        &sizes,
        total_duration,
        config.release.curve,
        config.release.order,
        config.release.jitter,
        rng,
    );

    for (index, spec) in blueprint.pieces.iter().enumerate() {
        let mut body = Body::dynamic(spec.radius);
        body.freeze();
        let lifetime = draw_piece_lifetime(
            config.despawn.lifetime_min,
            config.despawn.lifetime_max,
            rng,
        );
        let piece = spawn_piece_entity(
            commands,
            meshes,
            materials,
            spec.radius,
            Transform::from_translation(spec.offset),
            body,
            sizes[index],
            lifetime,
        );
        commands.entity(piece).insert((
            PendingRelease {
                remaining: delays[index],
            },
            ChildOf(root),
        ));
    }

    root
}

/// Spawns a blueprint as free-standing pieces with an explosion impulse.
///
/// Used when a whole item breaks outside the mouth; there is no progressive
/// release, but every piece still gets its independent despawn lifetime.
pub fn spawn_free_pieces<R: Rng>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    blueprint: &PieceBlueprint,
    origin: Transform,
    config: &FoodConfig,
    rng: &mut R,
) {
    let sizes = blueprint.sizes();
    for (index, spec) in blueprint.pieces.iter().enumerate() {
        let mut body = Body::dynamic(spec.radius);
        let scale = config.impact.explosion_impulse
            * (1.0
                + rng.gen_range(
                    -config.impact.explosion_randomness..=config.impact.explosion_randomness,
                ));
        body.apply_impulse(eject_direction(config.impact.explosion_up_bias, rng) * scale);
        body.angular_velocity = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        ) * scale;

        let lifetime = draw_piece_lifetime(
            config.despawn.lifetime_min,
            config.despawn.lifetime_max,
            rng,
        );
        let transform = Transform::from_translation(
            origin.translation + origin.rotation * spec.offset,
        )
        .with_rotation(origin.rotation);
        spawn_piece_entity(
            commands,
            meshes,
            materials,
            spec.radius,
            transform,
            body,
            sizes[index],
            lifetime,
        );
    }
}

/// Spawns a food item in flight with the given initial motion.
///
/// Whole breakables also get the `ThrownFood` marker so a hard landing
/// outside the mouth shatters them.
pub fn spawn_food_item(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    kind: FoodKind,
    transform: Transform,
    velocity: Vec3,
    angular_velocity: Vec3,
) -> Entity {
    let (radius, color, name) = match kind {
        FoodKind::WholeBreakable { .. } => (0.18, Color::srgb_u8(80, 160, 80), "Thrown Melon"),
        FoodKind::Carryable => (0.12, Color::srgb_u8(200, 180, 90), "Carryable Snack"),
    };
    let thrown = matches!(kind, FoodKind::WholeBreakable { .. });

    let mut body = Body::dynamic(radius);
    body.velocity = velocity;
    body.angular_velocity = angular_velocity;

    let mut entity = commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Sphere::new(radius)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.6,
            ..default()
        })),
        transform,
        body,
        FoodItem { kind },
        Edible,
        Name::new(name),
    ));
    if thrown {
        entity.insert(ThrownFood);
    }
    entity.id()
}

#[allow(clippy::too_many_arguments)]
fn spawn_piece_entity(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    radius: f32,
    transform: Transform,
    body: Body,
    size: f32,
    lifetime: f32,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Mesh::from(Sphere::new(radius)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb_u8(220, 80, 70),
                perceptual_roughness: 0.7,
                ..default()
            })),
            transform,
            body,
            Piece { size },
            DespawnClock::new(lifetime),
            ImpactCue::default(),
            Name::new("Food Piece"),
        ))
        .id()
}

/// Counts down each pending release and detaches the piece when it fires.
pub fn tick_piece_release(
    mut commands: Commands,
    sim_clock: Res<SimulationClock>,
    config: Res<FoodConfig>,
    mut query: Query<(
        Entity,
        &GlobalTransform,
        &mut Transform,
        &mut Body,
        &mut PendingRelease,
    )>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    if dt <= 0.0 {
        return;
    }

    let mut rng = thread_rng();
    for (entity, global, mut transform, mut body, mut pending) in query.iter_mut() {
        pending.remaining -= dt;
        if pending.remaining > 0.0 {
            continue;
        }

        // detach at the world pose so the mouth-follow motion stops dragging it
        *transform = global.compute_transform();
        commands
            .entity(entity)
            .remove::<ChildOf>()
            .remove::<PendingRelease>();

        body.unfreeze();
        if config.release.ejection_impulse > 0.0 {
            let direction = eject_direction(config.release.ejection_up_bias, &mut rng);
            body.apply_impulse(direction * config.release.ejection_impulse);
        }
    }
}

/// Advances despawn lifetimes and the shrink tween; destroys finished pieces.
///
/// Armed at schedule time and never cancelled: a piece still attached to its
/// group shrinks and despawns all the same.
pub fn tick_piece_despawn(
    mut commands: Commands,
    sim_clock: Res<SimulationClock>,
    config: Res<FoodConfig>,
    mut query: Query<(Entity, &mut DespawnClock, &mut Transform)>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut clock, mut transform) in query.iter_mut() {
        if clock.shrink.is_none() {
            clock.life_remaining -= dt;
            if clock.life_remaining > 0.0 {
                continue;
            }
            clock.shrink = Some(Shrink {
                elapsed: 0.0,
                start_scale: transform.scale,
            });
            // the tween starts advancing next tick
            continue;
        }

        if let Some(shrink) = clock.shrink.as_mut() {
            shrink.elapsed += dt;
            let k = (shrink.elapsed / config.despawn.shrink_duration).clamp(0.0, 1.0);
            transform.scale = shrink.start_scale.lerp(Vec3::ZERO, k);
            if k >= 1.0 {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Removes group roots whose last piece has been released or despawned.
pub fn cleanup_spent_groups(
    mut commands: Commands,
    roots: Query<(Entity, Option<&Children>), With<PieceGroupRoot>>,
) {
    for (entity, children) in roots.iter() {
        if children.map_or(true, |children| children.is_empty()) {
            commands.entity(entity).despawn();
        }
    }
}

/// Emits a rate-limited impact cue when a released piece lands hard.
pub fn emit_piece_impact_cues(
    sim_clock: Res<SimulationClock>,
    config: Res<FoodConfig>,
    mut impacts: MessageReader<GroundImpactEvent>,
    mut cues: MessageWriter<AudioCueEvent>,
    mut pieces: Query<&mut ImpactCue, With<Piece>>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    for mut cue in pieces.iter_mut() {
        if cue.cooldown_remaining > 0.0 {
            cue.cooldown_remaining -= dt;
        }
    }

    for impact in impacts.read() {
        let Ok(mut cue) = pieces.get_mut(impact.entity) else {
            continue;
        };
        if impact.speed < config.impact.piece_cue_min_speed || cue.cooldown_remaining > 0.0 {
            continue;
        }
        cue.cooldown_remaining = config.impact.piece_cue_cooldown;
        cues.write(AudioCueEvent::new(AudioCue::PieceImpact, PIECE_CUE_VOLUME));
    }
}

/// Boundary sink: the audio backend is external, so cue requests are logged.
pub fn log_audio_cues(mut cues: MessageReader<AudioCueEvent>) {
    for cue in cues.read() {
        debug!("Audio cue: {} (volume {:.2})", cue.cue.label(), cue.volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::{
        config::{DespawnConfig, ImpactConfig, ReleaseConfig},
        release::{ReleaseCurve, ReleaseOrder},
    };
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn test_config() -> FoodConfig {
        FoodConfig {
            release: ReleaseConfig {
                order: ReleaseOrder::SmallFirst,
                curve: ReleaseCurve::Linear,
                jitter: 0.0,
                ejection_impulse: 0.4,
                ejection_up_bias: 0.2,
            },
            despawn: DespawnConfig {
                lifetime_min: 1.0,
                lifetime_max: 1.0,
                shrink_duration: 0.5,
            },
            impact: ImpactConfig {
                min_break_speed: 3.0,
                explosion_impulse: 2.2,
                explosion_up_bias: 0.3,
                explosion_randomness: 0.6,
                piece_cue_min_speed: 0.7,
                piece_cue_cooldown: 0.06,
            },
        }
    }

    fn world_with_tick(dt: f32) -> World {
        let mut world = World::new();
        let mut clock = SimulationClock::new(1.0);
        clock.tick(Duration::from_secs_f32(dt));
        world.insert_resource(clock);
        world.insert_resource(test_config());
        world
    }

    fn frozen_body() -> Body {
        let mut body = Body::dynamic(0.1);
        body.freeze();
        body
    }

    #[test]
    fn despawn_fires_while_release_is_still_pending() {
        let mut world = world_with_tick(1.0);
        let piece = world
            .spawn((
                Transform::default(),
                frozen_body(),
                Piece { size: 1.0 },
                DespawnClock::new(1.0),
                // release scheduled far in the future; despawn must win
                PendingRelease { remaining: 100.0 },
            ))
            .id();

        // lifetime lapses: the shrink tween arms
        let _ = world.run_system_once(tick_piece_despawn);
        assert!(world.get::<DespawnClock>(piece).unwrap().shrink.is_some());

        // tween completes and the piece is destroyed, still unreleased
        let _ = world.run_system_once(tick_piece_despawn);
        assert!(!world.entities().contains(piece));
    }

    #[test]
    fn release_detaches_and_unfreezes_the_piece() {
        let mut world = world_with_tick(0.1);
        let root = world
            .spawn((Transform::default(), PieceGroupRoot))
            .id();
        let piece = world
            .spawn((
                Transform::default(),
                frozen_body(),
                Piece { size: 1.0 },
                DespawnClock::new(100.0),
                PendingRelease { remaining: 0.05 },
                ChildOf(root),
            ))
            .id();

        let _ = world.run_system_once(tick_piece_release);

        assert!(world.get::<ChildOf>(piece).is_none());
        assert!(world.get::<PendingRelease>(piece).is_none());
        let body = world.get::<Body>(piece).unwrap();
        assert!(!body.kinematic);
        // the ejection impulse is biased upward
        assert!(body.velocity.y > 0.0);
    }
}
