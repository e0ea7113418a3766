//! Food items, pieces, and the minimal physical-body stand-in.
use bevy::prelude::*;

/// Fallback size metric for a piece with no usable visual extent.
pub const DEFAULT_PIECE_SIZE: f32 = 1.0;

/// Minimal rigid-body stand-in integrated by `integrate_bodies`.
///
/// Exactly one owner mutates a body at a time: the capture session while the
/// food is held, the environment once it is released or breaks free.
#[derive(Component, Debug, Clone)]
pub struct Body {
    pub kinematic: bool,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Half-extent used for ground contact.
    pub radius: f32,
    pub grounded: bool,
}

impl Body {
    pub fn dynamic(radius: f32) -> Self {
        Self {
            kinematic: false,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            radius,
            grounded: false,
        }
    }

    /// Zeroes all motion and parks the body outside integration.
    pub fn freeze(&mut self) {
        self.kinematic = true;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    pub fn unfreeze(&mut self) {
        self.kinematic = false;
        self.grounded = false;
    }

    /// Velocity-change impulse; ignored while the body is kinematic.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.kinematic {
            return;
        }
        self.velocity += impulse;
    }
}

/// Marker for items the mouth accepts; stands in for the source's tag check.
#[derive(Component, Debug, Default)]
pub struct Edible;

/// Prototype for one detachable piece of a whole item.
#[derive(Debug, Clone)]
pub struct PieceSpec {
    pub offset: Vec3,
    pub radius: f32,
}

/// Blueprint instantiated at conversion time to produce a piece group.
#[derive(Debug, Clone)]
pub struct PieceBlueprint {
    pub pieces: Vec<PieceSpec>,
}

impl PieceBlueprint {
    /// Stock melon: six chunks of uneven size around the core.
    pub fn melon() -> Self {
        let chunk = |x: f32, y: f32, z: f32, radius: f32| PieceSpec {
            offset: Vec3::new(x, y, z),
            radius,
        };
        Self {
            pieces: vec![
                chunk(0.12, 0.05, 0.0, 0.11),
                chunk(-0.12, 0.02, 0.04, 0.09),
                chunk(0.0, 0.1, -0.1, 0.13),
                chunk(0.05, -0.08, 0.09, 0.07),
                chunk(-0.06, -0.05, -0.08, 0.10),
                chunk(0.0, 0.0, 0.13, 0.08),
            ],
        }
    }

    /// Volumetric size metric per piece from its visual bounds.
    pub fn sizes(&self) -> Vec<f32> {
        self.pieces
            .iter()
            .map(|piece| piece_size_metric(piece.radius))
            .collect()
    }
}

/// Axis-aligned bounds volume of a sphere of `radius`, floored away from zero.
pub fn piece_size_metric(radius: f32) -> f32 {
    if radius <= 0.0 {
        return DEFAULT_PIECE_SIZE;
    }
    let edge = radius * 2.0;
    (edge * edge * edge).max(0.0001)
}

/// What a food item becomes once it reaches the mouth.
#[derive(Debug, Clone)]
pub enum FoodKind {
    /// Converts into a piece group after the configured delay.
    WholeBreakable { blueprint: PieceBlueprint },
    /// Consumed directly, no conversion phase.
    Carryable,
}

/// A throwable or hand-held food object.
#[derive(Component, Debug, Clone)]
pub struct FoodItem {
    pub kind: FoodKind,
}

/// Whole item in flight; breaks on hard ground impact unless caught first.
#[derive(Component, Debug, Default)]
pub struct ThrownFood;

/// Root entity a freshly converted piece group hangs off while chewed.
#[derive(Component, Debug, Default)]
pub struct PieceGroupRoot;

/// One detachable piece with its volumetric size metric.
#[derive(Component, Debug, Clone)]
pub struct Piece {
    pub size: f32,
}

/// Countdown to this piece's detach-and-eject moment.
#[derive(Component, Debug, Clone)]
pub struct PendingRelease {
    pub remaining: f32,
}

/// Independent despawn lifetime, armed when the group is scheduled.
///
/// Runs concurrently with release; a piece whose lifetime lapses first is
/// destroyed while still attached and kinematic.
#[derive(Component, Debug, Clone)]
pub struct DespawnClock {
    pub life_remaining: f32,
    pub shrink: Option<Shrink>,
}

impl DespawnClock {
    pub fn new(lifetime: f32) -> Self {
        Self {
            life_remaining: lifetime,
            shrink: None,
        }
    }
}

/// Shrink-to-zero tween state before the final despawn.
#[derive(Debug, Clone)]
pub struct Shrink {
    pub elapsed: f32,
    pub start_scale: Vec3,
}

/// Rate limit for per-piece impact audio cues.
#[derive(Component, Debug, Default)]
pub struct ImpactCue {
    pub cooldown_remaining: f32,
}
