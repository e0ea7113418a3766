//! Components and resources for the player's hands and throw loop.
use bevy::prelude::*;

/// Marker component identifying the player viewpoint (attached to the camera).
#[derive(Component, Debug)]
pub struct Player;

/// Tracks whether the player currently holds food, and the restock timer.
#[derive(Resource, Debug)]
pub struct PlayerHands {
    pub has_food: bool,
    /// Counts down to the next automatic restock after a throw.
    pub restock_remaining: Option<f32>,
}

impl Default for PlayerHands {
    fn default() -> Self {
        Self {
            has_food: true,
            restock_remaining: None,
        }
    }
}
