//! Player-side events consumed by the hippo bridge systems.
use bevy::prelude::{Entity, Event, Message};

/// Fired when the player launches a food item.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct FoodThrownEvent {
    pub item: Entity,
}

/// Fired whenever the "player holds food" signal flips.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct FoodPossessionChangedEvent {
    pub has_food: bool,
}
