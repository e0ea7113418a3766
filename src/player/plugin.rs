//! Player plugin wiring the hands, throw, and bridge systems.
use bevy::prelude::*;

use crate::player::{
    components::PlayerHands,
    events::{FoodPossessionChangedEvent, FoodThrownEvent},
    systems::{
        apply_possession_to_gate, bridge_throw_to_hippo, handle_throw_input, restock_hands,
    },
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerHands>()
            .add_event::<FoodThrownEvent>()
            .add_event::<FoodPossessionChangedEvent>()
            .add_systems(
                Update,
                (
                    handle_throw_input,
                    restock_hands.after(handle_throw_input),
                    bridge_throw_to_hippo.after(handle_throw_input),
                    apply_possession_to_gate.after(restock_hands),
                ),
            );
    }
}
