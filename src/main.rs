use bevy::prelude::*;

mod core;
mod food;
mod hippo;
mod player;
mod ui;
mod world;

use crate::{
    core::CorePlugin, food::FoodPlugin, hippo::HippoPlugin, player::PlayerPlugin, ui::UiPlugin,
    world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            WorldPlugin,
            FoodPlugin,
            HippoPlugin,
            PlayerPlugin,
            UiPlugin, // After HippoPlugin to receive SatiationChangedEvent
        ))
        .run();
}
