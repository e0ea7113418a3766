// src/ui/satiation_bar/systems.rs
//
// Spawns the satiation bar and keeps its fill in step with the cycle.

use bevy::prelude::*;

use crate::{
    core::plugin::SimulationClock, hippo::events::SatiationChangedEvent,
    ui::satiation_bar::components::{SatiationBarFill, SatiationBarFrame},
};

const BAR_WIDTH: f32 = 260.0;
const BAR_HEIGHT: f32 = 22.0;

/// Spawns the screen-space satiation bar in the lower-left corner.
pub fn spawn_satiation_bar(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Px(24.0),
                width: Val::Px(BAR_WIDTH),
                height: Val::Px(BAR_HEIGHT),
                padding: UiRect::all(Val::Px(2.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..Default::default()
            },
            BackgroundColor(Color::srgba(0.08, 0.08, 0.1, 0.9)),
            BorderColor::from(Color::srgb(0.3, 0.3, 0.32)),
            SatiationBarFrame,
            Name::new("Satiation Bar"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Percent(0.0),
                    height: Val::Percent(100.0),
                    ..Default::default()
                },
                BackgroundColor(Color::srgb(0.85, 0.55, 0.25)),
                SatiationBarFill::default(),
                Name::new("Satiation Bar Fill"),
            ));
        });
}

/// Applies fill updates pushed by the satiation cycle.
pub fn apply_satiation_updates(
    mut updates: MessageReader<SatiationChangedEvent>,
    mut fills: Query<&mut SatiationBarFill>,
) {
    for update in updates.read() {
        for mut fill in fills.iter_mut() {
            match update.smoothing {
                Some(rate) => fill.set_target(update.value, rate),
                None => fill.set_immediate(update.value),
            }
        }
    }
}

/// Animates the fill and mirrors it into the node width.
pub fn animate_bar_fill(
    sim_clock: Res<SimulationClock>,
    mut fills: Query<(&mut SatiationBarFill, &mut Node)>,
) {
    let dt = sim_clock.last_scaled_delta().as_secs_f32();
    for (mut fill, mut node) in fills.iter_mut() {
        fill.advance(dt);
        let width = Val::Percent(fill.current * 100.0);
        if node.width != width {
            node.width = width;
        }
    }
}
