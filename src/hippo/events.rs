//! Hippo-side events broadcast between feeding systems and boundary sinks.
use bevy::prelude::{Entity, Event, Message};

/// Fired once per fully consumed food item.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct FoodConsumedEvent;

/// Satiation fill value for the UI collaborator.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct SatiationChangedEvent {
    pub value: f32,
    /// Move-towards rate; `None` snaps the bar immediately.
    pub smoothing: Option<f32>,
}

/// One-shot animation cues for the external animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    FoodCatch,
}

impl AnimationCue {
    pub fn label(self) -> &'static str {
        match self {
            Self::FoodCatch => "food_catch",
        }
    }
}

#[derive(Event, Message, Debug, Clone, Copy)]
pub struct AnimationCueEvent {
    pub cue: AnimationCue,
}

/// Requests for the external aim/look-at rig.
#[derive(Event, Message, Debug, Clone, Copy)]
pub enum AimSignalEvent {
    /// Fade the rig out while sleeping.
    Suspend,
    /// Restore the rig after waking.
    Resume,
    /// Track a thrown item for a while.
    TrackThrown(Entity),
}

impl AimSignalEvent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::TrackThrown(_) => "track_thrown",
        }
    }
}
