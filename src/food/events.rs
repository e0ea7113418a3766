//! Food-side events: body impacts and audio cue requests.
use bevy::prelude::{Entity, Event, Message};

/// Fired when a dynamic body hits the ground plane.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct GroundImpactEvent {
    pub entity: Entity,
    pub speed: f32,
}

/// Closed set of audio cues the feeding loop can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    ChewLoop,
    ChewStop,
    Pickup,
    BreakSplat,
    PieceImpact,
}

impl AudioCue {
    pub fn label(self) -> &'static str {
        match self {
            Self::ChewLoop => "chew_loop",
            Self::ChewStop => "chew_stop",
            Self::Pickup => "pickup",
            Self::BreakSplat => "break_splat",
            Self::PieceImpact => "piece_impact",
        }
    }
}

/// Request for the external audio collaborator.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct AudioCueEvent {
    pub cue: AudioCue,
    pub volume: f32,
}

impl AudioCueEvent {
    pub fn new(cue: AudioCue, volume: f32) -> Self {
        Self { cue, volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_labels_are_distinct() {
        let cues = [
            AudioCue::ChewLoop,
            AudioCue::ChewStop,
            AudioCue::Pickup,
            AudioCue::BreakSplat,
            AudioCue::PieceImpact,
        ];
        for (i, a) in cues.iter().enumerate() {
            for b in &cues[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
