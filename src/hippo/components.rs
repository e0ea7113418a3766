//! Hippo-side components: markers, mouth zone, open gate, animator flags.
use std::time::Duration;

use bevy::prelude::*;

use crate::core::gate::TimedGate;

/// Marker component for the hippo root entity.
#[derive(Component, Debug, Default)]
pub struct Hippo;

/// Trigger zone at the mouth anchor; food entering it starts a session.
#[derive(Component, Debug)]
pub struct MouthZone {
    pub radius: f32,
    /// Disabled while the hippo sleeps so no contact is possible.
    pub enabled: bool,
}

impl MouthZone {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            enabled: true,
        }
    }
}

/// Boolean flags mirrored to the external animator every tick.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorFlags {
    pub mouth_open: bool,
    pub sleeping: bool,
}

/// Arbitrates every "should the mouth be open" signal.
///
/// Output is a pure function of the four gates plus the live
/// proximity/possession pair, recomputed every tick. Precedence, highest
/// first: eat-lock suppression, explicit override, forced-open-after-throw,
/// proximity with food in hand.
#[derive(Component, Debug)]
pub struct MouthOpenGate {
    /// Disabled while the hippo sleeps; the gate then reports nothing.
    pub enabled: bool,
    pub player_has_food: bool,
    forced_open: TimedGate,
    override_gate: TimedGate,
    override_value: bool,
    eat_lock: TimedGate,
}

impl Default for MouthOpenGate {
    fn default() -> Self {
        Self {
            enabled: true,
            player_has_food: false,
            forced_open: TimedGate::default(),
            override_gate: TimedGate::default(),
            override_value: false,
            eat_lock: TimedGate::default(),
        }
    }
}

impl MouthOpenGate {
    /// Keeps the mouth open for a window after a throw, independent of
    /// proximity, so it stays open while the item is still in the air.
    pub fn arm_forced_open(&mut self, now: Duration, duration: Duration) {
        self.forced_open.arm(now, duration);
    }

    /// Cancels the forced-open window (possession regained).
    pub fn clear_forced_open(&mut self) {
        self.forced_open.clear();
    }

    /// Short-circuits the proximity logic entirely for the window.
    pub fn arm_override(&mut self, now: Duration, duration: Duration, value: bool) {
        self.override_value = value;
        self.override_gate.arm(now, duration);
    }

    /// Suppresses opening regardless of every other signal.
    ///
    /// The caller is expected to force the visible flag closed at arm time.
    pub fn arm_eat_lock(&mut self, now: Duration, duration: Duration) {
        self.eat_lock.arm(now, duration);
    }

    /// The authoritative mouth-open decision for this instant.
    pub fn effective_open(&self, now: Duration, player_distance: f32, open_radius: f32) -> bool {
        let locked_eating = self.eat_lock.is_active(now);
        let has_override = self.override_gate.is_active(now);
        let forced_open = self.forced_open.is_active(now);
        let proximity_open = player_distance <= open_radius && self.player_has_food;

        let computed = if has_override {
            self.override_value
        } else {
            forced_open || proximity_open
        };
        if locked_eating {
            false
        } else {
            computed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    const RADIUS: f32 = 3.0;

    fn gate_with(
        now: Duration,
        eat_lock: bool,
        override_open: bool,
        forced: bool,
        has_food: bool,
    ) -> MouthOpenGate {
        let mut gate = MouthOpenGate::default();
        if eat_lock {
            gate.arm_eat_lock(now, secs(10.0));
        }
        if override_open {
            gate.arm_override(now, secs(10.0), true);
        }
        if forced {
            gate.arm_forced_open(now, secs(10.0));
        }
        gate.player_has_food = has_food;
        gate
    }

    #[test]
    fn eat_lock_wins_over_every_other_signal() {
        let now = secs(1.0);
        // all 8 combinations of override / forced-open / proximity+food
        for bits in 0..8u8 {
            let gate = gate_with(now, true, bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            assert!(
                !gate.effective_open(now, 0.5, RADIUS),
                "combination {:03b} opened through an eat lock",
                bits
            );
        }
    }

    #[test]
    fn forced_open_window_ignores_proximity() {
        let mut gate = MouthOpenGate::default();
        gate.arm_forced_open(Duration::ZERO, secs(1.5));

        // player far away and empty-handed the whole time
        assert!(gate.effective_open(Duration::ZERO, 50.0, RADIUS));
        assert!(gate.effective_open(secs(1.4), 50.0, RADIUS));
        assert!(!gate.effective_open(secs(1.5), 50.0, RADIUS));
        assert!(!gate.effective_open(secs(2.0), 50.0, RADIUS));
    }

    #[test]
    fn proximity_needs_both_distance_and_possession() {
        let now = secs(0.0);
        let mut gate = MouthOpenGate::default();

        gate.player_has_food = true;
        assert!(gate.effective_open(now, 2.9, RADIUS));
        assert!(!gate.effective_open(now, 3.1, RADIUS));

        gate.player_has_food = false;
        assert!(!gate.effective_open(now, 2.9, RADIUS));
    }

    #[test]
    fn override_short_circuits_proximity_both_ways() {
        let now = secs(0.0);

        // closed override while the player stands close with food
        let mut gate = MouthOpenGate::default();
        gate.player_has_food = true;
        gate.arm_override(now, secs(1.0), false);
        assert!(!gate.effective_open(now, 1.0, RADIUS));

        // open override while the player is far and empty-handed
        let mut gate = MouthOpenGate::default();
        gate.arm_override(now, secs(1.0), true);
        assert!(gate.effective_open(now, 50.0, RADIUS));

        // window lapses: back to live proximity
        assert!(!gate.effective_open(secs(1.0), 50.0, RADIUS));
    }

    #[test]
    fn clearing_forced_open_closes_the_mouth() {
        let mut gate = MouthOpenGate::default();
        gate.arm_forced_open(Duration::ZERO, secs(5.0));
        assert!(gate.effective_open(secs(1.0), 50.0, RADIUS));

        gate.clear_forced_open();
        assert!(!gate.effective_open(secs(1.0), 50.0, RADIUS));
    }
}
