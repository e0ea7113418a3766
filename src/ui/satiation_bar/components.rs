// src/ui/satiation_bar/components.rs
//
// Components for the satiation fill bar.

use bevy::prelude::*;

/// Marker component for the bar's outer frame.
#[derive(Component, Debug)]
pub struct SatiationBarFrame;

/// Fill state for the bar: the rendered width tracks `current`, which
/// moves toward `target` at `rate` per second (or snaps when told to).
#[derive(Component, Debug, Default)]
pub struct SatiationBarFill {
    pub current: f32,
    pub target: f32,
    pub rate: f32,
}

impl SatiationBarFill {
    /// Animates toward `value` at `rate` per second.
    pub fn set_target(&mut self, value: f32, rate: f32) {
        self.target = value.clamp(0.0, 1.0);
        self.rate = rate.max(0.0);
    }

    /// Snaps straight to `value`.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value.clamp(0.0, 1.0);
        self.target = self.current;
    }

    /// Moves `current` toward `target`, returning true when it changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if (self.current - self.target).abs() < f32::EPSILON {
            return false;
        }
        let step = self.rate * dt;
        if step <= 0.0 {
            return false;
        }
        let delta = self.target - self.current;
        self.current = if delta.abs() <= step {
            self.target
        } else {
            self.current + step * delta.signum()
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_toward_target_and_stops() {
        let mut fill = SatiationBarFill::default();
        fill.set_target(1.0, 2.0);

        assert!(fill.advance(0.25));
        assert!((fill.current - 0.5).abs() < 1e-6);
        assert!(fill.advance(0.25));
        assert!((fill.current - 1.0).abs() < 1e-6);
        assert!(!fill.advance(0.25));
    }

    #[test]
    fn immediate_snaps_and_clamps() {
        let mut fill = SatiationBarFill::default();
        fill.set_immediate(1.7);
        assert_eq!(fill.current, 1.0);
        assert_eq!(fill.target, 1.0);

        fill.set_immediate(-0.3);
        assert_eq!(fill.current, 0.0);
    }
}
