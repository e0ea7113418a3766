//! Satiation tracking and the sleep/wake cycle it triggers.
use bevy::prelude::*;

use crate::hippo::config::SleepConfig;

/// Where the cycle currently is.
///
/// `WakeDelay` is still "sleeping" to the outside world; the flag stays up
/// so the stand-up animation can play before feeding re-enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepPhase {
    Awake,
    Draining,
    WakeDelay,
}

/// Counts consumption events and owns the sleep lifecycle they trigger.
#[derive(Component, Debug)]
pub struct SatiationCycle {
    eaten_count: u32,
    progress: f32,
    phase: SleepPhase,
    phase_elapsed: f32,
    drain_start: f32,
}

impl Default for SatiationCycle {
    fn default() -> Self {
        Self {
            eaten_count: 0,
            progress: 0.0,
            phase: SleepPhase::Awake,
            phase_elapsed: 0.0,
            drain_start: 0.0,
        }
    }
}

/// Result of one consumption notification.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ConsumeOutcome {
    /// False while sleeping: the notification was ignored entirely.
    pub accepted: bool,
    /// Fill value to push to the UI, smoothed.
    pub progress: Option<f32>,
    /// The threshold was just reached; apply the sleep side effects.
    pub began_sleep: bool,
}

/// Result of advancing the cycle by one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SatiationTickOutcome {
    /// Fill value to push to the UI immediately (no smoothing) while draining.
    pub progress_immediate: Option<f32>,
    /// The wake delay just elapsed; re-enable the feeding systems.
    pub woke: bool,
}

impl SatiationCycle {
    pub fn eaten_count(&self) -> u32 {
        self.eaten_count
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// True from the moment the threshold is reached until the wake delay
    /// has fully elapsed.
    pub fn is_sleeping(&self) -> bool {
        self.phase != SleepPhase::Awake
    }

    /// Registers one fully consumed item; ignored unless awake.
    pub fn notify_consumed(&mut self, config: &SleepConfig) -> ConsumeOutcome {
        if self.phase != SleepPhase::Awake {
            return ConsumeOutcome::default();
        }

        self.eaten_count = (self.eaten_count + 1).min(config.meals_to_sleep);
        self.progress = (self.eaten_count as f32 / config.meals_to_sleep as f32).clamp(0.0, 1.0);

        let mut outcome = ConsumeOutcome {
            accepted: true,
            progress: Some(self.progress),
            began_sleep: false,
        };

        if self.progress >= 1.0 {
            outcome.began_sleep = true;
            self.phase = SleepPhase::Draining;
            self.phase_elapsed = 0.0;
            self.drain_start = if config.reset_progress {
                1.0
            } else {
                self.progress
            };
        }
        outcome
    }

    /// Advances the drain and wake-delay timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32, config: &SleepConfig) -> SatiationTickOutcome {
        let mut outcome = SatiationTickOutcome::default();
        if dt <= 0.0 {
            return outcome;
        }

        match self.phase {
            SleepPhase::Awake => {}
            SleepPhase::Draining => {
                self.phase_elapsed += dt;
                let k = (self.phase_elapsed / config.duration).clamp(0.0, 1.0);
                self.progress = self.drain_start * (1.0 - k);
                outcome.progress_immediate = Some(self.progress);
                if k >= 1.0 {
                    self.progress = 0.0;
                    self.eaten_count = 0;
                    self.phase = SleepPhase::WakeDelay;
                    self.phase_elapsed = 0.0;
                }
            }
            SleepPhase::WakeDelay => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= config.wake_delay {
                    self.phase = SleepPhase::Awake;
                    self.phase_elapsed = 0.0;
                    outcome.woke = true;
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleep_config() -> SleepConfig {
        SleepConfig {
            meals_to_sleep: 4,
            duration: 15.0,
            wake_delay: 2.5,
            reset_progress: false,
        }
    }

    fn drive_full_sleep(cycle: &mut SatiationCycle, config: &SleepConfig) {
        let mut woke = false;
        for _ in 0..1000 {
            if cycle.tick(0.1, config).woke {
                woke = true;
                break;
            }
        }
        assert!(woke, "cycle never woke up");
    }

    #[test]
    fn sleeps_exactly_once_per_threshold() {
        let config = sleep_config();
        let mut cycle = SatiationCycle::default();
        let mut sleeps = 0;
        let mut delivered = 0;

        // deliver 12 notifications, but only while awake
        while delivered < 12 {
            if cycle.is_sleeping() {
                drive_full_sleep(&mut cycle, &config);
                continue;
            }
            let outcome = cycle.notify_consumed(&config);
            assert!(outcome.accepted);
            delivered += 1;
            assert!(cycle.eaten_count() <= config.meals_to_sleep);
            if outcome.began_sleep {
                sleeps += 1;
            }
        }

        assert_eq!(sleeps, 12 / config.meals_to_sleep as i32);
    }

    #[test]
    fn notifications_while_sleeping_are_ignored() {
        let config = sleep_config();
        let mut cycle = SatiationCycle::default();
        for _ in 0..config.meals_to_sleep {
            cycle.notify_consumed(&config);
        }
        assert!(cycle.is_sleeping());

        let outcome = cycle.notify_consumed(&config);
        assert!(!outcome.accepted);
        assert_eq!(outcome.progress, None);
        assert_eq!(cycle.eaten_count(), config.meals_to_sleep);
    }

    #[test]
    fn count_clamps_at_threshold() {
        let config = SleepConfig {
            meals_to_sleep: 3,
            duration: 1.0,
            wake_delay: 0.5,
            reset_progress: false,
        };
        let mut cycle = SatiationCycle::default();
        cycle.notify_consumed(&config);
        cycle.notify_consumed(&config);
        assert_eq!(cycle.eaten_count(), 2);
        assert!((cycle.progress() - 2.0 / 3.0).abs() < 1e-6);

        cycle.notify_consumed(&config);
        assert_eq!(cycle.eaten_count(), 3);
        assert!(cycle.is_sleeping());
    }

    #[test]
    fn drain_is_linear_and_pushed_immediately() {
        let config = SleepConfig {
            meals_to_sleep: 2,
            duration: 10.0,
            wake_delay: 1.0,
            reset_progress: false,
        };
        let mut cycle = SatiationCycle::default();
        cycle.notify_consumed(&config);
        let outcome = cycle.notify_consumed(&config);
        assert!(outcome.began_sleep);
        assert_eq!(cycle.progress(), 1.0);

        let outcome = cycle.tick(5.0, &config);
        assert_eq!(outcome.progress_immediate, Some(0.5));
        let outcome = cycle.tick(5.0, &config);
        assert_eq!(outcome.progress_immediate, Some(0.0));
        assert_eq!(cycle.eaten_count(), 0);

        // sleeping flag persists through the wake delay
        assert!(cycle.is_sleeping());
        let outcome = cycle.tick(0.5, &config);
        assert!(!outcome.woke);
        assert!(cycle.is_sleeping());
        let outcome = cycle.tick(0.5, &config);
        assert!(outcome.woke);
        assert!(!cycle.is_sleeping());
    }

    #[test]
    fn reset_on_sleep_drains_from_full() {
        let config = SleepConfig {
            meals_to_sleep: 4,
            duration: 4.0,
            wake_delay: 0.1,
            reset_progress: true,
        };
        let mut cycle = SatiationCycle::default();
        for _ in 0..4 {
            cycle.notify_consumed(&config);
        }
        let outcome = cycle.tick(1.0, &config);
        assert_eq!(outcome.progress_immediate, Some(0.75));
    }
}
