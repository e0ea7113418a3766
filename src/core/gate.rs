//! TimedGate: a boolean that stays true until a deadline on the simulation clock.
use std::time::Duration;

/// A time-windowed boolean compared against an injected clock.
///
/// The gate holds at most a deadline; it is "active" while the clock's
/// elapsed time is strictly below that deadline. Arming replaces any
/// previous deadline, clearing drops it. Nothing here reads wall time,
/// so gate behavior is fully deterministic under a driven clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimedGate {
    deadline: Option<Duration>,
}

impl TimedGate {
    /// Arms the gate to stay active for `duration` starting at `now`.
    pub fn arm(&mut self, now: Duration, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    /// Drops the deadline; the gate reads inactive immediately.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// True iff `now` is strictly before the armed deadline.
    pub fn is_active(&self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) => now < deadline,
            None => false,
        }
    }
}
