//! Per-item capture session: catch, convert, chew, finish.
use bevy::prelude::*;

use crate::hippo::config::ChewConfig;

/// Slack applied when a countdown crosses zero, absorbing accumulated
/// floating-point error so a timer of 1.2s driven by 0.5+0.5+0.2 ticks
/// fires on the last tick rather than one frame late.
const TIMER_EPSILON: f32 = 1e-4;

/// Lifecycle of one food item inside the mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Caught,
    Converting,
    Consuming,
    Done,
}

/// What the session is currently dragging toward the mouth anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldObject {
    Whole(Entity),
    Group(Entity),
    Carryable(Entity),
}

/// State machine running one item from mouth contact to consumption.
///
/// At most one session per mouth: contacts arriving while a session is
/// active are silently rejected. The chew timer runs in parallel with the
/// conversion timer and is never reset by it, so the effective consumption
/// duration is the chew duration measured from the catch.
#[derive(Component, Debug, Default)]
pub struct MouthSession {
    state: SessionState,
    close_mouth_delay: Option<f32>,
    eat_lock_delay: Option<f32>,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Idle,
    Active {
        state: CaptureState,
        held: Option<HeldObject>,
        convert_remaining: f32,
        chew_remaining: f32,
    },
}

/// Everything a single tick decided; the caller applies the world effects.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionTickOutcome {
    /// Conversion delay elapsed: swap this whole item for its piece group.
    pub convert: Option<Entity>,
    /// Chew finished before conversion: break this whole item immediately.
    pub force_break: Option<Entity>,
    /// Consumption completed; fires exactly once per session.
    pub finished: bool,
    /// The post-catch delay elapsed: arm the gate's eat-lock now.
    pub arm_eat_lock: bool,
    /// The post-catch delay elapsed: shut the visual mouth around the food.
    pub close_mouth: bool,
}

impl MouthSession {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn state(&self) -> CaptureState {
        match &self.state {
            SessionState::Idle => CaptureState::Idle,
            SessionState::Active { state, .. } => *state,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    /// Entity the mouth-follow motion should pull toward the anchor.
    pub fn follow_target(&self) -> Option<Entity> {
        match &self.state {
            SessionState::Active {
                held: Some(held), ..
            } => Some(match held {
                HeldObject::Whole(entity)
                | HeldObject::Group(entity)
                | HeldObject::Carryable(entity) => *entity,
            }),
            _ => None,
        }
    }

    /// Whole item awaiting conversion, if any.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn held_whole(&self) -> Option<Entity> {
        match &self.state {
            SessionState::Active {
                held: Some(HeldObject::Whole(entity)),
                ..
            } => Some(*entity),
            _ => None,
        }
    }

    /// Accepts a new item if the session is idle; rejects otherwise.
    pub fn on_contact(&mut self, item: Entity, breakable: bool, config: &ChewConfig) -> bool {
        if !self.is_idle() {
            return false;
        }

        self.state = SessionState::Active {
            state: CaptureState::Caught,
            held: Some(if breakable {
                HeldObject::Whole(item)
            } else {
                HeldObject::Carryable(item)
            }),
            convert_remaining: if breakable { config.convert_delay } else { 0.0 },
            chew_remaining: config.seconds,
        };
        // the catch settles straight into its first timed phase
        if let SessionState::Active { state, .. } = &mut self.state {
            *state = if breakable {
                CaptureState::Converting
            } else {
                CaptureState::Consuming
            };
        }
        self.close_mouth_delay = Some(config.close_after_catch_delay);
        self.eat_lock_delay = Some(config.eat_lock_delay);
        true
    }

    /// Swaps the cleared whole-item slot for the freshly spawned piece group.
    pub fn hold_group(&mut self, root: Entity) {
        if let SessionState::Active {
            state: CaptureState::Consuming,
            held: held @ None,
            ..
        } = &mut self.state
        {
            *held = Some(HeldObject::Group(root));
        }
    }

    /// Advances all session timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> SessionTickOutcome {
        let mut outcome = SessionTickOutcome::default();
        if dt <= 0.0 {
            return outcome;
        }

        if let Some(remaining) = self.close_mouth_delay.as_mut() {
            *remaining -= dt;
            if *remaining <= TIMER_EPSILON {
                self.close_mouth_delay = None;
                outcome.close_mouth = true;
            }
        }
        if let Some(remaining) = self.eat_lock_delay.as_mut() {
            *remaining -= dt;
            if *remaining <= TIMER_EPSILON {
                self.eat_lock_delay = None;
                outcome.arm_eat_lock = true;
            }
        }

        let SessionState::Active {
            state,
            held,
            convert_remaining,
            chew_remaining,
        } = &mut self.state
        else {
            return outcome;
        };

        if *state == CaptureState::Converting {
            *convert_remaining -= dt;
            if *convert_remaining <= TIMER_EPSILON {
                if let Some(HeldObject::Whole(item)) = held {
                    outcome.convert = Some(*item);
                }
                // the whole-item reference clears here; the caller hands the
                // spawned group back through hold_group()
                *held = None;
                *state = CaptureState::Consuming;
            }
        }

        // checked after conversion so consumption spans chew seconds from
        // the catch regardless of the conversion delay
        *chew_remaining -= dt;
        if *chew_remaining <= TIMER_EPSILON {
            if *state == CaptureState::Converting {
                if let Some(HeldObject::Whole(item)) = held {
                    outcome.force_break = Some(*item);
                }
            }
            outcome.finished = true;
            *state = CaptureState::Done;
            // Done collapses back to Idle within the same tick; already
            // scheduled piece releases keep running on their own
            self.state = SessionState::Idle;
            self.close_mouth_delay = None;
            self.eat_lock_delay = None;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chew_config(seconds: f32, convert_delay: f32) -> ChewConfig {
        ChewConfig {
            seconds,
            convert_delay,
            hold_approach_rate: 12.0,
            close_after_catch_delay: 0.5,
            eat_lock_delay: 0.2,
            eat_lock_duration: 5.0,
        }
    }

    fn spawn_items<const N: usize>(world: &mut World) -> [Entity; N] {
        [(); N].map(|_| world.spawn_empty().id())
    }

    #[test]
    fn rejects_second_contact_while_active() {
        let config = chew_config(1.2, 1.0);
        let mut world = World::new();
        let [first, second] = spawn_items(&mut world);
        let mut session = MouthSession::default();

        assert!(session.on_contact(first, true, &config));
        assert_eq!(session.state(), CaptureState::Converting);

        // an overlapping item is ignored, the current session is untouched
        assert!(!session.on_contact(second, true, &config));
        assert_eq!(session.held_whole(), Some(first));

        let outcome = session.tick(0.3);
        assert_eq!(outcome.convert, None);
        assert!(!outcome.finished);
    }

    #[test]
    fn whole_item_converts_then_finishes_on_chew_timer() {
        let config = chew_config(1.2, 1.0);
        let mut world = World::new();
        let [melon, group] = spawn_items(&mut world);
        let mut session = MouthSession::default();
        assert!(session.on_contact(melon, true, &config));

        let outcome = session.tick(0.5);
        assert_eq!(outcome.convert, None);

        // t = 1.0: conversion fires and the whole-item reference clears
        let outcome = session.tick(0.5);
        assert_eq!(outcome.convert, Some(melon));
        assert!(!outcome.finished);
        assert_eq!(session.held_whole(), None);
        assert_eq!(session.state(), CaptureState::Consuming);

        session.hold_group(group);
        assert_eq!(session.follow_target(), Some(group));

        // t = 1.2: chew timer lapses, consumption reported exactly once
        let outcome = session.tick(0.2);
        assert!(outcome.finished);
        assert!(session.is_idle());

        let outcome = session.tick(1.0);
        assert!(!outcome.finished);
    }

    #[test]
    fn carryable_skips_conversion() {
        let config = chew_config(0.8, 1.0);
        let mut world = World::new();
        let [snack] = spawn_items(&mut world);
        let mut session = MouthSession::default();
        assert!(session.on_contact(snack, false, &config));
        assert_eq!(session.state(), CaptureState::Consuming);

        let outcome = session.tick(0.8);
        assert_eq!(outcome.convert, None);
        assert_eq!(outcome.force_break, None);
        assert!(outcome.finished);
    }

    #[test]
    fn chew_before_conversion_forces_break() {
        // conversion configured slower than the chew
        let config = chew_config(1.0, 2.0);
        let mut world = World::new();
        let [melon] = spawn_items(&mut world);
        let mut session = MouthSession::default();
        assert!(session.on_contact(melon, true, &config));

        let outcome = session.tick(1.0);
        assert_eq!(outcome.force_break, Some(melon));
        assert!(outcome.finished);
        assert!(session.is_idle());
    }

    #[test]
    fn catch_side_effect_delays_fire_once() {
        let config = chew_config(5.0, 4.0);
        let mut world = World::new();
        let [melon] = spawn_items(&mut world);
        let mut session = MouthSession::default();
        assert!(session.on_contact(melon, true, &config));

        let outcome = session.tick(0.2);
        assert!(outcome.arm_eat_lock);
        assert!(!outcome.close_mouth);

        let outcome = session.tick(0.3);
        assert!(!outcome.arm_eat_lock);
        assert!(outcome.close_mouth);

        let outcome = session.tick(1.0);
        assert!(!outcome.arm_eat_lock);
        assert!(!outcome.close_mouth);
    }

    #[test]
    fn chew_timer_is_not_reset_by_conversion() {
        let config = chew_config(1.2, 1.0);
        let mut world = World::new();
        let [melon] = spawn_items(&mut world);
        let mut session = MouthSession::default();
        assert!(session.on_contact(melon, true, &config));

        // one large step past both deadlines: conversion and completion
        // land in the same tick, conversion first
        let outcome = session.tick(1.5);
        assert_eq!(outcome.convert, Some(melon));
        assert!(outcome.finished);
        assert_eq!(outcome.force_break, None);
    }
}
