use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/feeding.toml";

/// Smallest duration a timer is allowed to be configured with.
const MIN_DURATION: f32 = 0.01;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawFeedingConfig {
    #[serde(default)]
    mouth: RawMouth,
    #[serde(default)]
    chew: RawChew,
    #[serde(default)]
    sleep: RawSleep,
    #[serde(default)]
    ui: RawUi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMouth {
    open_radius: f32,
    forced_open_after_throw: f32,
}

impl Default for RawMouth {
    fn default() -> Self {
        Self {
            open_radius: 3.0,
            forced_open_after_throw: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawChew {
    seconds: f32,
    convert_delay: f32,
    hold_approach_rate: f32,
    close_after_catch_delay: f32,
    eat_lock_delay: f32,
    eat_lock_duration: f32,
}

impl Default for RawChew {
    fn default() -> Self {
        Self {
            seconds: 1.2,
            convert_delay: 1.0,
            hold_approach_rate: 12.0,
            close_after_catch_delay: 0.5,
            eat_lock_delay: 0.2,
            eat_lock_duration: 5.167,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSleep {
    meals_to_sleep: u32,
    duration: f32,
    wake_delay: f32,
    reset_progress: bool,
}

impl Default for RawSleep {
    fn default() -> Self {
        Self {
            meals_to_sleep: 4,
            duration: 15.0,
            wake_delay: 2.5,
            reset_progress: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawUi {
    bar_fill_rate: f32,
}

impl Default for RawUi {
    fn default() -> Self {
        Self { bar_fill_rate: 6.0 }
    }
}

/// Runtime configuration derived from `config/feeding.toml`.
#[derive(Resource, Debug, Clone)]
pub struct FeedingConfig {
    pub mouth: MouthConfig,
    pub chew: ChewConfig,
    pub sleep: SleepConfig,
    pub bar_fill_rate: f32,
}

#[derive(Debug, Clone)]
pub struct MouthConfig {
    pub open_radius: f32,
    pub forced_open_after_throw: f32,
}

#[derive(Debug, Clone)]
pub struct ChewConfig {
    /// Effective consumption duration, measured from the catch.
    pub seconds: f32,
    pub convert_delay: f32,
    pub hold_approach_rate: f32,
    pub close_after_catch_delay: f32,
    pub eat_lock_delay: f32,
    pub eat_lock_duration: f32,
}

#[derive(Debug, Clone)]
pub struct SleepConfig {
    pub meals_to_sleep: u32,
    pub duration: f32,
    pub wake_delay: f32,
    pub reset_progress: bool,
}

impl FeedingConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawFeedingConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawFeedingConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawFeedingConfig::default().into()
            }
        }
    }
}

impl From<RawFeedingConfig> for FeedingConfig {
    fn from(value: RawFeedingConfig) -> Self {
        let mouth = MouthConfig {
            open_radius: value.mouth.open_radius.max(0.1),
            forced_open_after_throw: value.mouth.forced_open_after_throw.max(MIN_DURATION),
        };

        let chew = ChewConfig {
            seconds: value.chew.seconds.max(MIN_DURATION),
            convert_delay: value.chew.convert_delay.max(MIN_DURATION),
            hold_approach_rate: value.chew.hold_approach_rate.max(0.0),
            close_after_catch_delay: value.chew.close_after_catch_delay.max(MIN_DURATION),
            eat_lock_delay: value.chew.eat_lock_delay.max(MIN_DURATION),
            eat_lock_duration: value.chew.eat_lock_duration.max(MIN_DURATION),
        };

        let sleep = SleepConfig {
            meals_to_sleep: value.sleep.meals_to_sleep.max(1),
            duration: value.sleep.duration.max(MIN_DURATION),
            wake_delay: value.sleep.wake_delay.max(0.0),
            reset_progress: value.sleep.reset_progress,
        };

        Self {
            mouth,
            chew,
            sleep,
            bar_fill_rate: value.ui.bar_fill_rate.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FeedingConfig::from(RawFeedingConfig::default());
        assert!(config.mouth.open_radius > 0.0);
        assert!(config.chew.seconds > 0.0);
        assert!(config.sleep.meals_to_sleep >= 1);
    }

    #[test]
    fn zero_durations_are_clamped_to_epsilon() {
        let raw = RawFeedingConfig {
            chew: RawChew {
                seconds: 0.0,
                convert_delay: -3.0,
                ..RawChew::default()
            },
            sleep: RawSleep {
                meals_to_sleep: 0,
                duration: 0.0,
                ..RawSleep::default()
            },
            ..Default::default()
        };
        let config = FeedingConfig::from(raw);
        assert_eq!(config.chew.seconds, MIN_DURATION);
        assert_eq!(config.chew.convert_delay, MIN_DURATION);
        assert_eq!(config.sleep.meals_to_sleep, 1);
        assert_eq!(config.sleep.duration, MIN_DURATION);
    }
}
