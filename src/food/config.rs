use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::release::{ReleaseCurve, ReleaseOrder};

const CONFIG_PATH: &str = "config/food.toml";

/// Smallest duration a timer is allowed to be configured with.
const MIN_DURATION: f32 = 0.01;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawFoodConfig {
    #[serde(default)]
    release: RawRelease,
    #[serde(default)]
    despawn: RawDespawn,
    #[serde(default)]
    impact: RawImpact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawRelease {
    order: String,
    curve: String,
    jitter: f32,
    ejection_impulse: f32,
    ejection_up_bias: f32,
}

impl Default for RawRelease {
    fn default() -> Self {
        Self {
            order: "random".to_string(),
            curve: "linear".to_string(),
            jitter: 0.15,
            ejection_impulse: 0.4,
            ejection_up_bias: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDespawn {
    lifetime_min: f32,
    lifetime_max: f32,
    shrink_duration: f32,
}

impl Default for RawDespawn {
    fn default() -> Self {
        Self {
            lifetime_min: 2.0,
            lifetime_max: 4.0,
            shrink_duration: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawImpact {
    min_break_speed: f32,
    explosion_impulse: f32,
    explosion_up_bias: f32,
    explosion_randomness: f32,
    piece_cue_min_speed: f32,
    piece_cue_cooldown: f32,
}

impl Default for RawImpact {
    fn default() -> Self {
        Self {
            min_break_speed: 3.0,
            explosion_impulse: 2.2,
            explosion_up_bias: 0.3,
            explosion_randomness: 0.6,
            piece_cue_min_speed: 0.7,
            piece_cue_cooldown: 0.06,
        }
    }
}

/// Runtime configuration derived from `config/food.toml`.
#[derive(Resource, Debug, Clone)]
pub struct FoodConfig {
    pub release: ReleaseConfig,
    pub despawn: DespawnConfig,
    pub impact: ImpactConfig,
}

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub order: ReleaseOrder,
    pub curve: ReleaseCurve,
    pub jitter: f32,
    pub ejection_impulse: f32,
    pub ejection_up_bias: f32,
}

#[derive(Debug, Clone)]
pub struct DespawnConfig {
    pub lifetime_min: f32,
    pub lifetime_max: f32,
    pub shrink_duration: f32,
}

#[derive(Debug, Clone)]
pub struct ImpactConfig {
    pub min_break_speed: f32,
    pub explosion_impulse: f32,
    pub explosion_up_bias: f32,
    pub explosion_randomness: f32,
    pub piece_cue_min_speed: f32,
    pub piece_cue_cooldown: f32,
}

impl FoodConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawFoodConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawFoodConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawFoodConfig::default().into()
            }
        }
    }
}

impl From<RawFoodConfig> for FoodConfig {
    fn from(value: RawFoodConfig) -> Self {
        let order = ReleaseOrder::parse(&value.release.order).unwrap_or_else(|| {
            warn!(
                "Unknown release order '{}'. Falling back to random.",
                value.release.order
            );
            ReleaseOrder::Random
        });
        let curve = ReleaseCurve::parse(&value.release.curve).unwrap_or_else(|| {
            warn!(
                "Unknown release curve '{}'. Falling back to linear.",
                value.release.curve
            );
            ReleaseCurve::default()
        });

        let release = ReleaseConfig {
            order,
            curve,
            jitter: value.release.jitter.max(0.0),
            ejection_impulse: value.release.ejection_impulse.max(0.0),
            ejection_up_bias: value.release.ejection_up_bias.max(0.0),
        };

        let lifetime_min = value.despawn.lifetime_min.max(MIN_DURATION);
        let despawn = DespawnConfig {
            lifetime_min,
            lifetime_max: value.despawn.lifetime_max.max(lifetime_min),
            shrink_duration: value.despawn.shrink_duration.max(MIN_DURATION),
        };

        let impact = ImpactConfig {
            min_break_speed: value.impact.min_break_speed.max(0.0),
            explosion_impulse: value.impact.explosion_impulse.max(0.0),
            explosion_up_bias: value.impact.explosion_up_bias.max(0.0),
            explosion_randomness: value.impact.explosion_randomness.clamp(0.0, 1.0),
            piece_cue_min_speed: value.impact.piece_cue_min_speed.max(0.0),
            piece_cue_cooldown: value.impact.piece_cue_cooldown.max(0.0),
        };

        Self {
            release,
            despawn,
            impact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_sane_config() {
        let config = FoodConfig::from(RawFoodConfig::default());
        assert_eq!(config.release.order, ReleaseOrder::Random);
        assert_eq!(config.release.curve, ReleaseCurve::Linear);
        assert!(config.despawn.lifetime_max >= config.despawn.lifetime_min);
        assert!(config.despawn.shrink_duration >= MIN_DURATION);
    }

    #[test]
    fn inverted_lifetime_band_is_repaired() {
        let raw = RawFoodConfig {
            despawn: RawDespawn {
                lifetime_min: 5.0,
                lifetime_max: 1.0,
                shrink_duration: 0.0,
            },
            ..Default::default()
        };
        let config = FoodConfig::from(raw);
        assert_eq!(config.despawn.lifetime_min, 5.0);
        assert_eq!(config.despawn.lifetime_max, 5.0);
        assert_eq!(config.despawn.shrink_duration, MIN_DURATION);
    }

    #[test]
    fn unknown_order_keyword_falls_back_to_random() {
        let raw = RawFoodConfig {
            release: RawRelease {
                order: "alphabetical".to_string(),
                ..RawRelease::default()
            },
            ..Default::default()
        };
        let config = FoodConfig::from(raw);
        assert_eq!(config.release.order, ReleaseOrder::Random);
    }
}
