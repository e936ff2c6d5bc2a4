//! Runtime tuning for a session.
//!
//! [`GameConfig`] mirrors every value in [`crate::constants`]. It deserializes
//! with `#[serde(default)]` at every level, so a partial JSON document only
//! overrides the keys it names. `constants.rs` stays the authoritative default.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub speed: SpeedSettings,
    pub mass: MassSettings,
    pub alien: AlienSettings,
    pub score: ScoreSettings,
    pub field: FieldSettings,
    pub sequence: SequenceSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedSettings {
    pub base_speed: f32,
    pub maximum_speed: f32,
    pub base_speed_multiplier: f32,
    pub maximum_speed_multiplier: f32,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            base_speed: ASTEROID_BASE_SPEED,
            maximum_speed: ASTEROID_MAX_SPEED,
            base_speed_multiplier: ASTEROID_BASE_SPEED_MULTIPLIER,
            maximum_speed_multiplier: ASTEROID_MAX_SPEED_MULTIPLIER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassSettings {
    pub minimum_mass: f32,
    pub maximum_mass: f32,
    pub minimum_mass_multiplier: f32,
    pub minimum_mass_floor: f32,
    pub radius_per_mass: f32,
    pub spin_max_deg: f32,
}

impl Default for MassSettings {
    fn default() -> Self {
        Self {
            minimum_mass: ASTEROID_MIN_MASS,
            maximum_mass: ASTEROID_MAX_MASS,
            minimum_mass_multiplier: ASTEROID_MIN_MASS_MULTIPLIER,
            minimum_mass_floor: ASTEROID_MIN_MASS_FLOOR,
            radius_per_mass: ASTEROID_RADIUS_PER_MASS,
            spin_max_deg: ASTEROID_SPIN_MAX_DEG,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlienSettings {
    pub spawn_time: f32,
    pub spawn_time_multiplier: f32,
    pub range: f32,
    pub range_multiplier: f32,
    pub speed: f32,
    pub speed_multiplier: f32,
    pub speed_cap: f32,
    pub fire_delay: f32,
    pub fire_delay_multiplier: f32,
    pub fire_delay_floor: f32,
    pub steering_rate: f32,
    pub line_of_sight_radius: f32,
    pub suppressed_fire_holdoff: f32,
    pub prediction_levels: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
}

impl Default for AlienSettings {
    fn default() -> Self {
        Self {
            spawn_time: ALIEN_SPAWN_TIME,
            spawn_time_multiplier: ALIEN_SPAWN_TIME_MULTIPLIER,
            range: ALIEN_RANGE,
            range_multiplier: ALIEN_RANGE_MULTIPLIER,
            speed: ALIEN_SPEED,
            speed_multiplier: ALIEN_SPEED_MULTIPLIER,
            speed_cap: ALIEN_SPEED_CAP,
            fire_delay: ALIEN_FIRE_DELAY,
            fire_delay_multiplier: ALIEN_FIRE_DELAY_MULTIPLIER,
            fire_delay_floor: ALIEN_FIRE_DELAY_FLOOR,
            steering_rate: ALIEN_STEERING_RATE,
            line_of_sight_radius: ALIEN_LINE_OF_SIGHT_RADIUS,
            suppressed_fire_holdoff: ALIEN_SUPPRESSED_FIRE_HOLDOFF,
            prediction_levels: ALIEN_PREDICTION_LEVELS,
            bullet_speed: ALIEN_BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME_SECS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    pub starting_lives: u32,
    pub first_jump_score: u32,
    pub alien_points: u32,
    pub initial_spawn_count: u32,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            first_jump_score: FIRST_JUMP_SCORE,
            alien_points: ALIEN_POINTS,
            initial_spawn_count: INITIAL_SPAWN_COUNT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub half_width: f32,
    pub half_height: f32,
    pub asteroid_ring_scale: f32,
    pub alien_ring_scale: f32,
    pub hyperspace_arrival_scale: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            half_width: PLAY_AREA_HALF_WIDTH,
            half_height: PLAY_AREA_HALF_HEIGHT,
            asteroid_ring_scale: ASTEROID_RING_SCALE,
            alien_ring_scale: ALIEN_RING_SCALE,
            hyperspace_arrival_scale: HYPERSPACE_ARRIVAL_SCALE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceSettings {
    pub hyperspace_audio_offset: f32,
    pub hyperspace_effect_secs: f32,
    pub hyperspace_away_secs: f32,
    pub hyperspace_destruction_radius: f32,
    pub respawn_hidden_secs: f32,
    pub respawn_delay_initial: f32,
    pub respawn_delay_after_death: f32,
    pub level_complete_message_secs: f32,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            hyperspace_audio_offset: HYPERSPACE_AUDIO_OFFSET,
            hyperspace_effect_secs: HYPERSPACE_EFFECT_SECS,
            hyperspace_away_secs: HYPERSPACE_AWAY_SECS,
            hyperspace_destruction_radius: HYPERSPACE_DESTRUCTION_RADIUS,
            respawn_hidden_secs: RESPAWN_HIDDEN_SECS,
            respawn_delay_initial: RESPAWN_DELAY_INITIAL,
            respawn_delay_after_death: RESPAWN_DELAY_AFTER_DEATH,
            level_complete_message_secs: LEVEL_COMPLETE_MESSAGE_SECS,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn multiplier(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 || value > 10.0 {
        return Err(ConfigError::MultiplierOutOfRange { field, value });
    }
    Ok(())
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speed = &self.speed;
        positive("speed.base_speed", speed.base_speed)?;
        positive("speed.maximum_speed", speed.maximum_speed)?;
        multiplier("speed.base_speed_multiplier", speed.base_speed_multiplier)?;
        multiplier(
            "speed.maximum_speed_multiplier",
            speed.maximum_speed_multiplier,
        )?;

        let mass = &self.mass;
        positive("mass.minimum_mass", mass.minimum_mass)?;
        positive("mass.maximum_mass", mass.maximum_mass)?;
        positive("mass.minimum_mass_floor", mass.minimum_mass_floor)?;
        positive("mass.radius_per_mass", mass.radius_per_mass)?;
        non_negative("mass.spin_max_deg", mass.spin_max_deg)?;
        multiplier("mass.minimum_mass_multiplier", mass.minimum_mass_multiplier)?;
        if mass.minimum_mass > mass.maximum_mass {
            return Err(ConfigError::InvertedRange {
                min_field: "mass.minimum_mass",
                max_field: "mass.maximum_mass",
            });
        }
        if mass.minimum_mass_floor > mass.minimum_mass {
            return Err(ConfigError::InvertedRange {
                min_field: "mass.minimum_mass_floor",
                max_field: "mass.minimum_mass",
            });
        }

        let alien = &self.alien;
        positive("alien.spawn_time", alien.spawn_time)?;
        multiplier("alien.spawn_time_multiplier", alien.spawn_time_multiplier)?;
        positive("alien.range", alien.range)?;
        multiplier("alien.range_multiplier", alien.range_multiplier)?;
        positive("alien.speed", alien.speed)?;
        multiplier("alien.speed_multiplier", alien.speed_multiplier)?;
        positive("alien.speed_cap", alien.speed_cap)?;
        positive("alien.fire_delay", alien.fire_delay)?;
        multiplier("alien.fire_delay_multiplier", alien.fire_delay_multiplier)?;
        positive("alien.fire_delay_floor", alien.fire_delay_floor)?;
        positive("alien.steering_rate", alien.steering_rate)?;
        non_negative("alien.line_of_sight_radius", alien.line_of_sight_radius)?;
        non_negative(
            "alien.suppressed_fire_holdoff",
            alien.suppressed_fire_holdoff,
        )?;
        positive("alien.prediction_levels", alien.prediction_levels)?;
        positive("alien.bullet_speed", alien.bullet_speed)?;
        positive("alien.bullet_lifetime", alien.bullet_lifetime)?;

        if self.score.initial_spawn_count == 0 {
            return Err(ConfigError::ZeroCount {
                field: "score.initial_spawn_count",
            });
        }
        if self.score.starting_lives == 0 {
            return Err(ConfigError::ZeroCount {
                field: "score.starting_lives",
            });
        }
        if self.score.first_jump_score == 0 {
            return Err(ConfigError::ZeroCount {
                field: "score.first_jump_score",
            });
        }

        let field = &self.field;
        positive("field.half_width", field.half_width)?;
        positive("field.half_height", field.half_height)?;
        positive("field.asteroid_ring_scale", field.asteroid_ring_scale)?;
        positive("field.alien_ring_scale", field.alien_ring_scale)?;
        positive(
            "field.hyperspace_arrival_scale",
            field.hyperspace_arrival_scale,
        )?;

        let sequence = &self.sequence;
        non_negative(
            "sequence.hyperspace_audio_offset",
            sequence.hyperspace_audio_offset,
        )?;
        non_negative(
            "sequence.hyperspace_effect_secs",
            sequence.hyperspace_effect_secs,
        )?;
        non_negative(
            "sequence.hyperspace_away_secs",
            sequence.hyperspace_away_secs,
        )?;
        non_negative(
            "sequence.hyperspace_destruction_radius",
            sequence.hyperspace_destruction_radius,
        )?;
        non_negative("sequence.respawn_hidden_secs", sequence.respawn_hidden_secs)?;
        non_negative(
            "sequence.respawn_delay_initial",
            sequence.respawn_delay_initial,
        )?;
        non_negative(
            "sequence.respawn_delay_after_death",
            sequence.respawn_delay_after_death,
        )?;
        non_negative(
            "sequence.level_complete_message_secs",
            sequence.level_complete_message_secs,
        )?;

        Ok(())
    }
}
