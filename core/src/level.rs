use serde::Serialize;

use crate::config::GameConfig;

/// Difficulty for one level. Always derived from the level index, never stored
/// across levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelParameters {
    pub level: u32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub min_mass: f32,
    pub max_mass: f32,
    pub alien_range: f32,
    pub alien_speed: f32,
    pub alien_fire_delay: f32,
    pub alien_prediction: f32,
    pub alien_spawn_interval: f32,
}

#[inline]
fn grow(base: f32, multiplier: f32, level: u32) -> f32 {
    base * multiplier.powi(level.min(i32::MAX as u32) as i32)
}

impl LevelParameters {
    pub fn for_level(config: &GameConfig, level: u32) -> Self {
        let speed = &config.speed;
        let mass = &config.mass;
        let alien = &config.alien;

        Self {
            level,
            base_speed: grow(speed.base_speed, speed.base_speed_multiplier, level),
            max_speed: grow(speed.maximum_speed, speed.maximum_speed_multiplier, level),
            min_mass: grow(mass.minimum_mass, mass.minimum_mass_multiplier, level)
                .max(mass.minimum_mass_floor),
            max_mass: mass.maximum_mass,
            alien_range: grow(alien.range, alien.range_multiplier, level),
            alien_speed: grow(alien.speed, alien.speed_multiplier, level).min(alien.speed_cap),
            alien_fire_delay: grow(alien.fire_delay, alien.fire_delay_multiplier, level)
                .max(alien.fire_delay_floor),
            alien_prediction: (level as f32 / alien.prediction_levels).min(1.0),
            alien_spawn_interval: grow(alien.spawn_time, alien.spawn_time_multiplier, level),
        }
    }

    /// Asteroids whose half would fall below this level's minimum mass shatter
    /// without children.
    pub fn can_split(&self, mass: f32, split_factor: f32) -> bool {
        mass * split_factor >= self.min_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn level_zero_matches_base_values() {
        let params = LevelParameters::for_level(&GameConfig::default(), 0);
        assert!(close(params.base_speed, 13.0));
        assert!(close(params.max_speed, 18.0));
        assert!(close(params.min_mass, 0.36));
        assert!(close(params.max_mass, 2.6));
        assert!(close(params.alien_range, 75.0));
        assert!(close(params.alien_speed, 5.0));
        assert!(close(params.alien_fire_delay, 2.0));
        assert!(close(params.alien_prediction, 0.0));
        assert!(close(params.alien_spawn_interval, 40.0));
    }

    #[test]
    fn curves_respect_caps_and_floors() {
        let config = GameConfig::default();
        let params = LevelParameters::for_level(&config, 40);
        assert!(close(params.min_mass, 0.18));
        assert!(close(params.alien_speed, 20.0));
        assert!(close(params.alien_fire_delay, 0.25));
        assert!(close(params.alien_prediction, 1.0));

        let level_two = LevelParameters::for_level(&config, 2);
        assert!(close(level_two.base_speed, 13.0 * 1.1 * 1.1));
        assert!(close(level_two.alien_range, 75.0 * 1.1 * 1.1));
        assert!(close(level_two.alien_prediction, 0.4));
    }

    #[test]
    fn min_mass_is_non_increasing() {
        let config = GameConfig::default();
        let mut previous = f32::MAX;
        for level in 0..30 {
            let params = LevelParameters::for_level(&config, level);
            assert!(params.min_mass <= previous);
            assert!(params.min_mass >= config.mass.minimum_mass_floor);
            previous = params.min_mass;
        }
    }
}
