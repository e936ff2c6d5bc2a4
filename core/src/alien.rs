//! The flying saucer: spawn timing, pursuit and gated fire.

use serde::Serialize;

use crate::config::GameConfig;
use crate::entity::PlayerState;
use crate::field::AsteroidField;
use crate::level::LevelParameters;
use crate::math::{Vec3, Viewport};
use crate::rng::SeededRng;
use crate::trajectory::ring_point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlienPhase {
    Dormant,
    Hunting,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlienState {
    pub active: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub next_fire_time: f64,
    pub next_spawn_time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlienEvent {
    Spawned { position: Vec3 },
    Fired { origin: Vec3, direction: Vec3 },
}

#[derive(Clone, Debug)]
pub struct AlienController {
    state: AlienState,
    viewport: Viewport,
    ring_scale: f32,
    steering_rate: f32,
    line_of_sight_radius: f32,
    suppressed_fire_holdoff: f32,
}

impl AlienController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: AlienState {
                active: false,
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                next_fire_time: 0.0,
                next_spawn_time: f64::from(config.alien.spawn_time),
            },
            viewport: Viewport::new(config.field.half_width, config.field.half_height),
            ring_scale: config.field.alien_ring_scale,
            steering_rate: config.alien.steering_rate,
            line_of_sight_radius: config.alien.line_of_sight_radius,
            suppressed_fire_holdoff: config.alien.suppressed_fire_holdoff,
        }
    }

    #[inline]
    pub fn state(&self) -> &AlienState {
        &self.state
    }

    pub fn phase(&self) -> AlienPhase {
        if self.state.active {
            AlienPhase::Hunting
        } else {
            AlienPhase::Dormant
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Per-frame decision. While dormant this only checks the spawn timer;
    /// while hunting it decides whether to shoot at the player.
    pub fn tick(
        &mut self,
        now: f64,
        player: &PlayerState,
        params: &LevelParameters,
        field: &AsteroidField,
        rng: &mut SeededRng,
    ) -> Option<AlienEvent> {
        match self.phase() {
            AlienPhase::Dormant => self.try_spawn(now, params, rng),
            AlienPhase::Hunting => self.try_fire(now, player, params, field),
        }
    }

    fn try_spawn(
        &mut self,
        now: f64,
        params: &LevelParameters,
        rng: &mut SeededRng,
    ) -> Option<AlienEvent> {
        if now < self.state.next_spawn_time {
            return None;
        }
        let position = ring_point(rng, self.viewport, self.ring_scale);
        self.state.active = true;
        self.state.position = position;
        self.state.velocity = Vec3::ZERO;
        self.state.next_fire_time = now + f64::from(params.alien_fire_delay);
        tracing::debug!(level = params.level, x = position.x, z = position.z, "alien spawned");
        Some(AlienEvent::Spawned { position })
    }

    fn try_fire(
        &mut self,
        now: f64,
        player: &PlayerState,
        params: &LevelParameters,
        field: &AsteroidField,
    ) -> Option<AlienEvent> {
        if player.input_suppressed {
            self.state.next_fire_time = now + f64::from(self.suppressed_fire_holdoff);
            return None;
        }
        if now <= self.state.next_fire_time {
            return None;
        }

        let origin = self.state.position;
        if origin.distance(player.position) > params.alien_range {
            return None;
        }

        let aim = player.position + player.velocity * params.alien_prediction;
        let direction = (aim - origin).normalized();
        if direction == Vec3::ZERO {
            return None;
        }
        if let Some(blocker) = field.first_obstruction(origin, aim, self.line_of_sight_radius) {
            tracing::trace!(asteroid = blocker.0, "alien line of sight blocked");
            return None;
        }

        self.state.next_fire_time = now + f64::from(params.alien_fire_delay);
        Some(AlienEvent::Fired { origin, direction })
    }

    /// Eases velocity toward the player (away from a helpless player) and
    /// integrates position.
    pub fn fixed_tick(&mut self, dt: f32, player: &PlayerState, params: &LevelParameters) {
        if !self.state.active || dt <= 0.0 {
            return;
        }
        let mut heading = (player.position - self.state.position).normalized();
        if player.input_suppressed {
            heading = -heading;
        }
        let target = heading * params.alien_speed;
        self.state.velocity = self.state.velocity.lerp(target, dt * self.steering_rate);
        self.state.position += self.state.velocity * dt;
    }

    /// Puts the alien back to sleep and schedules the next visit. Returns where
    /// it died, or `None` if it was not active.
    pub fn kill(&mut self, now: f64, params: &LevelParameters) -> Option<Vec3> {
        if !self.state.active {
            return None;
        }
        self.state.active = false;
        self.state.velocity = Vec3::ZERO;
        self.state.next_spawn_time = now + f64::from(params.alien_spawn_interval);
        tracing::debug!(
            level = params.level,
            next_spawn_time = self.state.next_spawn_time,
            "alien destroyed"
        );
        Some(self.state.position)
    }

    pub fn reset_spawn_timer(&mut self, now: f64, delay: f32) {
        self.state.next_spawn_time = now + f64::from(delay);
    }
}
