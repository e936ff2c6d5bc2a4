//! The live asteroid set: wave spawning, the split-on-hit rule, drift and
//! offscreen wraparound.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::ASTEROID_SPLIT_FACTOR;
use crate::error::CoreError;
use crate::level::LevelParameters;
use crate::math::{segment_point_distance, Vec3, Viewport};
use crate::rng::SeededRng;
use crate::trajectory::{horizontal_direction, inward, random_spin, ring_point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Asteroid {
    pub id: AsteroidId,
    pub mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Tumble rate in degrees/sec per axis.
    pub spin: Vec3,
    pub rotation: Vec3,
    /// Launch speed; wraparound re-aims the velocity but keeps this magnitude.
    pub speed: f32,
}

impl Asteroid {
    pub fn radius(&self, radius_per_mass: f32) -> f32 {
        self.mass * radius_per_mass
    }
}

/// Outcome of removing one asteroid from the field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitResult {
    pub parent: Asteroid,
    pub children: Vec<Asteroid>,
    pub killed_by_player: bool,
    /// Mass to score; `0.0` when the kill was not the player's.
    pub award_mass: f32,
}

impl SplitResult {
    fn new(parent: Asteroid, children: Vec<Asteroid>, killed_by_player: bool) -> Self {
        Self {
            parent,
            children,
            killed_by_player,
            award_mass: if killed_by_player { parent.mass } else { 0.0 },
        }
    }
}

#[derive(Clone, Debug)]
pub struct AsteroidField {
    asteroids: Vec<Asteroid>,
    next_id: u32,
    viewport: Viewport,
    ring_scale: f32,
    radius_per_mass: f32,
    spin_max_deg: f32,
}

impl AsteroidField {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            asteroids: Vec::with_capacity(64),
            next_id: 1,
            viewport: Viewport::new(config.field.half_width, config.field.half_height),
            ring_scale: config.field.asteroid_ring_scale,
            radius_per_mass: config.mass.radius_per_mass,
            spin_max_deg: config.mass.spin_max_deg,
        }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn get(&self, id: AsteroidId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|entry| entry.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asteroid> {
        self.asteroids.iter()
    }

    pub fn radius_per_mass(&self) -> f32 {
        self.radius_per_mass
    }

    /// Launches `count` asteroids from a ring outside the visible area, each
    /// heading for the field center.
    pub fn spawn_wave(
        &mut self,
        count: u32,
        params: &LevelParameters,
        rng: &mut SeededRng,
    ) -> Result<Vec<Asteroid>, CoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let valid_range = params.min_mass.is_finite()
            && params.max_mass.is_finite()
            && params.min_mass > 0.0
            && params.min_mass <= params.max_mass;
        if !valid_range {
            return Err(CoreError::InvalidMassRange {
                min: params.min_mass,
                max: params.max_mass,
            });
        }

        let mut spawned = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let spawn_point = ring_point(rng, self.viewport, 1.0);
            let trajectory = inward(spawn_point);
            let mass = rng.range_f32(params.min_mass, params.max_mass);
            let asteroid =
                self.launch(mass, spawn_point * self.ring_scale, trajectory, params, rng);
            spawned.push(asteroid);
        }

        tracing::debug!(
            level = params.level,
            count,
            remaining = self.remaining(),
            "asteroid wave spawned"
        );
        Ok(spawned)
    }

    /// Adds one asteroid. Velocity is `trajectory / mass * base_speed`, clamped
    /// to the level's maximum speed.
    pub fn launch(
        &mut self,
        mass: f32,
        position: Vec3,
        trajectory: Vec3,
        params: &LevelParameters,
        rng: &mut SeededRng,
    ) -> Asteroid {
        let mass = if mass.is_finite() && mass > 0.0 {
            mass
        } else {
            tracing::warn!(mass, clamped = params.min_mass, "invalid asteroid mass");
            params.min_mass
        };

        let velocity = (trajectory / mass * params.base_speed).clamp_length(params.max_speed);
        let spin = random_spin(rng, self.spin_max_deg, mass);

        let asteroid = Asteroid {
            id: AsteroidId(self.next_id),
            mass,
            position,
            velocity,
            spin,
            rotation: Vec3::ZERO,
            speed: velocity.length(),
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.asteroids.push(asteroid);
        asteroid
    }

    /// Removes the asteroid and, when half its mass still meets the level
    /// minimum, replaces it with two halves flying apart.
    pub fn on_hit(
        &mut self,
        id: AsteroidId,
        killed_by_player: bool,
        params: &LevelParameters,
        rng: &mut SeededRng,
    ) -> Option<SplitResult> {
        let parent = self.take(id)?;

        let mut children = Vec::new();
        if params.can_split(parent.mass, ASTEROID_SPLIT_FACTOR) {
            let child_mass = parent.mass * ASTEROID_SPLIT_FACTOR;
            let offset = horizontal_direction(rng);
            let heading = horizontal_direction(rng);
            children.push(self.launch(
                child_mass,
                parent.position + offset,
                heading,
                params,
                rng,
            ));
            children.push(self.launch(
                child_mass,
                parent.position - offset,
                -heading,
                params,
                rng,
            ));
        }

        Some(SplitResult::new(parent, children, killed_by_player))
    }

    /// Removes the asteroid without splitting it.
    pub fn destroy(&mut self, id: AsteroidId, killed_by_player: bool) -> Option<SplitResult> {
        let parent = self.take(id)?;
        Some(SplitResult::new(parent, Vec::new(), killed_by_player))
    }

    fn take(&mut self, id: AsteroidId) -> Option<Asteroid> {
        let index = self.asteroids.iter().position(|entry| entry.id == id)?;
        Some(self.asteroids.remove(index))
    }

    /// Ids of asteroids whose body overlaps the sphere at `center`.
    pub fn ids_within(&self, center: Vec3, radius: f32) -> Vec<AsteroidId> {
        self.asteroids
            .iter()
            .filter(|entry| {
                entry.position.distance(center) <= radius + entry.radius(self.radius_per_mass)
            })
            .map(|entry| entry.id)
            .collect()
    }

    /// First asteroid touched by a cylinder of `probe_radius` swept from
    /// `start` to `end`.
    pub fn first_obstruction(
        &self,
        start: Vec3,
        end: Vec3,
        probe_radius: f32,
    ) -> Option<AsteroidId> {
        self.asteroids
            .iter()
            .find(|entry| {
                segment_point_distance(start, end, entry.position)
                    <= probe_radius + entry.radius(self.radius_per_mass)
            })
            .map(|entry| entry.id)
    }

    /// Overrides position and velocity with values integrated by the host.
    pub fn sync(&mut self, id: AsteroidId, position: Vec3, velocity: Vec3) -> bool {
        if !position.is_finite() || !velocity.is_finite() {
            tracing::warn!(id = id.0, "ignoring non-finite asteroid sync");
            return false;
        }
        match self.asteroids.iter_mut().find(|entry| entry.id == id) {
            Some(asteroid) => {
                asteroid.position = position;
                asteroid.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Drifts every asteroid by `dt` and wraps the ones that left the screen.
    pub fn advance(&mut self, dt: f32) {
        let viewport = self.viewport;
        let radius_per_mass = self.radius_per_mass;
        for asteroid in &mut self.asteroids {
            asteroid.position += asteroid.velocity * dt;
            asteroid.rotation = wrap_degrees(asteroid.rotation + asteroid.spin * dt);
            wrap_offscreen(asteroid, viewport, radius_per_mass);
        }
    }
}

fn wrap_degrees(rotation: Vec3) -> Vec3 {
    Vec3::new(
        rotation.x.rem_euclid(360.0),
        rotation.y.rem_euclid(360.0),
        rotation.z.rem_euclid(360.0),
    )
}

/// Mirrors an offscreen asteroid to the opposite edge when it is still moving
/// outward, then re-aims it at the field center at its launch speed. Returns
/// whether the asteroid was offscreen.
pub fn wrap_offscreen(asteroid: &mut Asteroid, viewport: Viewport, radius_per_mass: f32) -> bool {
    if viewport.is_visible(asteroid.position, asteroid.radius(radius_per_mass)) {
        return false;
    }

    let mut position = asteroid.position;
    let velocity = asteroid.velocity;

    if (position.x < -viewport.half_width && velocity.x < 0.0)
        || (position.x > viewport.half_width && velocity.x >= 0.0)
    {
        position.x = -position.x;
    }
    if (position.z < -viewport.half_height && velocity.z < 0.0)
        || (position.z > viewport.half_height && velocity.z >= 0.0)
    {
        position.z = -position.z;
    }

    asteroid.position = position;
    asteroid.velocity = inward(position) * asteroid.speed;
    true
}
