//! Level orchestration: owns the field, the alien, the score and the player
//! sequences, and turns host events into outbound commands.

use serde::Serialize;

use crate::alien::{AlienController, AlienEvent, AlienPhase, AlienState};
use crate::command::{Command, CommandSink, EffectKind};
use crate::config::GameConfig;
use crate::constants::{MSG_GAME_OVER, MSG_GET_READY, MSG_LEVEL_COMPLETE};
use crate::entity::{AlienBullet, BulletId, EntityRef, PlayerState};
use crate::error::CoreError;
use crate::field::{AsteroidField, AsteroidId};
use crate::level::LevelParameters;
use crate::math::{Vec3, Viewport};
use crate::phase::{
    HyperspacePhase, HyperspaceSequence, HyperspaceStep, MessageTimer, RespawnPhase,
    RespawnSequence, RespawnStep,
};
use crate::rng::SeededRng;
use crate::score::{ScoreBoard, ScoreState};
use crate::trajectory::ring_point;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectorSnapshot {
    pub level: u32,
    pub time: f64,
    pub score: ScoreState,
    pub asteroids_remaining: usize,
    pub alien: AlienState,
    pub alien_bullets: usize,
    pub respawn: RespawnPhase,
    pub hyperspace: HyperspacePhase,
    pub player_visible: bool,
    pub player_collidable: bool,
    pub controls_enabled: bool,
    pub game_over: bool,
}

#[derive(Clone, Debug)]
pub struct LevelDirector {
    config: GameConfig,
    viewport: Viewport,
    rng: SeededRng,
    field: AsteroidField,
    alien: AlienController,
    score: ScoreBoard,
    level: u32,
    level_started: bool,
    params: LevelParameters,
    /// Session clock in seconds.
    now: f64,
    respawn: RespawnSequence,
    hyperspace: HyperspaceSequence,
    message: MessageTimer,
    alien_bullets: Vec<AlienBullet>,
    next_bullet_id: u32,
    player: PlayerState,
    player_visible: bool,
    player_collidable: bool,
    controls_enabled: bool,
    hud_dirty: bool,
    initialized: bool,
    game_over: bool,
}

/// Collision ordering so each pair is matched once.
fn collision_rank(entity: EntityRef) -> u8 {
    match entity {
        EntityRef::Player => 0,
        EntityRef::Asteroid(_) => 1,
        EntityRef::Alien => 2,
        EntityRef::AlienBullet(_) => 3,
        EntityRef::PlayerBullet(_) => 4,
    }
}

impl LevelDirector {
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, CoreError> {
        config.validate()?;

        let params = LevelParameters::for_level(&config, 0);
        Ok(Self {
            viewport: Viewport::new(config.field.half_width, config.field.half_height),
            rng: SeededRng::new(seed),
            field: AsteroidField::new(&config),
            alien: AlienController::new(&config),
            score: ScoreBoard::new(&config.score),
            level: 0,
            level_started: false,
            params,
            now: 0.0,
            respawn: RespawnSequence::new(&config.sequence),
            hyperspace: HyperspaceSequence::new(&config.sequence),
            message: MessageTimer::default(),
            alien_bullets: Vec::new(),
            next_bullet_id: 1,
            player: PlayerState::default(),
            player_visible: false,
            player_collidable: false,
            controls_enabled: false,
            hud_dirty: false,
            initialized: false,
            game_over: false,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Zero-based level index.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn params(&self) -> &LevelParameters {
        &self.params
    }

    pub fn field(&self) -> &AsteroidField {
        &self.field
    }

    pub fn alien(&self) -> &AlienController {
        &self.alien
    }

    pub fn score(&self) -> ScoreState {
        self.score.state()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the player can steer, shoot and jump right now.
    pub fn player_controllable(&self) -> bool {
        self.controls_enabled && !self.game_over
    }

    pub fn player_collidable(&self) -> bool {
        self.player_collidable
    }

    pub fn alien_bullets(&self) -> impl Iterator<Item = (BulletId, Vec3)> + '_ {
        self.alien_bullets
            .iter()
            .map(|bullet| (bullet.id, bullet.position))
    }

    pub fn snapshot(&self) -> DirectorSnapshot {
        DirectorSnapshot {
            level: self.level,
            time: self.now,
            score: self.score.state(),
            asteroids_remaining: self.field.remaining(),
            alien: *self.alien.state(),
            alien_bullets: self.alien_bullets.len(),
            respawn: self.respawn.phase(),
            hyperspace: self.hyperspace.phase(),
            player_visible: self.player_visible,
            player_collidable: self.player_collidable,
            controls_enabled: self.controls_enabled,
            game_over: self.game_over,
        }
    }

    /// Starts the first level and the opening "GET READY" sequence.
    pub fn init(&mut self, sink: &mut impl CommandSink) -> Result<(), CoreError> {
        if self.initialized {
            tracing::warn!("director already initialized");
            return Ok(());
        }
        self.initialized = true;
        self.begin_respawn(self.config.sequence.respawn_delay_initial, sink);
        self.start_level(sink)
    }

    /// Advances to the next level and launches its wave.
    pub fn start_level(&mut self, sink: &mut impl CommandSink) -> Result<(), CoreError> {
        if self.game_over {
            return Ok(());
        }
        let level = if self.level_started {
            self.level.saturating_add(1)
        } else {
            0
        };
        let params = LevelParameters::for_level(&self.config, level);
        let count = self.config.score.initial_spawn_count.saturating_add(level);
        let wave = self.field.spawn_wave(count, &params, &mut self.rng)?;

        self.level = level;
        self.level_started = true;
        self.params = params;
        for asteroid in &wave {
            sink.emit(Command::spawn_asteroid(asteroid));
        }

        self.alien
            .reset_spawn_timer(self.now, self.config.alien.spawn_time);

        if level > 0 {
            sink.emit(Command::message(MSG_LEVEL_COMPLETE));
            self.message
                .show(self.config.sequence.level_complete_message_secs);
        }

        tracing::info!(level, asteroids = count, time = self.now, "level started");
        self.hud_dirty = true;
        self.flush_hud(sink);
        Ok(())
    }

    /// Per-frame update. Inert before `init` and after game over.
    pub fn tick(
        &mut self,
        dt: f32,
        player: &PlayerState,
        sink: &mut impl CommandSink,
    ) -> Result<(), CoreError> {
        if self.game_over || !self.initialized {
            return Ok(());
        }
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring invalid frame delta");
            return Ok(());
        }

        self.now += f64::from(dt);
        if player.position.is_finite() && player.velocity.is_finite() {
            self.player = *player;
        } else {
            tracing::warn!("ignoring non-finite player state");
            self.player.input_suppressed = player.input_suppressed;
        }

        self.respawn.advance(dt);
        while let Some(step) = self.respawn.poll() {
            self.on_respawn_step(step, sink);
        }
        self.hyperspace.advance(dt);
        while let Some(step) = self.hyperspace.poll() {
            self.on_hyperspace_step(step, sink);
        }
        if self.message.advance(dt) {
            sink.emit(Command::message(""));
        }

        let was_dormant = self.alien.phase() == AlienPhase::Dormant;
        let pilot = self.effective_player();
        let event = self
            .alien
            .tick(self.now, &pilot, &self.params, &self.field, &mut self.rng);
        match event {
            Some(event) => self.on_alien_event(event, sink),
            None if was_dormant && self.field.is_empty() => self.start_level(sink)?,
            None => {}
        }

        self.age_bullets(dt, sink);
        self.flush_hud(sink);
        Ok(())
    }

    /// Physics-rate update: asteroid drift and wrap, alien steering, bullet motion.
    pub fn fixed_tick(&mut self, dt: f32, sink: &mut impl CommandSink) {
        if self.game_over || !self.initialized || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.field.advance(dt);
        let pilot = self.effective_player();
        self.alien.fixed_tick(dt, &pilot, &self.params);

        // Offscreen shots heading inward stay alive; only ones that are out
        // and still moving away are culled early.
        let viewport = self.viewport;
        let mut gone = Vec::new();
        self.alien_bullets.retain_mut(|bullet| {
            bullet.position += bullet.velocity * dt;
            let leaving = bullet.position.dot(bullet.velocity) > 0.0;
            if leaving && !viewport.is_visible(bullet.position, 0.0) {
                gone.push(bullet.id);
                false
            } else {
                true
            }
        });
        for id in gone {
            sink.emit(Command::DespawnBullet { id });
        }
    }

    /// Host-integrated motion for one asteroid.
    pub fn sync_asteroid(&mut self, id: AsteroidId, position: Vec3, velocity: Vec3) -> bool {
        self.field.sync(id, position, velocity)
    }

    /// Resolves a contact reported by the host's physics.
    pub fn report_collision(&mut self, a: EntityRef, b: EntityRef, sink: &mut impl CommandSink) {
        if self.game_over {
            return;
        }
        let (a, b) = if collision_rank(a) <= collision_rank(b) {
            (a, b)
        } else {
            (b, a)
        };
        if a == EntityRef::Player && !self.player_collidable {
            tracing::debug!(other = ?b, "player not collidable, contact ignored");
            return;
        }

        let by_player = matches!(b, EntityRef::PlayerBullet(_));
        for bullet in [a, b].into_iter().filter(|entity| entity.is_bullet()) {
            self.kill(bullet, by_player, sink);
        }

        match (a, b) {
            (EntityRef::Asteroid(first), EntityRef::Asteroid(second)) => {
                self.asteroid_contact(first, second, sink);
            }
            (EntityRef::Asteroid(_), EntityRef::AlienBullet(_) | EntityRef::PlayerBullet(_)) => {
                self.kill(a, by_player, sink);
            }
            (EntityRef::Alien, EntityRef::PlayerBullet(_)) => self.kill(a, true, sink),
            (
                EntityRef::Player,
                EntityRef::Asteroid(_) | EntityRef::Alien | EntityRef::AlienBullet(_),
            ) => self.kill(EntityRef::Player, false, sink),
            _ => tracing::trace!(?a, ?b, "contact has no gameplay effect"),
        }
        self.flush_hud(sink);
    }

    /// Removes one killable thing. Asteroids split; wake kills go through
    /// `wake` instead and never split.
    pub fn kill(&mut self, entity: EntityRef, by_player: bool, sink: &mut impl CommandSink) {
        if self.game_over {
            return;
        }
        match entity {
            EntityRef::Asteroid(id) => self.kill_asteroid(id, by_player, true, sink),
            EntityRef::Alien => self.kill_alien(by_player, sink),
            EntityRef::AlienBullet(id) => {
                let before = self.alien_bullets.len();
                self.alien_bullets.retain(|bullet| bullet.id != id);
                if self.alien_bullets.len() < before {
                    sink.emit(Command::DespawnBullet { id });
                } else {
                    tracing::debug!(id = id.0, "unknown alien bullet");
                }
            }
            EntityRef::PlayerBullet(id) => sink.emit(Command::DespawnBullet { id }),
            EntityRef::Player => self.player_hit(sink),
        }
    }

    /// Spends a banked jump and starts the hyperspace sequence.
    pub fn consume_hyperspace_jump(&mut self, sink: &mut impl CommandSink) -> bool {
        if !self.player_controllable() || self.hyperspace.is_active() || self.respawn.is_active()
        {
            return false;
        }
        if !self.score.consume_jump() {
            return false;
        }
        self.hyperspace.start();
        tracing::info!(
            jumps_left = self.score.state().jumps_available,
            "hyperspace engaged"
        );
        self.hud_dirty = true;
        self.flush_hud(sink);
        true
    }

    fn effective_player(&self) -> PlayerState {
        PlayerState {
            input_suppressed: self.player.input_suppressed || !self.controls_enabled,
            ..self.player
        }
    }

    fn hud(&self) -> Command {
        let state = self.score.state();
        Command::UpdateHud {
            score: state.score,
            lives: state.lives,
            level: self.level.saturating_add(1),
            hyperspace_available: self.score.hyperspace_available(),
        }
    }

    fn flush_hud(&mut self, sink: &mut impl CommandSink) {
        if self.hud_dirty {
            sink.emit(self.hud());
            self.hud_dirty = false;
        }
    }

    fn on_alien_event(&mut self, event: AlienEvent, sink: &mut impl CommandSink) {
        match event {
            AlienEvent::Spawned { position } => {
                sink.emit(Command::SpawnAlienVisual { position });
            }
            AlienEvent::Fired { origin, direction } => {
                let id = BulletId(self.next_bullet_id);
                self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
                let speed = self.config.alien.bullet_speed;
                self.alien_bullets.push(AlienBullet {
                    id,
                    position: origin,
                    velocity: direction * speed,
                    remaining_life: self.config.alien.bullet_lifetime,
                });
                sink.emit(Command::FireAlienBullet {
                    id,
                    origin,
                    direction,
                    speed,
                });
                sink.emit(Command::effect(EffectKind::AlienFire, origin, 1.0));
            }
        }
    }

    fn age_bullets(&mut self, dt: f32, sink: &mut impl CommandSink) {
        let mut expired = Vec::new();
        self.alien_bullets.retain_mut(|bullet| {
            bullet.remaining_life -= dt;
            if bullet.remaining_life > 0.0 {
                true
            } else {
                expired.push(bullet.id);
                false
            }
        });
        for id in expired {
            sink.emit(Command::DespawnBullet { id });
        }
    }

    fn kill_asteroid(
        &mut self,
        id: AsteroidId,
        by_player: bool,
        split: bool,
        sink: &mut impl CommandSink,
    ) {
        let result = if split {
            self.field
                .on_hit(id, by_player, &self.params, &mut self.rng)
        } else {
            self.field.destroy(id, by_player)
        };
        let Some(result) = result else {
            tracing::debug!(id = id.0, "unknown asteroid");
            return;
        };

        let parent = result.parent;
        sink.emit(Command::effect(
            EffectKind::Explosion,
            parent.position,
            parent.mass,
        ));
        sink.emit(Command::DespawnAsteroid { id: parent.id });
        for child in &result.children {
            sink.emit(Command::spawn_asteroid(child));
        }
        if self.score.award_asteroid_kill(result.award_mass) > 0 {
            self.hud_dirty = true;
        }
    }

    fn kill_alien(&mut self, by_player: bool, sink: &mut impl CommandSink) {
        let Some(position) = self.alien.kill(self.now, &self.params) else {
            return;
        };
        sink.emit(Command::HideAlien);
        sink.emit(Command::effect(EffectKind::AlienExplosion, position, 1.0));
        if by_player {
            let points = self.score.award_alien_kill(self.level);
            tracing::info!(level = self.level, points, "alien destroyed by player");
            self.hud_dirty = true;
        }
    }

    fn asteroid_contact(
        &mut self,
        first: AsteroidId,
        second: AsteroidId,
        sink: &mut impl CommandSink,
    ) {
        let (Some(a), Some(b)) = (self.field.get(first), self.field.get(second)) else {
            tracing::debug!(first = first.0, second = second.0, "contact with unknown asteroid");
            return;
        };
        let midpoint = (a.position + b.position) * 0.5;
        let scale = a.mass.min(b.mass);
        sink.emit(Command::effect(EffectKind::Collision, midpoint, scale));
    }

    fn player_hit(&mut self, sink: &mut impl CommandSink) {
        if !self.player_collidable {
            return;
        }
        sink.emit(Command::effect(
            EffectKind::PlayerExplosion,
            self.player.position,
            1.0,
        ));
        let out_of_lives = self.score.lose_life();
        self.hud_dirty = true;

        if out_of_lives {
            self.respawn.abort();
            self.hyperspace.abort();
            self.message.cancel();
            self.set_player_presence(false, sink);
            self.controls_enabled = false;
            sink.emit(Command::message(MSG_GAME_OVER));
            self.flush_hud(sink);
            sink.emit(Command::GameOver);
            self.game_over = true;
            tracing::info!(
                score = self.score.state().score,
                level = self.level,
                "game over"
            );
            return;
        }

        tracing::info!(lives = self.score.state().lives, "player destroyed");
        self.begin_respawn(self.config.sequence.respawn_delay_after_death, sink);
        self.flush_hud(sink);
    }

    /// Hides the player at the origin and queues the "GET READY" sequence.
    /// A jump in progress is dropped.
    fn begin_respawn(&mut self, delay: f32, sink: &mut impl CommandSink) {
        self.hyperspace.abort();
        self.controls_enabled = false;
        self.set_player_presence(false, sink);
        self.player.position = Vec3::ZERO;
        self.player.velocity = Vec3::ZERO;
        sink.emit(Command::TeleportPlayer {
            position: Vec3::ZERO,
        });
        self.respawn.start(delay);
    }

    fn on_respawn_step(&mut self, step: RespawnStep, sink: &mut impl CommandSink) {
        match step {
            RespawnStep::ShowGetReady => sink.emit(Command::message(MSG_GET_READY)),
            RespawnStep::Arrive => {
                sink.emit(Command::message(""));
                self.warp(Vec3::ZERO, true, sink);
                self.controls_enabled = true;
                tracing::debug!(time = self.now, "player respawned");
            }
        }
    }

    fn on_hyperspace_step(&mut self, step: HyperspaceStep, sink: &mut impl CommandSink) {
        match step {
            HyperspaceStep::Depart => {
                self.controls_enabled = false;
                self.warp(self.player.position, false, sink);
            }
            HyperspaceStep::Arrive => {
                let position = ring_point(
                    &mut self.rng,
                    self.viewport,
                    self.config.field.hyperspace_arrival_scale,
                );
                self.player.position = position;
                sink.emit(Command::TeleportPlayer { position });
                self.warp(position, true, sink);
                self.controls_enabled = true;
            }
            HyperspaceStep::Settled => tracing::debug!(time = self.now, "hyperspace settled"),
        }
    }

    fn set_player_presence(&mut self, present: bool, sink: &mut impl CommandSink) {
        self.player_visible = present;
        self.player_collidable = present;
        sink.emit(Command::SetPlayerPresence {
            visible: present,
            collidable: present,
        });
    }

    /// Hyperspace effect at `position`, player presence toggled, wake applied.
    fn warp(&mut self, position: Vec3, arriving: bool, sink: &mut impl CommandSink) {
        sink.emit(Command::effect(EffectKind::Hyperspace, position, 1.0));
        self.set_player_presence(arriving, sink);
        self.wake(position, sink);
    }

    /// Everything hostile within the destruction radius dies, credited to the
    /// player. Asteroids caught in the wake do not split.
    fn wake(&mut self, center: Vec3, sink: &mut impl CommandSink) {
        let radius = self.config.sequence.hyperspace_destruction_radius;

        for id in self.field.ids_within(center, radius) {
            self.kill_asteroid(id, true, false, sink);
        }
        if self.alien.is_active() && self.alien.state().position.distance(center) <= radius {
            self.kill_alien(true, sink);
        }
        let caught: Vec<BulletId> = self
            .alien_bullets
            .iter()
            .filter(|bullet| bullet.position.distance(center) <= radius)
            .map(|bullet| bullet.id)
            .collect();
        for id in caught {
            self.kill(EntityRef::AlienBullet(id), true, sink);
        }
        self.flush_hud(sink);
    }
}

#[cfg(test)]
mod tests;
