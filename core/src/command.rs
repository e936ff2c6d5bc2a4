//! Everything the core asks of the host engine.

use serde::Serialize;

use crate::entity::BulletId;
use crate::field::{Asteroid, AsteroidId};
use crate::math::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Explosion,
    Collision,
    AlienFire,
    AlienExplosion,
    PlayerExplosion,
    Hyperspace,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SpawnAsteroidVisual {
        id: AsteroidId,
        position: Vec3,
        mass: f32,
        velocity: Vec3,
    },
    DespawnAsteroid {
        id: AsteroidId,
    },
    SpawnAlienVisual {
        position: Vec3,
    },
    HideAlien,
    FireAlienBullet {
        id: BulletId,
        origin: Vec3,
        direction: Vec3,
        speed: f32,
    },
    DespawnBullet {
        id: BulletId,
    },
    PlayEffect {
        kind: EffectKind,
        position: Vec3,
        scale: f32,
    },
    SetPlayerPresence {
        visible: bool,
        collidable: bool,
    },
    TeleportPlayer {
        position: Vec3,
    },
    UpdateHud {
        score: u32,
        lives: u32,
        /// One-based, as shown to the player.
        level: u32,
        hyperspace_available: bool,
    },
    DisplayMessage {
        text: String,
    },
    GameOver,
}

impl Command {
    pub(crate) fn spawn_asteroid(asteroid: &Asteroid) -> Self {
        Self::SpawnAsteroidVisual {
            id: asteroid.id,
            position: asteroid.position,
            mass: asteroid.mass,
            velocity: asteroid.velocity,
        }
    }

    pub(crate) fn effect(kind: EffectKind, position: Vec3, scale: f32) -> Self {
        Self::PlayEffect {
            kind,
            position,
            scale,
        }
    }

    pub(crate) fn message(text: &str) -> Self {
        Self::DisplayMessage {
            text: text.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SpawnAsteroidVisual { .. } => "spawn_asteroid_visual",
            Self::DespawnAsteroid { .. } => "despawn_asteroid",
            Self::SpawnAlienVisual { .. } => "spawn_alien_visual",
            Self::HideAlien => "hide_alien",
            Self::FireAlienBullet { .. } => "fire_alien_bullet",
            Self::DespawnBullet { .. } => "despawn_bullet",
            Self::PlayEffect { .. } => "play_effect",
            Self::SetPlayerPresence { .. } => "set_player_presence",
            Self::TeleportPlayer { .. } => "teleport_player",
            Self::UpdateHud { .. } => "update_hud",
            Self::DisplayMessage { .. } => "display_message",
            Self::GameOver => "game_over",
        }
    }
}

/// Receiver for outbound commands. Implemented by the host's engine bridge.
pub trait CommandSink {
    fn emit(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn emit(&mut self, command: Command) {
        self.push(command);
    }
}
