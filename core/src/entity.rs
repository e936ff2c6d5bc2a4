use serde::{Deserialize, Serialize};

use crate::field::AsteroidId;
use crate::math::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(pub u32);

/// Anything that can be killed. Collision reports and the hyperspace wake both
/// resolve to one of these and go through the same `kill` dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Asteroid(AsteroidId),
    Alien,
    AlienBullet(BulletId),
    /// Player bullets are spawned and tracked by the host; the id is opaque here.
    PlayerBullet(BulletId),
    Player,
}

impl EntityRef {
    pub fn is_bullet(self) -> bool {
        matches!(self, Self::AlienBullet(_) | Self::PlayerBullet(_))
    }
}

/// Player ship state sampled by the host each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Host-side suppression (cutscene, pause). The core also suppresses input
    /// on its own during respawn and hyperspace.
    pub input_suppressed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct AlienBullet {
    pub(crate) id: BulletId,
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) remaining_life: f32,
}
