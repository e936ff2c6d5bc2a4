pub mod alien;
pub mod command;
pub mod config;
pub mod constants;
pub mod director;
pub mod entity;
pub mod error;
pub mod field;
pub mod level;
pub mod math;
pub mod phase;
pub mod rng;
pub mod score;
pub mod trajectory;

pub use command::{Command, CommandSink, EffectKind};
pub use config::GameConfig;
pub use director::{DirectorSnapshot, LevelDirector};
pub use entity::{BulletId, EntityRef, PlayerState};
pub use error::{ConfigError, CoreError};
pub use field::{AsteroidField, AsteroidId};
pub use math::Vec3;
