// Player
pub const STARTING_LIVES: u32 = 3;
pub const FIRST_JUMP_SCORE: u32 = 3_000;

// Asteroid waves
pub const INITIAL_SPAWN_COUNT: u32 = 7;
pub const ASTEROID_BASE_SPEED: f32 = 13.0;
pub const ASTEROID_MAX_SPEED: f32 = 18.0;
pub const ASTEROID_BASE_SPEED_MULTIPLIER: f32 = 1.1;
pub const ASTEROID_MAX_SPEED_MULTIPLIER: f32 = 1.15;
pub const ASTEROID_MIN_MASS: f32 = 0.36;
pub const ASTEROID_MAX_MASS: f32 = 2.6;
pub const ASTEROID_MIN_MASS_MULTIPLIER: f32 = 0.9;
pub const ASTEROID_MIN_MASS_FLOOR: f32 = 0.18;
/// Upper bound of the per-axis spin in degrees/sec, before the `1/mass` scale.
pub const ASTEROID_SPIN_MAX_DEG: f32 = 55.0;
pub const ASTEROID_RADIUS_PER_MASS: f32 = 1.0;
pub const ASTEROID_SPLIT_FACTOR: f32 = 0.5;

// Alien
pub const ALIEN_SPAWN_TIME: f32 = 40.0;
pub const ALIEN_SPAWN_TIME_MULTIPLIER: f32 = 0.9;
pub const ALIEN_RANGE: f32 = 75.0;
pub const ALIEN_RANGE_MULTIPLIER: f32 = 1.1;
pub const ALIEN_SPEED: f32 = 5.0;
pub const ALIEN_SPEED_MULTIPLIER: f32 = 1.2;
pub const ALIEN_SPEED_CAP: f32 = 20.0;
pub const ALIEN_FIRE_DELAY: f32 = 2.0;
pub const ALIEN_FIRE_DELAY_MULTIPLIER: f32 = 0.9;
pub const ALIEN_FIRE_DELAY_FLOOR: f32 = 0.25;
pub const ALIEN_POINTS: u32 = 500;
pub const ALIEN_STEERING_RATE: f32 = 8.0;
pub const ALIEN_LINE_OF_SIGHT_RADIUS: f32 = 3.0;
pub const ALIEN_SUPPRESSED_FIRE_HOLDOFF: f32 = 4.0;
pub const ALIEN_PREDICTION_LEVELS: f32 = 5.0;

// Bullets
pub const ALIEN_BULLET_SPEED: f32 = 50.0;
pub const BULLET_LIFETIME_SECS: f32 = 5.0;

// Play area (world units, XZ plane; the camera looks down -Y)
pub const PLAY_AREA_HALF_WIDTH: f32 = 80.0;
pub const PLAY_AREA_HALF_HEIGHT: f32 = 45.0;
pub const ASTEROID_RING_SCALE: f32 = 2.4;
pub const ALIEN_RING_SCALE: f32 = 1.2;
pub const HYPERSPACE_ARRIVAL_SCALE: f32 = 0.75;

// Timed sequences (seconds)
pub const HYPERSPACE_AUDIO_OFFSET: f32 = 1.1;
pub const HYPERSPACE_EFFECT_SECS: f32 = 1.0;
pub const HYPERSPACE_AWAY_SECS: f32 = 2.0;
pub const HYPERSPACE_DESTRUCTION_RADIUS: f32 = 60.0;
pub const RESPAWN_HIDDEN_SECS: f32 = 1.5;
pub const RESPAWN_DELAY_INITIAL: f32 = 2.0;
pub const RESPAWN_DELAY_AFTER_DEATH: f32 = 4.0;
pub const LEVEL_COMPLETE_MESSAGE_SECS: f32 = 3.0;

pub const MSG_LEVEL_COMPLETE: &str = "LEVEL COMPLETE";
pub const MSG_GET_READY: &str = "GET READY";
pub const MSG_GAME_OVER: &str = "GAME OVER";
